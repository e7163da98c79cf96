//! Load debt accounts, retirement accounts and expenses from CSV (or JSON) files

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::info;

use super::{AccountStatus, AccountType, DebtAccount, GoalType, RetirementAccount};
use crate::budget::Expense;
use crate::error::{LoadError, LoadResult};
use crate::retirement::RetirementSnapshot;

/// Raw CSV row for a debt account file
#[derive(Debug, serde::Deserialize)]
struct DebtCsvRow {
    #[serde(rename = "AccountId")]
    account_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    account_type: String,
    #[serde(rename = "Balance")]
    balance: Option<f64>,
    #[serde(rename = "APR")]
    apr: Option<f64>,
    #[serde(rename = "MonthlyPayment")]
    monthly_payment: Option<f64>,
    #[serde(rename = "CreditLimit", default)]
    credit_limit: Option<f64>,
    #[serde(rename = "PromoExpires", default)]
    promo_expires: Option<String>,
    #[serde(rename = "Status", default)]
    status: Option<String>,
    #[serde(rename = "Notes", default)]
    notes: Option<String>,
}

impl DebtCsvRow {
    fn into_account(self) -> LoadResult<DebtAccount> {
        let account_type: AccountType = self.account_type.parse()?;
        let status: AccountStatus = self.status.as_deref().unwrap_or("").parse()?;
        let promo_expires = match self.promo_expires.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw)?),
        };

        Ok(DebtAccount {
            id: self.account_id,
            name: self.name,
            account_type,
            current_balance: self.balance.unwrap_or(0.0),
            apr: self.apr.unwrap_or(0.0),
            monthly_payment: self.monthly_payment,
            credit_limit: self.credit_limit,
            promo_expires,
            status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Raw CSV row for a retirement account file
#[derive(Debug, serde::Deserialize)]
struct RetirementCsvRow {
    #[serde(rename = "AccountType")]
    account_type: String,
    #[serde(rename = "GoalType", default)]
    goal_type: Option<String>,
    #[serde(rename = "Balance")]
    balance: Option<f64>,
    #[serde(rename = "Contribution")]
    contribution: Option<f64>,
}

impl RetirementCsvRow {
    fn into_account(self) -> LoadResult<RetirementAccount> {
        let goal_type: GoalType = self.goal_type.as_deref().unwrap_or("").parse()?;
        Ok(RetirementAccount {
            account_type: self.account_type,
            goal_type,
            balance: self.balance.unwrap_or(0.0),
            contribution: self.contribution.unwrap_or(0.0),
        })
    }
}

/// History rows carry the snapshot month in front of the account columns
#[derive(Debug, serde::Deserialize)]
struct HistoryCsvRow {
    #[serde(rename = "SnapshotDate")]
    snapshot_date: String,
    #[serde(rename = "AccountType")]
    account_type: String,
    #[serde(rename = "GoalType", default)]
    goal_type: Option<String>,
    #[serde(rename = "Balance")]
    balance: Option<f64>,
    #[serde(rename = "Contribution")]
    contribution: Option<f64>,
}

impl HistoryCsvRow {
    fn split(self) -> (String, RetirementCsvRow) {
        (
            self.snapshot_date,
            RetirementCsvRow {
                account_type: self.account_type,
                goal_type: self.goal_type,
                balance: self.balance,
                contribution: self.contribution,
            },
        )
    }
}

/// Raw CSV row for an expense file
#[derive(Debug, serde::Deserialize)]
struct ExpenseCsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Amount")]
    amount: Option<f64>,
    #[serde(rename = "Category", default)]
    category: Option<String>,
}

impl ExpenseCsvRow {
    fn into_expense(self) -> LoadResult<Expense> {
        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| "Other".to_string());
        Ok(Expense::new(
            self.description,
            self.amount.unwrap_or(0.0),
            category,
            parse_date(&self.date)?,
        ))
    }
}

/// Parse "YYYY-MM-DD" or "YYYY-MM" (first of month)
pub fn parse_date(raw: &str) -> LoadResult<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .map_err(|source| LoadError::InvalidDate {
            value: raw.to_string(),
            source,
        })
}

/// Load debt accounts from a CSV file
pub fn load_debt_accounts<P: AsRef<Path>>(path: P) -> LoadResult<Vec<DebtAccount>> {
    let reader = Reader::from_path(path.as_ref())?;
    let accounts = read_debt_rows(reader)?;
    info!("Loaded {} debt accounts from {}", accounts.len(), path.as_ref().display());
    Ok(accounts)
}

/// Load debt accounts from any reader
pub fn load_debt_accounts_from_reader<R: Read>(reader: R) -> LoadResult<Vec<DebtAccount>> {
    read_debt_rows(Reader::from_reader(reader))
}

fn read_debt_rows<R: Read>(mut reader: Reader<R>) -> LoadResult<Vec<DebtAccount>> {
    let mut accounts = Vec::new();
    for result in reader.deserialize() {
        let row: DebtCsvRow = result?;
        accounts.push(row.into_account()?);
    }
    Ok(accounts)
}

/// Load debt accounts from a JSON array
pub fn load_debt_accounts_json<R: Read>(reader: R) -> LoadResult<Vec<DebtAccount>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load retirement accounts from a CSV file
pub fn load_retirement_accounts<P: AsRef<Path>>(path: P) -> LoadResult<Vec<RetirementAccount>> {
    let file = std::fs::File::open(path.as_ref())?;
    let accounts = load_retirement_accounts_from_reader(file)?;
    info!("Loaded {} retirement accounts from {}", accounts.len(), path.as_ref().display());
    Ok(accounts)
}

pub fn load_retirement_accounts_from_reader<R: Read>(reader: R) -> LoadResult<Vec<RetirementAccount>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut accounts = Vec::new();
    for result in csv_reader.deserialize() {
        let row: RetirementCsvRow = result?;
        accounts.push(row.into_account()?);
    }
    Ok(accounts)
}

/// Load prior monthly snapshots, grouped by date and sorted oldest first
pub fn load_retirement_history_from_reader<R: Read>(reader: R) -> LoadResult<Vec<RetirementSnapshot>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut by_date: BTreeMap<NaiveDate, Vec<RetirementAccount>> = BTreeMap::new();

    for result in csv_reader.deserialize() {
        let row: HistoryCsvRow = result?;
        let (raw_date, account) = row.split();
        let date = parse_date(&raw_date)?;
        by_date.entry(date).or_default().push(account.into_account()?);
    }

    Ok(by_date
        .into_iter()
        .map(|(date, accounts)| RetirementSnapshot::new(date, accounts))
        .collect())
}

pub fn load_retirement_history<P: AsRef<Path>>(path: P) -> LoadResult<Vec<RetirementSnapshot>> {
    let file = std::fs::File::open(path.as_ref())?;
    load_retirement_history_from_reader(file)
}

/// Load expenses from a CSV file (Date, Description, Amount, Category)
pub fn load_expenses<P: AsRef<Path>>(path: P) -> LoadResult<Vec<Expense>> {
    let file = std::fs::File::open(path.as_ref())?;
    let expenses = load_expenses_from_reader(file)?;
    info!("Loaded {} expenses from {}", expenses.len(), path.as_ref().display());
    Ok(expenses)
}

pub fn load_expenses_from_reader<R: Read>(reader: R) -> LoadResult<Vec<Expense>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut expenses = Vec::new();
    for result in csv_reader.deserialize() {
        let row: ExpenseCsvRow = result?;
        expenses.push(row.into_expense()?);
    }
    Ok(expenses)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEBTS: &str = "\
AccountId,Name,Type,Balance,APR,MonthlyPayment,CreditLimit,PromoExpires,Status,Notes
boa-cc-001,BoA Card,CREDIT_CARD,3000,20,120,10000,,ACTIVE,
sofi-pl-001,SoFi Loan,PERSONAL_LOAN,5000,10,,,2026-06,,refinanced
";

    #[test]
    fn test_load_debts_from_reader() {
        let accounts = load_debt_accounts_from_reader(DEBTS.as_bytes()).expect("parse debts");
        assert_eq!(accounts.len(), 2);

        let card = &accounts[0];
        assert_eq!(card.id, "boa-cc-001");
        assert_eq!(card.account_type, AccountType::CreditCard);
        assert_eq!(card.monthly_payment, Some(120.0));
        assert_eq!(card.credit_limit, Some(10_000.0));
        assert!(card.promo_expires.is_none());

        let loan = &accounts[1];
        assert_eq!(loan.monthly_payment, None);
        assert_eq!(loan.status, AccountStatus::Active);
        assert_eq!(loan.promo_expires, NaiveDate::from_ymd_opt(2026, 6, 1));
        assert_eq!(loan.notes.as_deref(), Some("refinanced"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let csv = "AccountId,Name,Type,Balance,APR,MonthlyPayment\nx,X,BOAT_LOAN,1,1,1\n";
        let err = load_debt_accounts_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::UnknownValue { field: "account type", .. }));
    }

    #[test]
    fn test_load_debts_json() {
        let json = r#"[{"id":"a","name":"A","accountType":"AUTO_LOAN","currentBalance":9000,"apr":6.5}]"#;
        let accounts = load_debt_accounts_json(json.as_bytes()).unwrap();
        assert_eq!(accounts[0].account_type, AccountType::AutoLoan);
        assert_eq!(accounts[0].configured_payment(), 0.0);
    }

    #[test]
    fn test_load_retirement_history_groups_by_month() {
        let csv = "\
SnapshotDate,AccountType,GoalType,Balance,Contribution
2026-02,401k,RETIREMENT,51000,1000
2026-01,401k,RETIREMENT,50000,1000
2026-01,529 Plan,EDUCATION,8000,200
";
        let history = load_retirement_history_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(history[0].accounts.len(), 2);
        assert_eq!(history[1].accounts[0].balance, 51_000.0);
    }

    #[test]
    fn test_load_expenses_defaults_category() {
        let csv = "Date,Description,Amount,Category\n2026-03-02,Groceries,84.20,Grocery\n2026-03-04,Parking,12,\n";
        let expenses = load_expenses_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].category, "Grocery");
        assert_eq!(expenses[1].category, "Other");
        assert_eq!(expenses[1].date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let csv = "Date,Description,Amount,Category\nyesterday,Lunch,12,Food\n";
        let err = load_expenses_from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidDate { .. }));
    }

    #[test]
    fn test_load_sample_files() {
        let debts = load_debt_accounts("data/sample_debts.csv").expect("sample debts");
        assert!(!debts.is_empty());
        let buckets = load_retirement_accounts("data/sample_retirement.csv").expect("sample buckets");
        assert_eq!(buckets.len(), 4);
        let history = load_retirement_history("data/sample_retirement_history.csv").expect("sample history");
        assert_eq!(history.len(), 2);
        let expenses = load_expenses("data/sample_expenses.csv").expect("sample expenses");
        assert!(!expenses.is_empty());
    }
}
