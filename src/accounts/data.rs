//! Account records consumed by the debt and retirement engines

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;
use crate::retirement::TaxCharacter;

/// Kind of liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    CreditCard,
    PersonalLoan,
    AutoLoan,
    Mortgage,
    StudentLoan,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::CreditCard,
        AccountType::PersonalLoan,
        AccountType::AutoLoan,
        AccountType::Mortgage,
        AccountType::StudentLoan,
    ];

    /// Identifier used in account files
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::CreditCard => "CREDIT_CARD",
            AccountType::PersonalLoan => "PERSONAL_LOAN",
            AccountType::AutoLoan => "AUTO_LOAN",
            AccountType::Mortgage => "MORTGAGE",
            AccountType::StudentLoan => "STUDENT_LOAN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AccountType::CreditCard => "Credit Cards",
            AccountType::PersonalLoan => "Personal Loans",
            AccountType::AutoLoan => "Auto Loans",
            AccountType::Mortgage => "Mortgages",
            AccountType::StudentLoan => "Student Loans",
        }
    }
}

impl FromStr for AccountType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoadError::UnknownValue {
                field: "account type",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a liability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Active,
    PaidOff,
    Closed,
}

impl FromStr for AccountStatus {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "ACTIVE" => Ok(AccountStatus::Active),
            "PAID_OFF" => Ok(AccountStatus::PaidOff),
            "CLOSED" => Ok(AccountStatus::Closed),
            _ => Err(LoadError::UnknownValue {
                field: "account status",
                value: s.to_string(),
            }),
        }
    }
}

/// A single debt account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtAccount {
    /// Stable identifier, e.g. "boa-cc-001"
    pub id: String,

    /// Display name
    pub name: String,

    pub account_type: AccountType,

    /// Outstanding balance
    #[serde(default)]
    pub current_balance: f64,

    /// Annual percentage rate, in percent (0-100)
    #[serde(default)]
    pub apr: f64,

    /// Configured monthly payment
    #[serde(default)]
    pub monthly_payment: Option<f64>,

    /// Credit limit for revolving accounts, original amount for loans
    #[serde(default)]
    pub credit_limit: Option<f64>,

    /// Promotional rate expiry
    #[serde(default)]
    pub promo_expires: Option<NaiveDate>,

    #[serde(default)]
    pub status: AccountStatus,

    #[serde(default)]
    pub notes: Option<String>,
}

impl DebtAccount {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
        current_balance: f64,
        apr: f64,
        monthly_payment: Option<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
            current_balance,
            apr,
            monthly_payment,
            credit_limit: None,
            promo_expires: None,
            status: AccountStatus::Active,
            notes: None,
        }
    }

    pub fn with_credit_limit(mut self, limit: f64) -> Self {
        self.credit_limit = Some(limit);
        self
    }

    pub fn with_promo_expiry(mut self, date: NaiveDate) -> Self {
        self.promo_expires = Some(date);
        self
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    /// Balance floored at zero
    pub fn balance(&self) -> f64 {
        self.current_balance.max(0.0)
    }

    /// APR floored at zero
    pub fn rate(&self) -> f64 {
        self.apr.max(0.0)
    }

    /// Configured payment, zero when absent
    pub fn configured_payment(&self) -> f64 {
        self.monthly_payment.unwrap_or(0.0).max(0.0)
    }

    pub fn is_active(&self) -> bool {
        self.current_balance > 0.0
    }

    /// Interest accrued on the current balance over one month
    pub fn monthly_interest(&self) -> f64 {
        self.balance() * (self.rate() / 100.0) / 12.0
    }

    /// Balance as a share of the credit limit, in percent
    pub fn utilization(&self) -> Option<f64> {
        match self.credit_limit {
            Some(limit) if limit > 0.0 => Some(self.balance() / limit * 100.0),
            _ => None,
        }
    }

    /// Share of the limit / original amount already repaid, in percent (0-100)
    pub fn progress_percent(&self) -> Option<f64> {
        match self.credit_limit {
            Some(limit) if limit > 0.0 => {
                Some(((limit - self.balance()) / limit * 100.0).clamp(0.0, 100.0))
            }
            _ => None,
        }
    }

    /// Whether a promotional rate is still running on `date`
    pub fn promo_active_on(&self, date: NaiveDate) -> bool {
        self.promo_expires.is_some_and(|expiry| date <= expiry)
    }
}

/// What a savings bucket is earmarked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    #[default]
    Retirement,
    Education,
}

impl FromStr for GoalType {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "RETIREMENT" => Ok(GoalType::Retirement),
            "EDUCATION" => Ok(GoalType::Education),
            _ => Err(LoadError::UnknownValue {
                field: "goal type",
                value: s.to_string(),
            }),
        }
    }
}

/// A savings bucket (401k, Roth IRA, HSA, brokerage, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementAccount {
    /// Free-form label; tax character is inferred from it
    pub account_type: String,

    #[serde(default)]
    pub goal_type: GoalType,

    #[serde(default)]
    pub balance: f64,

    /// Monthly contribution
    #[serde(default)]
    pub contribution: f64,
}

impl RetirementAccount {
    pub fn new(account_type: impl Into<String>, balance: f64, contribution: f64) -> Self {
        Self {
            account_type: account_type.into(),
            goal_type: GoalType::Retirement,
            balance,
            contribution,
        }
    }

    pub fn with_goal(mut self, goal_type: GoalType) -> Self {
        self.goal_type = goal_type;
        self
    }

    pub fn tax_character(&self) -> TaxCharacter {
        TaxCharacter::from_label(&self.account_type)
    }

    pub fn counts_toward_retirement(&self) -> bool {
        self.goal_type == GoalType::Retirement
    }
}
