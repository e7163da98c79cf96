//! Point-in-time debt analytics: next-month projection, danger score,
//! interest breakdown, summaries, and the payoff what-ifs built on the engine.

use std::fmt;

use chrono::{Local, NaiveDate};
use log::debug;
use serde::Serialize;

use super::engine::{PayoffConfig, PayoffEngine, PayoffStrategy};
use super::timeline::{SimulationResult, WhatIfResult};
use crate::accounts::{AccountStatus, AccountType, DebtAccount};
use crate::assumptions::DebtAssumptions;

/// Where balances land after one month of configured payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NextMonthProjection {
    pub projected_balance: f64,
    pub projected_interest: f64,
    pub principal_paid: f64,
    pub balance_reduction: f64,
}

/// One month of configured payments across accounts with a balance.
/// No floor or fallback applies here; a missing payment counts as zero.
pub fn project_next_month(accounts: &[DebtAccount]) -> NextMonthProjection {
    let active = accounts.iter().filter(|a| a.is_active());

    let (balance, interest, payment) = active.fold((0.0, 0.0, 0.0), |(b, i, p), acc| {
        (b + acc.balance(), i + acc.monthly_interest(), p + acc.configured_payment())
    });

    let principal = payment - interest;
    NextMonthProjection {
        projected_balance: balance - principal,
        projected_interest: interest,
        principal_paid: principal,
        balance_reduction: principal,
    }
}

/// Monthly interest by account type
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InterestBreakdown {
    pub credit_cards: f64,
    pub personal_loans: f64,
    pub auto_loans: f64,
    /// Mortgages and student loans
    pub other: f64,
    pub total: f64,
}

pub fn interest_breakdown(accounts: &[DebtAccount]) -> InterestBreakdown {
    let mut breakdown = InterestBreakdown::default();
    for acc in accounts {
        let interest = acc.monthly_interest();
        match acc.account_type {
            AccountType::CreditCard => breakdown.credit_cards += interest,
            AccountType::PersonalLoan => breakdown.personal_loans += interest,
            AccountType::AutoLoan => breakdown.auto_loans += interest,
            AccountType::Mortgage | AccountType::StudentLoan => breakdown.other += interest,
        }
        breakdown.total += interest;
    }
    breakdown
}

/// Debt held in one account type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDebt {
    pub account_type: AccountType,
    pub balance: f64,
    pub accounts: usize,
    /// Share of total debt, in percent
    pub share_percent: f64,
}

/// Balances grouped by account type, in `AccountType::ALL` order, empty types omitted
pub fn category_breakdown(accounts: &[DebtAccount]) -> Vec<CategoryDebt> {
    let total: f64 = accounts.iter().map(DebtAccount::balance).sum();

    AccountType::ALL
        .into_iter()
        .filter_map(|account_type| {
            let members: Vec<&DebtAccount> = accounts
                .iter()
                .filter(|a| a.account_type == account_type && a.is_active())
                .collect();
            if members.is_empty() {
                return None;
            }
            let balance: f64 = members.iter().map(|a| a.balance()).sum();
            Some(CategoryDebt {
                account_type,
                balance,
                accounts: members.len(),
                share_percent: if total > 0.0 { balance / total * 100.0 } else { 0.0 },
            })
        })
        .collect()
}

/// Risk band of a danger score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DangerCategory {
    Excellent,
    LowRisk,
    Moderate,
    HighRisk,
    Critical,
}

impl DangerCategory {
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s > 80 => DangerCategory::Critical,
            s if s > 60 => DangerCategory::HighRisk,
            s if s > 40 => DangerCategory::Moderate,
            s if s > 20 => DangerCategory::LowRisk,
            _ => DangerCategory::Excellent,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DangerCategory::Excellent => "Excellent",
            DangerCategory::LowRisk => "Low Risk",
            DangerCategory::Moderate => "Moderate",
            DangerCategory::HighRisk => "High Risk",
            DangerCategory::Critical => "Critical",
        }
    }
}

impl fmt::Display for DangerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs and sub-scores behind a danger score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DangerDetails {
    /// Balance-weighted APR, in percent
    pub weighted_apr: f64,
    /// Configured payments over income, in percent
    pub dti_percent: f64,
    pub apr_score: f64,
    pub dti_score: f64,
    pub total_debt: f64,
    pub total_monthly_payments: f64,
    pub monthly_income: f64,
    pub categories: Vec<CategoryDebt>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DangerScore {
    /// 0 (no risk) to 100
    pub score: u32,
    pub category: DangerCategory,
    pub details: DangerDetails,
}

/// Danger score with the standard ceilings (25% APR, 40% DTI)
pub fn calculate_danger_score(accounts: &[DebtAccount], monthly_income: f64) -> DangerScore {
    let rules = DebtAssumptions {
        monthly_income,
        ..DebtAssumptions::default()
    };
    danger_score_with(&rules, accounts)
}

/// Danger score using the income and ceilings in `rules`
pub fn danger_score_with(rules: &DebtAssumptions, accounts: &[DebtAccount]) -> DangerScore {
    let active: Vec<&DebtAccount> = accounts.iter().filter(|a| a.is_active()).collect();

    let total_debt: f64 = active.iter().map(|a| a.balance()).sum();
    let weighted_apr = if total_debt > 0.0 {
        active.iter().map(|a| a.balance() * a.rate()).sum::<f64>() / total_debt
    } else {
        0.0
    };
    let total_payments: f64 = active.iter().map(|a| a.configured_payment()).sum();

    let apr_score = normalize(weighted_apr, rules.apr_ceiling);
    let (dti_percent, dti_score) = if rules.monthly_income > 0.0 {
        let dti = total_payments / rules.monthly_income * 100.0;
        (dti, normalize(dti, rules.dti_ceiling))
    } else if total_payments > 0.0 {
        // Payments with no income is the worst case
        (0.0, 100.0)
    } else {
        (0.0, 0.0)
    };

    let score = (0.5 * apr_score + 0.5 * dti_score).round() as u32;
    let category = DangerCategory::from_score(score);

    debug!(
        "Danger score {} ({}): weighted APR {:.2}%, DTI {:.2}%",
        score, category, weighted_apr, dti_percent
    );

    DangerScore {
        score,
        category,
        details: DangerDetails {
            weighted_apr,
            dti_percent,
            apr_score,
            dti_score,
            total_debt,
            total_monthly_payments: total_payments,
            monthly_income: rules.monthly_income,
            categories: category_breakdown(accounts),
        },
    }
}

/// Scale `value` so that `ceiling` maps to 100, clamped to [0, 100]
fn normalize(value: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return if value > 0.0 { 100.0 } else { 0.0 };
    }
    (value / ceiling * 100.0).clamp(0.0, 100.0)
}

/// Accounts with a balance, highest APR first
pub fn high_apr_accounts(accounts: &[DebtAccount], limit: usize) -> Vec<&DebtAccount> {
    let mut ranked: Vec<&DebtAccount> = accounts.iter().filter(|a| a.is_active()).collect();
    ranked.sort_by(|a, b| b.rate().total_cmp(&a.rate()));
    ranked.truncate(limit);
    ranked
}

pub fn net_worth(total_assets: f64, total_debt: f64) -> f64 {
    total_assets - total_debt
}

/// Headline totals for a set of accounts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebtSummary {
    pub total_debt: f64,
    pub credit_card_debt: f64,
    pub personal_loan_debt: f64,
    pub auto_loan_debt: f64,
    pub other_debt: f64,
    pub total_accounts: usize,
    pub active_accounts: usize,
    pub paid_off_accounts: usize,
    pub total_monthly_payment: f64,
    pub total_monthly_interest: f64,
}

pub fn debt_summary(accounts: &[DebtAccount]) -> DebtSummary {
    let balance_of = |kinds: &[AccountType]| -> f64 {
        accounts
            .iter()
            .filter(|a| kinds.contains(&a.account_type))
            .map(DebtAccount::balance)
            .sum()
    };

    DebtSummary {
        total_debt: accounts.iter().map(DebtAccount::balance).sum(),
        credit_card_debt: balance_of(&[AccountType::CreditCard]),
        personal_loan_debt: balance_of(&[AccountType::PersonalLoan]),
        auto_loan_debt: balance_of(&[AccountType::AutoLoan]),
        other_debt: balance_of(&[AccountType::Mortgage, AccountType::StudentLoan]),
        total_accounts: accounts.len(),
        active_accounts: accounts.iter().filter(|a| a.is_active()).count(),
        paid_off_accounts: accounts
            .iter()
            .filter(|a| !a.is_active() || a.status == AccountStatus::PaidOff)
            .count(),
        total_monthly_payment: accounts
            .iter()
            .filter(|a| a.is_active())
            .map(DebtAccount::configured_payment)
            .sum(),
        total_monthly_interest: accounts.iter().map(DebtAccount::monthly_interest).sum(),
    }
}

/// Separate avalanche runs per debt category plus the whole book
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPayoff {
    /// Credit cards, with the extra payment
    pub credit_cards: SimulationResult,
    /// Personal loans, no extra
    pub personal_loans: SimulationResult,
    /// Auto loans, no extra
    pub auto_loans: SimulationResult,
    /// Every account, with the extra payment
    pub overall: SimulationResult,
}

/// Cost of paying only the configured payments
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimumPaymentTrap {
    pub months: u32,
    pub years: f64,
    pub total_interest: f64,
    pub hit_horizon_cap: bool,
}

/// Payoff what-ifs over a shared set of rules and start date
pub struct DebtAnalytics {
    rules: DebtAssumptions,
    start_date: NaiveDate,
}

impl DebtAnalytics {
    pub fn new(rules: DebtAssumptions, start_date: NaiveDate) -> Self {
        Self { rules, start_date }
    }

    /// Standard rules, starting today
    pub fn standard() -> Self {
        Self::new(DebtAssumptions::default(), Local::now().date_naive())
    }

    pub fn rules(&self) -> &DebtAssumptions {
        &self.rules
    }

    pub fn simulate(&self, accounts: &[DebtAccount], extra_payment: f64, strategy: PayoffStrategy) -> SimulationResult {
        let config = PayoffConfig {
            strategy,
            extra_payment,
            start_date: self.start_date,
            detailed_output: false,
        };
        PayoffEngine::new(self.rules.clone(), config).simulate(accounts)
    }

    pub fn payoff_timeline_by_category(&self, accounts: &[DebtAccount], extra_payment: f64) -> CategoryPayoff {
        let of_type = |t: AccountType| -> Vec<DebtAccount> {
            accounts.iter().filter(|a| a.account_type == t).cloned().collect()
        };

        CategoryPayoff {
            credit_cards: self.simulate(&of_type(AccountType::CreditCard), extra_payment, PayoffStrategy::Avalanche),
            personal_loans: self.simulate(&of_type(AccountType::PersonalLoan), 0.0, PayoffStrategy::Avalanche),
            auto_loans: self.simulate(&of_type(AccountType::AutoLoan), 0.0, PayoffStrategy::Avalanche),
            overall: self.simulate(accounts, extra_payment, PayoffStrategy::Avalanche),
        }
    }

    pub fn minimum_payment_trap(&self, accounts: &[DebtAccount]) -> MinimumPaymentTrap {
        let result = self.simulate(accounts, 0.0, PayoffStrategy::Avalanche);
        MinimumPaymentTrap {
            months: result.months,
            years: result.years,
            total_interest: result.total_interest_paid,
            hit_horizon_cap: result.hit_horizon_cap,
        }
    }

    /// Compare the current path with one that adds `extra_payment` every month
    pub fn simulate_extra_payment(
        &self,
        accounts: &[DebtAccount],
        extra_payment: f64,
        strategy: PayoffStrategy,
    ) -> WhatIfResult {
        let baseline = self.simulate(accounts, 0.0, strategy);
        let with_extra = self.simulate(accounts, extra_payment, strategy);
        WhatIfResult::new(baseline, with_extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn accounts() -> Vec<DebtAccount> {
        vec![
            DebtAccount::new("cc1", "Card 1", AccountType::CreditCard, 3000.0, 20.0, Some(120.0)),
            DebtAccount::new("cc2", "Card 2", AccountType::CreditCard, 1200.0, 26.0, Some(60.0)),
            DebtAccount::new("pl", "Loan", AccountType::PersonalLoan, 6000.0, 12.0, Some(200.0)),
            DebtAccount::new("auto", "Car", AccountType::AutoLoan, 15000.0, 6.0, Some(350.0)),
            DebtAccount::new("old", "Old Card", AccountType::CreditCard, 0.0, 29.0, None)
                .with_status(AccountStatus::PaidOff),
        ]
    }

    fn analytics() -> DebtAnalytics {
        DebtAnalytics::new(DebtAssumptions::default(), NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
    }

    #[test]
    fn test_next_month_projection() {
        let acc = vec![DebtAccount::new("cc", "Card", AccountType::CreditCard, 3000.0, 20.0, Some(120.0))];
        let p = project_next_month(&acc);
        assert_relative_eq!(p.projected_interest, 50.0, epsilon = 1e-9);
        assert_relative_eq!(p.principal_paid, 70.0, epsilon = 1e-9);
        assert_relative_eq!(p.projected_balance, 2930.0, epsilon = 1e-9);
        assert_eq!(p.balance_reduction, p.principal_paid);
    }

    #[test]
    fn test_next_month_without_payment_grows() {
        let acc = vec![DebtAccount::new("pl", "Loan", AccountType::PersonalLoan, 1200.0, 12.0, None)];
        let p = project_next_month(&acc);
        assert_relative_eq!(p.principal_paid, -12.0, epsilon = 1e-9);
        assert_relative_eq!(p.projected_balance, 1212.0, epsilon = 1e-9);
    }

    #[test]
    fn test_danger_score_critical() {
        let acc = vec![DebtAccount::new("cc", "Card", AccountType::CreditCard, 10_000.0, 25.0, Some(2000.0))];
        let danger = calculate_danger_score(&acc, 5000.0);
        assert_eq!(danger.score, 100);
        assert_eq!(danger.category, DangerCategory::Critical);
        assert_eq!(danger.category.label(), "Critical");
        assert_relative_eq!(danger.details.weighted_apr, 25.0);
        assert_relative_eq!(danger.details.dti_percent, 40.0);
    }

    #[test]
    fn test_danger_score_blends_halves() {
        // Weighted APR 12.5% -> 50, DTI 8% -> 20, score 35
        let acc = vec![
            DebtAccount::new("a", "A", AccountType::CreditCard, 1000.0, 20.0, Some(200.0)),
            DebtAccount::new("b", "B", AccountType::AutoLoan, 1000.0, 5.0, Some(200.0)),
        ];
        let danger = calculate_danger_score(&acc, 5000.0);
        assert_relative_eq!(danger.details.weighted_apr, 12.5);
        assert_eq!(danger.score, 35);
        assert_eq!(danger.category, DangerCategory::LowRisk);
        assert_eq!(danger.details.categories.len(), 2);
    }

    #[test]
    fn test_danger_score_empty_and_zero_income() {
        let empty = calculate_danger_score(&[], 5000.0);
        assert_eq!(empty.score, 0);
        assert_eq!(empty.category, DangerCategory::Excellent);

        let acc = vec![DebtAccount::new("a", "A", AccountType::CreditCard, 1000.0, 0.0, Some(100.0))];
        let no_income = calculate_danger_score(&acc, 0.0);
        assert_eq!(no_income.details.dti_score, 100.0);
        assert_eq!(no_income.score, 50);
    }

    #[test]
    fn test_category_boundaries() {
        assert_eq!(DangerCategory::from_score(81), DangerCategory::Critical);
        assert_eq!(DangerCategory::from_score(80), DangerCategory::HighRisk);
        assert_eq!(DangerCategory::from_score(41), DangerCategory::Moderate);
        assert_eq!(DangerCategory::from_score(21), DangerCategory::LowRisk);
        assert_eq!(DangerCategory::from_score(20), DangerCategory::Excellent);
    }

    #[test]
    fn test_interest_breakdown() {
        let b = interest_breakdown(&accounts());
        assert_relative_eq!(b.credit_cards, 50.0 + 26.0, epsilon = 1e-9);
        assert_relative_eq!(b.personal_loans, 60.0, epsilon = 1e-9);
        assert_relative_eq!(b.auto_loans, 75.0, epsilon = 1e-9);
        assert_relative_eq!(b.total, 211.0, epsilon = 1e-9);
    }

    #[test]
    fn test_high_apr_accounts_skip_paid_off() {
        let list = accounts();
        let top = high_apr_accounts(&list, 3);
        let ids: Vec<&str> = top.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["cc2", "cc1", "pl"]);
    }

    #[test]
    fn test_debt_summary() {
        let s = debt_summary(&accounts());
        assert_relative_eq!(s.total_debt, 25_200.0);
        assert_relative_eq!(s.credit_card_debt, 4200.0);
        assert_eq!(s.total_accounts, 5);
        assert_eq!(s.active_accounts, 4);
        assert_eq!(s.paid_off_accounts, 1);
        assert_relative_eq!(s.total_monthly_payment, 730.0);
        assert_eq!(net_worth(40_000.0, s.total_debt), 14_800.0);
    }

    #[test]
    fn test_category_timelines() {
        let payoff = analytics().payoff_timeline_by_category(&accounts(), 100.0);
        assert_eq!(payoff.credit_cards.extra_payment, 100.0);
        assert_eq!(payoff.personal_loans.extra_payment, 0.0);
        assert_eq!(payoff.auto_loans.extra_payment, 0.0);
        assert_eq!(payoff.overall.final_balance(), 0.0);
        assert!(!payoff.overall.hit_horizon_cap);

        // The extra rolls through every category, so the whole book beats minimums
        let minimums = analytics().minimum_payment_trap(&accounts());
        assert!(payoff.overall.months <= minimums.months);
        assert!(payoff.overall.total_interest_paid <= minimums.total_interest);
    }

    #[test]
    fn test_what_if_saves_time_and_interest() {
        let what_if = analytics().simulate_extra_payment(&accounts(), 250.0, PayoffStrategy::Avalanche);
        assert!(what_if.months_saved > 0);
        assert!(what_if.interest_saved > 0.0);
        assert_eq!(what_if.baseline.extra_payment, 0.0);

        let trap = analytics().minimum_payment_trap(&accounts());
        assert_eq!(trap.months, what_if.baseline.months);
        assert_relative_eq!(trap.total_interest, what_if.baseline.total_interest_paid);
    }
}
