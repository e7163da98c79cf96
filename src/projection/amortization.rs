//! Closed-form amortization for a single account
//!
//! Used to annotate each account with months left and a payoff date
//! without running the full group simulation.

use chrono::NaiveDate;
use serde::Serialize;

use crate::accounts::DebtAccount;

/// Per-account payoff figures at the configured payment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmortizationSummary {
    pub account_id: String,

    /// Principal repaid this month (negative when the payment does not cover interest)
    pub principal_per_month: f64,

    /// Months until the balance reaches zero, `None` if it never does
    pub months_left: Option<u32>,

    pub payoff_date: Option<NaiveDate>,
}

/// Months needed to repay `balance` at `payment` per month.
///
/// Uses `n = -ln(1 - rP/A) / ln(1 + r)` rounded up, or `P/A` when the
/// rate is zero. Returns `None` when the payment never covers the interest.
pub fn months_to_payoff(balance: f64, apr_percent: f64, payment: f64) -> Option<u32> {
    if balance <= 0.0 {
        return Some(0);
    }
    let r = apr_percent.max(0.0) / 100.0 / 12.0;
    if payment <= balance * r || payment <= 0.0 {
        return None;
    }

    let months = if r == 0.0 {
        balance / payment
    } else {
        -(1.0 - r * balance / payment).ln() / (1.0 + r).ln()
    };

    if months.is_finite() {
        Some(months.ceil() as u32)
    } else {
        None
    }
}

/// Amortization summary for one account, with dates counted from `as_of`
pub fn amortize(account: &DebtAccount, as_of: NaiveDate) -> AmortizationSummary {
    if !account.is_active() {
        return AmortizationSummary {
            account_id: account.id.clone(),
            principal_per_month: 0.0,
            months_left: Some(0),
            payoff_date: Some(as_of),
        };
    }

    let payment = account.configured_payment();
    let months_left = months_to_payoff(account.balance(), account.rate(), payment);

    AmortizationSummary {
        account_id: account.id.clone(),
        principal_per_month: payment - account.monthly_interest(),
        months_left,
        payoff_date: months_left.map(|n| super::add_months(as_of, n)),
    }
}

/// Avalanche priority per account: 1 for the highest APR among accounts with a
/// balance, `None` for paid-off accounts. Returned in priority order.
pub fn payoff_priorities(accounts: &[DebtAccount]) -> Vec<(String, Option<u32>)> {
    let mut ordered: Vec<&DebtAccount> = accounts.iter().collect();
    ordered.sort_by(|a, b| b.rate().total_cmp(&a.rate()));

    let mut next = 1;
    ordered
        .into_iter()
        .map(|acc| {
            let priority = if acc.is_active() {
                next += 1;
                Some(next - 1)
            } else {
                None
            };
            (acc.id.clone(), priority)
        })
        .collect()
}
