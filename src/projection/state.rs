//! Working state for a payoff simulation

use chrono::NaiveDate;

use crate::accounts::{AccountType, DebtAccount};
use crate::assumptions::DebtAssumptions;

/// Owned working copy of a debt account during simulation
#[derive(Debug, Clone)]
pub struct SimAccount {
    pub id: String,
    pub account_type: AccountType,

    /// Remaining balance, never negative
    pub balance: f64,

    /// APR in percent
    pub apr: f64,

    /// Configured monthly payment (0 when none)
    pub configured_payment: f64,
}

impl SimAccount {
    pub fn from_account(account: &DebtAccount) -> Self {
        Self {
            id: account.id.clone(),
            account_type: account.account_type,
            balance: account.balance(),
            apr: account.rate(),
            configured_payment: account.configured_payment(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.balance > 0.0
    }

    pub fn monthly_interest(&self) -> f64 {
        self.balance * (self.apr / 100.0) / 12.0
    }

    /// Payment owed this month before any extra: the configured payment,
    /// or a share of the balance when none is configured, never below the floor
    pub fn scheduled_payment(&self, rules: &DebtAssumptions) -> f64 {
        let base = if self.configured_payment > 0.0 {
            self.configured_payment
        } else {
            self.balance * rules.fallback_payment_rate
        };
        base.max(rules.minimum_payment_floor)
    }
}

/// Month-level simulation state
#[derive(Debug, Clone)]
pub struct PayoffState {
    /// Months simulated so far
    pub month: u32,

    /// Calendar date of the current month
    pub date: NaiveDate,

    /// Extra money still looking for an account this month
    pub pool: f64,

    /// Interest accrued across all accounts so far
    pub total_interest_paid: f64,

    start_date: NaiveDate,
}

impl PayoffState {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            month: 0,
            date: start_date,
            pool: 0.0,
            total_interest_paid: 0.0,
            start_date,
        }
    }

    /// Advance to the next month and refill the extra-payment pool
    pub fn advance_month(&mut self, extra_payment: f64) {
        self.month += 1;
        self.date = super::add_months(self.start_date, self.month);
        self.pool = extra_payment;
    }

    /// Take everything in the pool
    pub fn drain_pool(&mut self) -> f64 {
        std::mem::take(&mut self.pool)
    }
}
