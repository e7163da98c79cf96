//! Output structures for payoff simulations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::PayoffStrategy;

/// Aggregate balance at one simulated month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    /// Months from the start (0 = current balances)
    pub month: u32,
    pub date: NaiveDate,
    pub balance: f64,
}

/// What happened to one account in one month (detailed output only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPayoffRow {
    pub month: u32,
    pub account_id: String,
    pub bop_balance: f64,
    pub interest: f64,
    pub scheduled_payment: f64,
    /// Payment above the scheduled amount, from the extra pool
    pub extra_applied: f64,
    pub payment: f64,
    pub principal: f64,
    pub eop_balance: f64,
}

/// Result of a payoff simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub strategy: PayoffStrategy,
    pub extra_payment: f64,

    /// Months simulated until every balance reached zero (or the cap)
    pub months: u32,

    /// Months in years, one decimal
    pub years: f64,

    pub payoff_date: NaiveDate,
    pub total_interest_paid: f64,
    pub starting_balance: f64,

    /// One sample per month, starting at month 0
    pub timeline: Vec<TimelinePoint>,

    /// True when balances were still outstanding at the horizon cap
    pub hit_horizon_cap: bool,

    /// Per-account monthly rows, filled only with detailed output
    pub rows: Vec<MonthlyPayoffRow>,
}

impl SimulationResult {
    pub fn new(strategy: PayoffStrategy, extra_payment: f64, start_date: NaiveDate) -> Self {
        Self {
            strategy,
            extra_payment,
            months: 0,
            years: 0.0,
            payoff_date: start_date,
            total_interest_paid: 0.0,
            starting_balance: 0.0,
            timeline: Vec::new(),
            hit_horizon_cap: false,
            rows: Vec::new(),
        }
    }

    pub fn add_point(&mut self, point: TimelinePoint) {
        self.timeline.push(point);
    }

    /// Balance left at the end of the simulation
    pub fn final_balance(&self) -> f64 {
        self.timeline.last().map(|p| p.balance).unwrap_or(0.0)
    }

    /// Rows for one account, in month order
    pub fn rows_for<'a>(&'a self, account_id: &'a str) -> impl Iterator<Item = &'a MonthlyPayoffRow> {
        self.rows.iter().filter(move |r| r.account_id == account_id)
    }
}

/// Snowball and avalanche run side by side on the same inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub snowball: SimulationResult,
    pub avalanche: SimulationResult,
}

impl StrategyComparison {
    /// Interest avalanche saves over snowball (negative if snowball is cheaper)
    pub fn avalanche_interest_savings(&self) -> f64 {
        self.snowball.total_interest_paid - self.avalanche.total_interest_paid
    }

    /// Strategy with the lower total interest; ties go to avalanche
    pub fn cheaper(&self) -> PayoffStrategy {
        if self.snowball.total_interest_paid < self.avalanche.total_interest_paid {
            PayoffStrategy::Snowball
        } else {
            PayoffStrategy::Avalanche
        }
    }
}

/// Current path vs a path with an extra monthly payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatIfResult {
    pub baseline: SimulationResult,
    pub with_extra: SimulationResult,
    pub months_saved: i64,
    pub interest_saved: f64,
}

impl WhatIfResult {
    pub fn new(baseline: SimulationResult, with_extra: SimulationResult) -> Self {
        let months_saved = baseline.months as i64 - with_extra.months as i64;
        let interest_saved = baseline.total_interest_paid - with_extra.total_interest_paid;
        Self {
            baseline,
            with_extra,
            months_saved,
            interest_saved,
        }
    }
}
