//! Debt projection: group payoff simulation, strategy comparison and risk analytics

mod amortization;
mod analytics;
mod engine;
mod state;
mod timeline;

use chrono::{Months, NaiveDate};

pub use amortization::{amortize, months_to_payoff, payoff_priorities, AmortizationSummary};
pub use analytics::{
    calculate_danger_score, category_breakdown, danger_score_with, debt_summary, high_apr_accounts,
    interest_breakdown, net_worth, project_next_month, CategoryDebt, CategoryPayoff, DangerCategory,
    DangerDetails, DangerScore, DebtAnalytics, DebtSummary, InterestBreakdown, MinimumPaymentTrap,
    NextMonthProjection,
};
pub use engine::{
    compare_strategies, compare_strategies_with, simulate_group_payoff, PayoffConfig, PayoffEngine,
    PayoffStrategy,
};
pub use state::{PayoffState, SimAccount};
pub use timeline::{MonthlyPayoffRow, SimulationResult, StrategyComparison, TimelinePoint, WhatIfResult};

/// Calendar date `n` months after `date`, clamped to the end of shorter months
pub(crate) fn add_months(date: NaiveDate, n: u32) -> NaiveDate {
    date.checked_add_months(Months::new(n)).unwrap_or(NaiveDate::MAX)
}
