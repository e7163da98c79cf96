//! Household budget analytics over expense records

mod analytics;
mod book;

pub use analytics::{
    budget_progress, category_breakdown, generate_insights, trend_stats, BudgetProgress, CategorySpend, Insight,
    InsightKind, PeriodStats, ProgressLevel, TrendRange,
};
pub use book::{expenses_in_month, BudgetBook, Expense};
