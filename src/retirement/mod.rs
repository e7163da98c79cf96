//! Retirement projection: compound growth, contribution waterfall,
//! withdrawal tax blending, plan evaluation and the health score
//!
//! # Example
//!
//! ```rust,ignore
//! use finance_engine::assumptions::PlanAssumptions;
//! use finance_engine::retirement::{allocate_contributions, required_monthly_contribution};
//!
//! let assumptions = PlanAssumptions::standard();
//! let needed = required_monthly_contribution(94_000.0, 1_270_000.0, 204, 7.0);
//! for allocation in allocate_contributions(needed, &assumptions.limits) {
//!     println!("{}: {:.2}", allocation.bucket, allocation.monthly_amount);
//! }
//! ```

mod allocation;
mod growth;
mod health;
mod plan;
mod tax;

pub use allocation::{allocate_contributions, Allocation, ContributionBucket, ContributionStatus};
pub use growth::{growth_path, project_balance, required_monthly_contribution};
pub use health::{financial_health_score, HealthScore, ScoreAdjustment};
pub use plan::{
    evaluate_plan, AccountScorecard, GrowthAttribution, PlanRequest, PlanStatus, RetirementPlanResult,
    RetirementSnapshot, ScorecardStatus, YtdSummary,
};
pub use tax::{effective_withdrawal_tax_rate, AfterTaxMode, TaxCharacter, TaxDiversification, TaxRates};
