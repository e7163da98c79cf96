//! Finance Engine - projection core for a personal-finance dashboard
//!
//! This library provides:
//! - Debt payoff simulation under avalanche or snowball ordering with extra payments
//! - Debt risk analytics (danger score, interest breakdown, amortization)
//! - Retirement growth projections, contribution waterfall and withdrawal tax blending
//! - Retirement plan evaluation and a financial health score
//! - Budget analytics over expense records
//! - Batch scenario runs across extra payments and strategies

pub mod accounts;
pub mod assumptions;
pub mod budget;
pub mod error;
pub mod projection;
pub mod retirement;
pub mod scenario;

// Re-export commonly used types
pub use accounts::{AccountType, DebtAccount, RetirementAccount};
pub use assumptions::PlanAssumptions;
pub use error::{LoadError, LoadResult};
pub use projection::{compare_strategies, simulate_group_payoff, PayoffEngine, PayoffStrategy, SimulationResult};
pub use retirement::{evaluate_plan, RetirementPlanResult};
pub use scenario::ScenarioRunner;
