//! Planning assumptions: payment rules, contribution limits, plan profile, budget defaults

mod debt;
mod limits;
mod profile;
pub mod loader;

pub use debt::DebtAssumptions;
pub use limits::ContributionLimits;
pub use loader::LoadedAssumptions;
pub use profile::RetirementProfile;

use std::path::Path;

use loader::{apply, Overrides};

use crate::error::LoadResult;

/// Default monthly budgets when none has been saved for a month
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetDefaults {
    /// Fallback budget on the debt/expense side
    pub debt_side_budget: f64,

    /// Fallback budget used by the budget analytics
    pub expense_budget: f64,
}

impl Default for BudgetDefaults {
    fn default() -> Self {
        Self {
            debt_side_budget: 5000.0,
            expense_budget: 2000.0,
        }
    }
}

impl BudgetDefaults {
    pub fn from_loaded(overrides: &Overrides) -> Self {
        let mut budget = Self::default();
        apply(
            overrides,
            "budget",
            &mut [
                ("debt_side_budget", &mut budget.debt_side_budget),
                ("expense_budget", &mut budget.expense_budget),
            ],
        );
        budget
    }
}

/// Container for all planning assumptions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanAssumptions {
    pub debt: DebtAssumptions,
    pub limits: ContributionLimits,
    pub profile: RetirementProfile,
    pub budget: BudgetDefaults,
}

impl PlanAssumptions {
    /// Built-in defaults
    pub fn standard() -> Self {
        Self::default()
    }

    /// Load overrides from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> LoadResult<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load overrides from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> LoadResult<Self> {
        let loaded = LoadedAssumptions::load_from(path)?;

        Ok(Self {
            debt: DebtAssumptions::from_loaded(&loaded.debt),
            limits: ContributionLimits::from_loaded(&loaded.limits),
            profile: RetirementProfile::from_loaded(&loaded.profile),
            budget: BudgetDefaults::from_loaded(&loaded.budget),
        })
    }
}
