//! Debt-side assumptions: payment rules, simulation horizon, risk ceilings

use super::loader::{apply, Overrides};

/// Rules the payoff simulation and risk scoring run under
#[derive(Debug, Clone, PartialEq)]
pub struct DebtAssumptions {
    /// Household monthly income used for debt-to-income
    pub monthly_income: f64,

    /// Hard cap on simulated months (30 years)
    pub max_months: u32,

    /// Smallest payment ever applied to an active account
    pub minimum_payment_floor: f64,

    /// Share of balance paid when no payment is configured
    pub fallback_payment_rate: f64,

    /// Balances below this are treated as paid off
    pub dust_threshold: f64,

    /// Weighted APR (percent) that maps to a full APR risk score
    pub apr_ceiling: f64,

    /// Debt-to-income (percent) that maps to a full DTI risk score
    pub dti_ceiling: f64,
}

impl Default for DebtAssumptions {
    fn default() -> Self {
        Self {
            monthly_income: 5000.0,
            max_months: 360,
            minimum_payment_floor: 25.0,
            fallback_payment_rate: 0.02,
            dust_threshold: 0.01,
            apr_ceiling: 25.0,
            dti_ceiling: 40.0,
        }
    }
}

impl DebtAssumptions {
    pub fn from_loaded(overrides: &Overrides) -> Self {
        let mut debt = Self::default();
        let mut max_months = debt.max_months as f64;
        apply(
            overrides,
            "debt",
            &mut [
                ("monthly_income", &mut debt.monthly_income),
                ("max_months", &mut max_months),
                ("minimum_payment_floor", &mut debt.minimum_payment_floor),
                ("fallback_payment_rate", &mut debt.fallback_payment_rate),
                ("dust_threshold", &mut debt.dust_threshold),
                ("apr_ceiling", &mut debt.apr_ceiling),
                ("dti_ceiling", &mut debt.dti_ceiling),
            ],
        );
        debt.max_months = max_months.max(0.0).round() as u32;
        debt
    }
}
