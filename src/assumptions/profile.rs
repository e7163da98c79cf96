//! Retirement plan profile: the reference savings path a plan is judged against

use super::loader::{apply, Overrides};
use crate::retirement::project_balance;

/// Fixed parameters of the savings plan
#[derive(Debug, Clone, PartialEq)]
pub struct RetirementProfile {
    /// Age at which the plan path starts
    pub start_age: f64,

    /// Age at which the target portfolio value should be reached
    pub target_retirement_age: f64,

    /// Balance at the start of the plan path
    pub starting_balance: f64,

    /// Planned monthly contribution along the path
    pub base_monthly_contribution: f64,

    /// Portfolio value targeted at retirement
    pub target_portfolio_value: f64,

    /// Expected annual return, in percent
    pub annual_return_percent: f64,
}

impl Default for RetirementProfile {
    fn default() -> Self {
        Self {
            start_age: 33.0,
            target_retirement_age: 50.0,
            starting_balance: 94_000.0,
            base_monthly_contribution: 2_600.0,
            target_portfolio_value: 1_270_000.0,
            annual_return_percent: 7.0,
        }
    }
}

impl RetirementProfile {
    pub fn from_loaded(overrides: &Overrides) -> Self {
        let mut profile = Self::default();
        apply(
            overrides,
            "retirement profile",
            &mut [
                ("start_age", &mut profile.start_age),
                ("target_retirement_age", &mut profile.target_retirement_age),
                ("starting_balance", &mut profile.starting_balance),
                ("base_monthly_contribution", &mut profile.base_monthly_contribution),
                ("target_portfolio_value", &mut profile.target_portfolio_value),
                ("annual_return_percent", &mut profile.annual_return_percent),
            ],
        );
        profile
    }

    /// Months since the plan path started
    pub fn months_elapsed(&self, current_age: f64) -> i64 {
        (((current_age - self.start_age) * 12.0).round() as i64).max(0)
    }

    /// Months left until the target retirement age
    pub fn remaining_months(&self, current_age: f64) -> i64 {
        (((self.target_retirement_age - current_age) * 12.0).round() as i64).max(0)
    }

    /// Balance the plan path expects after `months_elapsed` months
    pub fn target_balance(&self, months_elapsed: i64) -> f64 {
        project_balance(
            self.starting_balance,
            self.base_monthly_contribution,
            months_elapsed,
            self.annual_return_percent,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_month_counts() {
        let profile = RetirementProfile::default();
        assert_eq!(profile.months_elapsed(33.0), 0);
        assert_eq!(profile.months_elapsed(30.0), 0);
        assert_eq!(profile.months_elapsed(34.5), 18);
        assert_eq!(profile.remaining_months(34.5), 186);
        assert_eq!(profile.remaining_months(52.0), 0);
    }

    #[test]
    fn test_target_path_starts_at_starting_balance() {
        let profile = RetirementProfile::default();
        assert_relative_eq!(profile.target_balance(0), 94_000.0);
        assert!(profile.target_balance(12) > 94_000.0 + 12.0 * 2_600.0);
    }
}
