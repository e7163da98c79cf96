//! Overall financial health score

use serde::Serialize;

use super::plan::RetirementPlanResult;
use super::tax::TaxDiversification;

const BASELINE: f64 = 75.0;
const NO_PLAN_SCORE: u32 = 50;
const MAX_PLAN_SWING: f64 = 20.0;
const BONUS_POINTS: f64 = 5.0;
const MIN_TAX_FREE_PERCENT: f64 = 10.0;

/// One change to the score and why it was made
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub points: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthScore {
    /// 0 to 100
    pub score: u32,
    pub adjustments: Vec<ScoreAdjustment>,
    /// Single most useful next step
    pub action: String,
}

impl HealthScore {
    pub fn reasons(&self) -> impl Iterator<Item = &str> {
        self.adjustments.iter().map(|a| a.reason.as_str())
    }
}

/// Score a plan result together with current contributions and tax mix.
/// Every non-zero adjustment carries exactly one reason.
pub fn financial_health_score(
    plan: Option<&RetirementPlanResult>,
    monthly_contributions: f64,
    diversification: &TaxDiversification,
) -> HealthScore {
    let Some(plan) = plan else {
        return HealthScore {
            score: NO_PLAN_SCORE,
            adjustments: Vec::new(),
            action: "Evaluate your retirement plan to get a full score.".to_string(),
        };
    };

    let mut adjustments = Vec::new();
    let mut push = |points: f64, reason: String| {
        if points != 0.0 {
            adjustments.push(ScoreAdjustment { points, reason });
        }
    };

    let diff = plan.difference_percent;
    if diff >= 0.0 {
        push(
            (2.0 * diff).min(MAX_PLAN_SWING),
            format!("{diff:.1}% ahead of the target path"),
        );
    } else {
        push(
            -(2.0 * diff.abs()).min(MAX_PLAN_SWING),
            format!("{:.1}% behind the target path", diff.abs()),
        );
    }

    let required = plan.required_monthly_contribution.unwrap_or(0.0);
    let contributions_ok = monthly_contributions >= required;
    if contributions_ok {
        push(BONUS_POINTS, "Contributions meet the required amount".to_string());
    }

    let tax_free_ok = diversification.tax_free_percent > MIN_TAX_FREE_PERCENT;
    if tax_free_ok {
        push(
            BONUS_POINTS,
            format!("{:.1}% of savings is in tax-free accounts", diversification.tax_free_percent),
        );
    }

    let total = BASELINE + adjustments.iter().map(|a| a.points).sum::<f64>();
    let score = total.clamp(0.0, 100.0).round() as u32;

    let action = if !contributions_ok {
        format!("Raise monthly contributions to at least ${required:.0}.")
    } else if !tax_free_ok {
        "Direct new savings to a Roth IRA or HSA to build tax-free income.".to_string()
    } else if plan.status.is_behind() {
        "Hold contributions steady and re-check the plan next month.".to_string()
    } else {
        "Stay the course.".to_string()
    };

    HealthScore {
        score,
        adjustments,
        action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::RetirementAccount;
    use approx::assert_relative_eq;
    use crate::assumptions::RetirementProfile;
    use crate::retirement::{evaluate_plan, PlanRequest};
    use chrono::NaiveDate;

    fn plan(balance: f64, age: f64) -> RetirementPlanResult {
        let request = PlanRequest {
            current_age: Some(age),
            current_total_invested_balance: Some(balance),
            ..Default::default()
        };
        evaluate_plan(
            &request,
            &RetirementProfile::default(),
            &[],
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
    }

    fn mix(tax_free: f64) -> TaxDiversification {
        TaxDiversification {
            tax_free_percent: tax_free,
            tax_deferred_percent: 100.0 - tax_free,
            taxable_percent: 0.0,
            total_balance: 100_000.0,
        }
    }

    #[test]
    fn test_no_plan_is_fifty() {
        let health = financial_health_score(None, 2600.0, &mix(30.0));
        assert_eq!(health.score, 50);
        assert!(health.adjustments.is_empty());
    }

    #[test]
    fn test_ahead_caps_at_twenty() {
        // 50% ahead of 94,000
        let health = financial_health_score(Some(&plan(141_000.0, 33.0)), 2600.0, &mix(25.0));
        assert_eq!(health.adjustments[0].points, 20.0);
        assert_eq!(health.score, 100);
        assert_eq!(health.adjustments.len(), 3);
        assert_eq!(health.action, "Stay the course.");
    }

    #[test]
    fn test_plan_term_scales_two_points_per_percent() {
        // 98,700 is 5% ahead of 94,000
        let ahead = financial_health_score(Some(&plan(98_700.0, 33.0)), 2600.0, &mix(25.0));
        assert_relative_eq!(ahead.adjustments[0].points, 10.0, epsilon = 1e-9);
        assert_eq!(ahead.adjustments.len(), 3);
        assert_eq!(ahead.score, 95);

        // 91,180 is 3% behind but still on track, so nothing is required
        let behind = financial_health_score(Some(&plan(91_180.0, 33.0)), 0.0, &mix(5.0));
        assert_relative_eq!(behind.adjustments[0].points, -6.0, epsilon = 1e-9);
        assert_eq!(behind.score, 74);
    }

    #[test]
    fn test_exactly_on_path_adds_no_plan_reason() {
        let health = financial_health_score(Some(&plan(94_000.0, 33.0)), 0.0, &mix(5.0));
        // Only the contribution bonus applies
        assert_eq!(health.score, 80);
        assert_eq!(health.reasons().count(), 1);
        assert!(health.action.contains("Roth IRA or HSA"));
    }

    #[test]
    fn test_behind_loses_points_and_asks_for_more() {
        let result = plan(100_000.0, 35.0);
        let required = result.required_monthly_contribution.unwrap();
        let health = financial_health_score(Some(&result), 1000.0, &mix(20.0));
        assert_eq!(health.adjustments[0].points, -20.0);
        // 75 - 20 + 5 (tax-free)
        assert_eq!(health.score, 60);
        assert_eq!(health.adjustments.len(), 2);
        assert_eq!(health.action, format!("Raise monthly contributions to at least ${required:.0}."));
    }

    #[test]
    fn test_reasons_match_adjustments() {
        let accounts = vec![
            RetirementAccount::new("Roth IRA", 30_000.0, 0.0),
            RetirementAccount::new("401k", 70_000.0, 0.0),
        ];
        let diversification = TaxDiversification::from_accounts(&accounts);
        let health = financial_health_score(Some(&plan(96_000.0, 33.0)), 2600.0, &diversification);
        assert_eq!(health.reasons().count(), health.adjustments.len());
        assert!(health.adjustments.iter().all(|a| a.points != 0.0));
        let expected = 75.0 + health.adjustments.iter().map(|a| a.points).sum::<f64>();
        assert_eq!(health.score, expected.clamp(0.0, 100.0).round() as u32);
    }
}
