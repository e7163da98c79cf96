//! Retirement plan evaluation against the reference savings path
//!
//! A plan is evaluated for one month: the actual balance is compared with
//! where the profile's path says it should be, and, when account detail is
//! supplied, each account is scored against earlier snapshots of the year.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use super::growth::required_monthly_contribution;
use crate::accounts::{GoalType, RetirementAccount};
use crate::assumptions::RetirementProfile;

/// Balances of every account at one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementSnapshot {
    pub date: NaiveDate,
    pub accounts: Vec<RetirementAccount>,
}

impl RetirementSnapshot {
    pub fn new(date: NaiveDate, accounts: Vec<RetirementAccount>) -> Self {
        Self { date, accounts }
    }

    fn account(&self, account_type: &str) -> Option<&RetirementAccount> {
        self.accounts.iter().find(|a| a.account_type == account_type)
    }
}

/// Inputs for one plan evaluation; everything is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanRequest {
    /// Defaults to the profile's start age
    pub current_age: Option<f64>,

    /// Month being evaluated; defaults to the evaluation date
    pub as_of: Option<NaiveDate>,

    /// Used only when no accounts are given
    pub current_total_invested_balance: Option<f64>,

    /// Overrides the profile's target
    pub target_portfolio_value: Option<f64>,

    pub actual_monthly_contribution: Option<f64>,
    pub one_time_additions: Option<f64>,
    pub accounts: Vec<RetirementAccount>,
}

/// Position relative to the plan path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanStatus {
    Ahead,
    OnTrack,
    SlightlyBehind,
    Behind,
}

impl PlanStatus {
    /// Ahead at or above target, on track within 5% below, slightly behind within 10%
    pub fn classify(difference: f64, target: f64) -> Self {
        if difference >= 0.0 {
            PlanStatus::Ahead
        } else if difference >= -0.05 * target {
            PlanStatus::OnTrack
        } else if difference >= -0.10 * target {
            PlanStatus::SlightlyBehind
        } else {
            PlanStatus::Behind
        }
    }

    pub fn is_behind(&self) -> bool {
        matches!(self, PlanStatus::SlightlyBehind | PlanStatus::Behind)
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlanStatus::Ahead => "Ahead",
            PlanStatus::OnTrack => "On Track",
            PlanStatus::SlightlyBehind => "Slightly Behind",
            PlanStatus::Behind => "Behind",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Account growth relative to the portfolio average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScorecardStatus {
    Leading,
    OnPlan,
    Behind,
}

impl ScorecardStatus {
    /// Leading / behind when more than two points off the average
    pub fn classify(growth_percent: f64, portfolio_average: f64) -> Self {
        if growth_percent > portfolio_average + 2.0 {
            ScorecardStatus::Leading
        } else if growth_percent < portfolio_average - 2.0 {
            ScorecardStatus::Behind
        } else {
            ScorecardStatus::OnPlan
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScorecardStatus::Leading => "Leading",
            ScorecardStatus::OnPlan => "On Plan",
            ScorecardStatus::Behind => "Behind",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountScorecard {
    pub account_type: String,
    pub goal_type: GoalType,
    pub balance: f64,
    /// Contributions so far this year, including this month
    pub ytd_contributions: f64,
    pub ytd_growth_dollars: f64,
    pub ytd_growth_percent: f64,
    pub status: ScorecardStatus,
}

/// Where this month's portfolio change came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthAttribution {
    /// Account with the largest market growth this month
    pub top_growth_driver: Option<String>,
    pub weakest_contributor: Option<String>,
    pub market_growth_percent: f64,
    pub contribution_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YtdSummary {
    pub total_ytd_contributions: f64,
    pub total_ytd_growth: f64,
    pub ytd_growth_percent: f64,
}

/// Outcome of a plan evaluation. Money and percent figures are rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlanResult {
    pub as_of: NaiveDate,

    /// Where the plan path says the balance should be now
    pub current_target_balance: f64,
    pub actual_balance: f64,
    pub difference_amount: f64,
    pub difference_percent: f64,
    pub status: PlanStatus,
    pub remaining_months: i64,

    /// Monthly contribution needed to reach the target, only when behind
    pub required_monthly_contribution: Option<f64>,

    /// Contributions above the base plus one-time additions
    pub bonus_additions: Option<f64>,

    /// Lead over the path expressed in months of base contributions, only when ahead
    pub buffer_months: Option<f64>,

    pub commentary: String,
    pub account_scorecards: Vec<AccountScorecard>,
    pub growth_attribution: Option<GrowthAttribution>,
    pub ytd_summary: Option<YtdSummary>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// "$1,234.50", cents dropped for whole amounts
fn money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{frac:02}")
    }
}

/// Evaluate `request` against `profile`. `history` holds earlier snapshots in
/// any order; `today` is used when the request names no month.
pub fn evaluate_plan(
    request: &PlanRequest,
    profile: &RetirementProfile,
    history: &[RetirementSnapshot],
    today: NaiveDate,
) -> RetirementPlanResult {
    let as_of = request.as_of.unwrap_or(today);
    let current_age = request.current_age.unwrap_or(profile.start_age);
    let months_elapsed = profile.months_elapsed(current_age);
    let remaining_months = profile.remaining_months(current_age);

    let actual = actual_balance(request);
    let target = profile.target_balance(months_elapsed);
    let difference = actual - target;
    let difference_percent = if target == 0.0 { 0.0 } else { difference / target * 100.0 };
    let status = PlanStatus::classify(difference, target);

    let required = if status.is_behind() && remaining_months > 0 {
        let target_value = request
            .target_portfolio_value
            .unwrap_or(profile.target_portfolio_value);
        let pmt = required_monthly_contribution(actual, target_value, remaining_months, profile.annual_return_percent);
        Some(round2(pmt.max(profile.base_monthly_contribution)))
    } else {
        None
    };

    let bonus = bonus_additions(request, profile.base_monthly_contribution);
    let buffer_months = (status == PlanStatus::Ahead && profile.base_monthly_contribution > 0.0)
        .then(|| round2(difference / profile.base_monthly_contribution));

    let mut result = RetirementPlanResult {
        as_of,
        current_target_balance: round2(target),
        actual_balance: round2(actual),
        difference_amount: round2(difference),
        difference_percent: round2(difference_percent),
        status,
        remaining_months,
        required_monthly_contribution: required,
        bonus_additions: (bonus > 0.0).then(|| round2(bonus)),
        buffer_months,
        commentary: String::new(),
        account_scorecards: Vec::new(),
        growth_attribution: None,
        ytd_summary: None,
    };

    if !request.accounts.is_empty() {
        score_accounts(&request.accounts, history, as_of, &mut result);
    }

    result.commentary = commentary(&result, profile, bonus);

    debug!(
        "Plan {} as of {}: actual {:.2} vs target {:.2} ({:+.2}%)",
        result.status, as_of, result.actual_balance, result.current_target_balance, result.difference_percent
    );

    result
}

/// Retirement accounts only when accounts are given, the legacy total otherwise
fn actual_balance(request: &PlanRequest) -> f64 {
    if request.accounts.is_empty() {
        return request.current_total_invested_balance.unwrap_or(0.0);
    }
    request
        .accounts
        .iter()
        .filter(|a| a.counts_toward_retirement())
        .map(|a| a.balance)
        .sum()
}

fn bonus_additions(request: &PlanRequest, base_contribution: f64) -> f64 {
    let above_base = request
        .actual_monthly_contribution
        .map(|c| (c - base_contribution).max(0.0))
        .unwrap_or(0.0);
    let one_time = request.one_time_additions.unwrap_or(0.0).max(0.0);
    above_base + one_time
}

fn score_accounts(
    accounts: &[RetirementAccount],
    history: &[RetirementSnapshot],
    as_of: NaiveDate,
    result: &mut RetirementPlanResult,
) {
    let previous = history
        .iter()
        .filter(|s| s.date < as_of)
        .max_by_key(|s| s.date);

    let mut year_to_date: Vec<&RetirementSnapshot> = history
        .iter()
        .filter(|s| s.date.year() == as_of.year() && s.date < as_of)
        .collect();
    year_to_date.sort_by_key(|s| s.date);

    let mut scorecards = Vec::with_capacity(accounts.len());
    let mut market_growth: Vec<(&str, f64)> = Vec::with_capacity(accounts.len());
    let mut total_contributions = 0.0;
    let mut total_growth = 0.0;
    let mut total_previous = 0.0;

    for acc in accounts {
        let previous_balance = previous
            .and_then(|s| s.account(&acc.account_type))
            .map(|a| a.balance)
            .unwrap_or(0.0);

        let prior_contributions: f64 = year_to_date
            .iter()
            .filter_map(|s| s.account(&acc.account_type))
            .map(|a| a.contribution)
            .sum();
        let ytd_contributions = prior_contributions + acc.contribution;

        let year_start_balance = year_to_date
            .iter()
            .find_map(|s| s.account(&acc.account_type))
            .map(|a| a.balance)
            .unwrap_or(previous_balance);

        let ytd_growth = acc.balance - year_start_balance - ytd_contributions;
        let ytd_growth_percent = if year_start_balance > 0.0 {
            ytd_growth / year_start_balance * 100.0
        } else {
            0.0
        };

        // Portfolio totals count snapshot contributions only; the current month
        // shows up in the per-account figures
        total_contributions += prior_contributions;
        total_growth += ytd_growth;
        total_previous += previous_balance;
        market_growth.push((acc.account_type.as_str(), acc.balance - previous_balance - acc.contribution));

        // Empty accounts with nothing contributed are behind regardless of growth
        let status = if acc.balance <= 0.0 && ytd_contributions <= 0.0 {
            ScorecardStatus::Behind
        } else {
            ScorecardStatus::OnPlan
        };

        scorecards.push(AccountScorecard {
            account_type: acc.account_type.clone(),
            goal_type: acc.goal_type,
            balance: round2(acc.balance),
            ytd_contributions: round2(ytd_contributions),
            ytd_growth_dollars: round2(ytd_growth),
            ytd_growth_percent: round2(ytd_growth_percent),
            status,
        });
    }

    let portfolio_average = if total_previous > 0.0 {
        total_growth / total_previous * 100.0
    } else {
        0.0
    };

    for card in scorecards.iter_mut().filter(|c| c.status != ScorecardStatus::Behind) {
        card.status = ScorecardStatus::classify(card.ytd_growth_percent, portfolio_average);
    }

    result.account_scorecards = scorecards;
    result.growth_attribution = Some(attribute_growth(&market_growth, total_contributions, total_growth));
    result.ytd_summary = Some(YtdSummary {
        total_ytd_contributions: round2(total_contributions),
        total_ytd_growth: round2(total_growth),
        ytd_growth_percent: round2(portfolio_average),
    });
}

fn attribute_growth(market_growth: &[(&str, f64)], contributions: f64, growth: f64) -> GrowthAttribution {
    let mut top: Option<(&str, f64)> = None;
    let mut weakest: Option<(&str, f64)> = None;
    for &(name, amount) in market_growth {
        if top.map_or(true, |(_, best)| amount > best) {
            top = Some((name, amount));
        }
        if weakest.map_or(true, |(_, worst)| amount < worst) {
            weakest = Some((name, amount));
        }
    }

    let change = growth + contributions;
    let share = |part: f64| if change > 0.0 { round2(part / change * 100.0) } else { 0.0 };

    GrowthAttribution {
        top_growth_driver: top.map(|(name, _)| name.to_string()),
        weakest_contributor: weakest.map(|(name, _)| name.to_string()),
        market_growth_percent: share(growth),
        contribution_percent: share(contributions),
    }
}

fn commentary(result: &RetirementPlanResult, profile: &RetirementProfile, bonus: f64) -> String {
    let base = money(profile.base_monthly_contribution);

    let mut text = match (result.status, result.required_monthly_contribution) {
        (PlanStatus::Ahead, _) => format!(
            "Ahead of the target path. Keep the {base} base; the buffer is about {} months of contributions.",
            result.buffer_months.unwrap_or(0.0)
        ),
        (PlanStatus::OnTrack, _) => {
            format!("Tracking within 5% of target. Keep the {base} base plan steady.")
        }
        (PlanStatus::SlightlyBehind, Some(required)) => format!(
            "A modest catch-up would help; consider about {}/mo while keeping the {base} base.",
            money(required)
        ),
        (PlanStatus::SlightlyBehind, None) => {
            format!("A modest catch-up would help; keep the {base} base and review next month.")
        }
        (PlanStatus::Behind, Some(required)) => format!(
            "To close the gap, aim for about {}/mo or consider a slightly later retirement age; keep the {base} base.",
            money(required)
        ),
        (PlanStatus::Behind, None) => format!(
            "At the target age already; consider a later retirement age while keeping the {base} base."
        ),
    };

    if bonus > 0.0 {
        text.push_str(&format!(" Bonus additions this month: {}.", money(bonus)));
    }
    if let Some(driver) = result
        .growth_attribution
        .as_ref()
        .and_then(|a| a.top_growth_driver.as_deref())
    {
        text.push_str(&format!(" Top performer: {driver}."));
    }

    text
}
