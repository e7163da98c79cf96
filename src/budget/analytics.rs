//! Spending breakdowns, trends and month-over-month insights

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use super::book::{BudgetBook, Expense};
use crate::error::LoadError;

/// Spending in one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub amount: f64,
    /// Share of total spending, in percent
    pub percentage: f64,
}

/// Spending per category, largest first
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategorySpend> {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut by_category: HashMap<&str, f64> = HashMap::new();
    for expense in expenses {
        *by_category.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut breakdown: Vec<CategorySpend> = by_category
        .into_iter()
        .map(|(category, amount)| CategorySpend {
            category: category.to_string(),
            amount,
            percentage: if total > 0.0 { amount / total * 100.0 } else { 0.0 },
        })
        .collect();
    breakdown.sort_by(|a, b| b.amount.total_cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    breakdown
}

/// Window for trend statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendRange {
    /// Last 30 days, one point per day
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    YearToDate,
    OneYear,
    ThreeYears,
    FiveYears,
    /// Back to the earliest expense
    All,
}

impl FromStr for TrendRange {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1M" => Ok(TrendRange::OneMonth),
            "3M" => Ok(TrendRange::ThreeMonths),
            "6M" => Ok(TrendRange::SixMonths),
            "YTD" => Ok(TrendRange::YearToDate),
            "1Y" => Ok(TrendRange::OneYear),
            "3Y" => Ok(TrendRange::ThreeYears),
            "5Y" => Ok(TrendRange::FiveYears),
            "ALL" => Ok(TrendRange::All),
            _ => Err(LoadError::UnknownValue {
                field: "trend range",
                value: s.to_string(),
            }),
        }
    }
}

/// Spending against budget for one period (a month, or a day for the 1M range)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub label: String,
    pub start: NaiveDate,
    pub total_spent: f64,
    pub budget: f64,
    pub is_over_budget: bool,
}

/// Trend points in chronological order, ending at `today`
pub fn trend_stats(expenses: &[Expense], range: TrendRange, today: NaiveDate, book: &BudgetBook) -> Vec<PeriodStats> {
    if range == TrendRange::OneMonth {
        return daily_stats(expenses, today, book);
    }

    let months = match range {
        TrendRange::ThreeMonths => 3,
        TrendRange::YearToDate => today.month(),
        TrendRange::OneYear => 12,
        TrendRange::ThreeYears => 36,
        TrendRange::FiveYears => 60,
        TrendRange::All => match expenses.iter().map(|e| e.date).min() {
            Some(earliest) => {
                let span = (today.year() - earliest.year()) * 12 + today.month() as i32 - earliest.month() as i32;
                span.max(0) as u32 + 1
            }
            None => 6,
        },
        TrendRange::SixMonths | TrendRange::OneMonth => 6,
    };

    let this_month = today.with_day(1).unwrap_or(today);
    let mut stats: Vec<PeriodStats> = (0..months)
        .filter_map(|back| this_month.checked_sub_months(Months::new(back)))
        .map(|start| {
            let total_spent: f64 = expenses
                .iter()
                .filter(|e| e.in_month(start.year(), start.month()))
                .map(|e| e.amount)
                .sum();
            let budget = book.for_date(start);
            PeriodStats {
                label: start.format("%b %Y").to_string(),
                start,
                total_spent,
                budget,
                is_over_budget: total_spent > budget,
            }
        })
        .collect();
    stats.reverse();
    stats
}

/// Last 30 days; each day's budget is its month's budget / 30
fn daily_stats(expenses: &[Expense], today: NaiveDate, book: &BudgetBook) -> Vec<PeriodStats> {
    (0..30)
        .rev()
        .map(|back| today - Duration::days(back))
        .map(|day| {
            let total_spent: f64 = expenses.iter().filter(|e| e.date == day).map(|e| e.amount).sum();
            let budget = book.for_date(day) / 30.0;
            PeriodStats {
                label: day.format("%-d %b").to_string(),
                start: day,
                total_spent,
                budget,
                is_over_budget: total_spent > budget,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
    pub details: String,
}

const CHANGE_THRESHOLD_PERCENT: f64 = 10.0;
const CATEGORY_SPIKE: f64 = 100.0;
const FOOD_LIMIT: f64 = 500.0;

/// Compare this month's spending with last month's
pub fn generate_insights(current: &[Expense], previous: &[Expense]) -> Vec<Insight> {
    let mut insights = Vec::new();
    let current_total: f64 = current.iter().map(|e| e.amount).sum();
    let previous_total: f64 = previous.iter().map(|e| e.amount).sum();

    if previous_total > 0.0 {
        let change = (current_total - previous_total) / previous_total * 100.0;
        if change > CHANGE_THRESHOLD_PERCENT {
            insights.push(Insight {
                kind: InsightKind::Warning,
                message: format!("Spending increased by {change:.1}%"),
                details: format!(
                    "You spent ${:.2} more than last month.",
                    current_total - previous_total
                ),
            });
        } else if -change > CHANGE_THRESHOLD_PERCENT {
            insights.push(Insight {
                kind: InsightKind::Success,
                message: format!("Great job! Spending down {:.1}%", -change),
                details: format!(
                    "You saved ${:.2} compared to last month.",
                    previous_total - current_total
                ),
            });
        }
    }

    let current_breakdown = category_breakdown(current);
    let previous_breakdown = category_breakdown(previous);

    for category in &current_breakdown {
        let Some(before) = previous_breakdown.iter().find(|p| p.category == category.category) else {
            continue;
        };
        let diff = category.amount - before.amount;
        if diff > CATEGORY_SPIKE {
            insights.push(Insight {
                kind: InsightKind::Warning,
                message: format!("{} spending spiked", category.category),
                details: format!("You spent ${diff:.0} more on {} this month.", category.category),
            });
        }
    }

    let food = current_breakdown
        .iter()
        .find(|c| c.category == "Food")
        .map(|c| c.amount)
        .unwrap_or(0.0);
    if food > FOOD_LIMIT {
        insights.push(Insight {
            kind: InsightKind::Info,
            message: "Consider cooking more at home".to_string(),
            details: format!("Food & Dining expenses are high (${food:.0}) this month."),
        });
    }

    insights
}

/// Colour band of budget usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressLevel {
    /// Under 50% used
    Comfortable,
    /// Under 80% used
    Caution,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetProgress {
    pub spent: f64,
    pub budget: f64,
    /// Share of budget used, capped at 100
    pub percent: f64,
    pub remaining: f64,
    pub level: ProgressLevel,
}

pub fn budget_progress(spent: f64, budget: f64) -> BudgetProgress {
    let percent = if budget > 0.0 { (spent / budget * 100.0).min(100.0) } else { 0.0 };
    let level = if percent < 50.0 {
        ProgressLevel::Comfortable
    } else if percent < 80.0 {
        ProgressLevel::Caution
    } else {
        ProgressLevel::Critical
    };

    BudgetProgress {
        spent,
        budget,
        percent,
        remaining: budget - spent,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn february() -> Vec<Expense> {
        vec![
            Expense::new("Rent", 1200.0, "Room rent", d(2026, 2, 1)),
            Expense::new("Market", 200.0, "Grocery", d(2026, 2, 6)),
            Expense::new("Takeout", 150.0, "Food", d(2026, 2, 9)),
        ]
    }

    fn march() -> Vec<Expense> {
        vec![
            Expense::new("Rent", 1200.0, "Room rent", d(2026, 3, 1)),
            Expense::new("Market", 420.0, "Grocery", d(2026, 3, 5)),
            Expense::new("Restaurants", 560.0, "Food", d(2026, 3, 12)),
        ]
    }

    #[test]
    fn test_breakdown_sorted_with_shares() {
        let breakdown = category_breakdown(&february());
        assert_eq!(breakdown[0].category, "Room rent");
        assert_eq!(breakdown[2].category, "Food");
        let total: f64 = breakdown.iter().map(|c| c.percentage).sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-9);
        assert!(category_breakdown(&[]).is_empty());
    }

    #[test]
    fn test_insights_flag_increase_spikes_and_food() {
        let insights = generate_insights(&march(), &february());
        // 2180 vs 1550: +40.6%
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].message, "Spending increased by 40.6%");
        assert_eq!(insights[0].details, "You spent $630.00 more than last month.");

        let spikes: Vec<&str> = insights.iter().map(|i| i.message.as_str()).collect();
        assert!(spikes.contains(&"Food spending spiked"));
        assert!(spikes.contains(&"Grocery spending spiked"));
        assert!(!spikes.contains(&"Room rent spending spiked"));

        let last = insights.last().unwrap();
        assert_eq!(last.kind, InsightKind::Info);
        assert_eq!(last.details, "Food & Dining expenses are high ($560) this month.");
    }

    #[test]
    fn test_insights_celebrate_decrease() {
        let insights = generate_insights(&february(), &march());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Success);
        assert_eq!(insights[0].message, "Great job! Spending down 28.9%");
    }

    #[test]
    fn test_small_change_no_insight() {
        let insights = generate_insights(&february(), &february());
        assert!(insights.is_empty());
        assert!(generate_insights(&march()[..1], &[]).is_empty());
    }

    #[test]
    fn test_monthly_trend() {
        let mut expenses = february();
        expenses.extend(march());
        let book = BudgetBook::new(2000.0).with_budget(2026, 3, 2100.0);

        let stats = trend_stats(&expenses, TrendRange::ThreeMonths, d(2026, 3, 20), &book);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].label, "Jan 2026");
        assert_eq!(stats[0].total_spent, 0.0);
        assert_eq!(stats[1].total_spent, 1550.0);
        assert!(!stats[1].is_over_budget);
        assert_eq!(stats[2].budget, 2100.0);
        assert!(stats[2].is_over_budget);
    }

    #[test]
    fn test_all_and_ytd_ranges() {
        let expenses = vec![Expense::new("Old", 10.0, "Other", d(2025, 11, 3))];
        let book = BudgetBook::new(2000.0);
        let all = trend_stats(&expenses, TrendRange::All, d(2026, 3, 1), &book);
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].start, d(2025, 11, 1));

        let ytd = trend_stats(&expenses, TrendRange::YearToDate, d(2026, 3, 1), &book);
        assert_eq!(ytd.len(), 3);
        assert_eq!(trend_stats(&[], TrendRange::All, d(2026, 3, 1), &book).len(), 6);
    }

    #[test]
    fn test_daily_trend() {
        let book = BudgetBook::new(3000.0);
        let expenses = vec![Expense::new("Coffee", 150.0, "Food", d(2026, 3, 20))];
        let stats = trend_stats(&expenses, TrendRange::OneMonth, d(2026, 3, 20), &book);
        assert_eq!(stats.len(), 30);
        assert_eq!(stats[0].start, d(2026, 2, 19));
        let last = stats.last().unwrap();
        assert_eq!(last.label, "20 Mar");
        assert_eq!(last.budget, 100.0);
        assert!(last.is_over_budget);
    }

    #[test]
    fn test_budget_progress() {
        let p = budget_progress(900.0, 2000.0);
        assert_eq!(p.percent, 45.0);
        assert_eq!(p.level, ProgressLevel::Comfortable);
        assert_eq!(budget_progress(1700.0, 2000.0).level, ProgressLevel::Critical);
        assert_eq!(budget_progress(2500.0, 2000.0).percent, 100.0);
        assert_eq!(budget_progress(100.0, 0.0).percent, 0.0);
    }

    #[test]
    fn test_range_parsing() {
        assert_eq!("ytd".parse::<TrendRange>().unwrap(), TrendRange::YearToDate);
        assert_eq!("All".parse::<TrendRange>().unwrap(), TrendRange::All);
        assert!("2W".parse::<TrendRange>().is_err());
    }
}
