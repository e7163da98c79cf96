//! Expense records and saved monthly budgets

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single spending record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(description: impl Into<String>, amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date,
        }
    }

    pub fn in_month(&self, year: i32, month: u32) -> bool {
        self.date.year() == year && self.date.month() == month
    }
}

/// Expenses falling in one calendar month
pub fn expenses_in_month(expenses: &[Expense], year: i32, month: u32) -> Vec<Expense> {
    expenses.iter().filter(|e| e.in_month(year, month)).cloned().collect()
}

/// Saved monthly budgets keyed `monthlyBudget_{year}-{month}` (month 1-12, no padding)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetBook {
    budgets: BTreeMap<String, f64>,
    default_budget: f64,
}

impl BudgetBook {
    pub fn new(default_budget: f64) -> Self {
        Self {
            budgets: BTreeMap::new(),
            default_budget,
        }
    }

    pub fn key(year: i32, month: u32) -> String {
        format!("monthlyBudget_{year}-{month}")
    }

    pub fn with_budget(mut self, year: i32, month: u32, amount: f64) -> Self {
        self.set(year, month, amount);
        self
    }

    pub fn set(&mut self, year: i32, month: u32, amount: f64) {
        self.budgets.insert(Self::key(year, month), amount);
    }

    /// Insert a raw key/value pair, e.g. from a key-value store export
    pub fn insert_raw(&mut self, key: impl Into<String>, amount: f64) {
        self.budgets.insert(key.into(), amount);
    }

    /// Saved budget for the month, or the default
    pub fn get(&self, year: i32, month: u32) -> f64 {
        self.budgets
            .get(&Self::key(year, month))
            .copied()
            .unwrap_or(self.default_budget)
    }

    pub fn for_date(&self, date: NaiveDate) -> f64 {
        self.get(date.year(), date.month())
    }

    pub fn default_budget(&self) -> f64 {
        self.default_budget
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(BudgetBook::key(2026, 3), "monthlyBudget_2026-3");
        assert_eq!(BudgetBook::key(2026, 11), "monthlyBudget_2026-11");
    }

    #[test]
    fn test_saved_budget_or_default() {
        let mut book = BudgetBook::new(2000.0).with_budget(2026, 2, 2400.0);
        book.insert_raw("monthlyBudget_2026-4", 1800.0);
        assert_eq!(book.get(2026, 2), 2400.0);
        assert_eq!(book.get(2026, 4), 1800.0);
        assert_eq!(book.get(2026, 3), 2000.0);
        assert_eq!(book.for_date(NaiveDate::from_ymd_opt(2026, 2, 17).unwrap()), 2400.0);
    }

    #[test]
    fn test_month_filter() {
        let d = |m, day| NaiveDate::from_ymd_opt(2026, m, day).unwrap();
        let expenses = vec![
            Expense::new("Rent", 1200.0, "Room rent", d(1, 1)),
            Expense::new("Groceries", 85.0, "Grocery", d(2, 3)),
            Expense::new("Dinner", 60.0, "Food", d(2, 14)),
        ];
        assert_eq!(expenses_in_month(&expenses, 2026, 2).len(), 2);
        assert!(expenses_in_month(&expenses, 2025, 2).is_empty());
    }
}
