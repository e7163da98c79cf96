//! Tax character of savings buckets and the blended withdrawal rate

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::growth::project_balance;
use crate::accounts::RetirementAccount;
use crate::error::LoadError;

/// How withdrawals from a bucket are taxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCharacter {
    TaxFree,
    TaxDeferred,
    Taxable,
}

impl TaxCharacter {
    /// Infer the tax character from a free-form account label.
    /// Roth is checked first so "Roth 401k" is tax-free.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_lowercase();
        let has = |needle: &str| label.contains(needle);

        if has("roth") || has("hsa") {
            TaxCharacter::TaxFree
        } else if has("401") || has("403") || has("ira") || has("tsp") || has("pension") {
            TaxCharacter::TaxDeferred
        } else {
            TaxCharacter::Taxable
        }
    }
}

/// How the withdrawal tax rate is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AfterTaxMode {
    /// One rate for every dollar
    #[default]
    Flat,
    /// Per-bucket rates weighted by projected balance
    Bucketed,
    /// Same blend as `Bucketed`, with user-entered bucket rates
    Custom,
}

impl FromStr for AfterTaxMode {
    type Err = LoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flat" => Ok(AfterTaxMode::Flat),
            "bucketed" => Ok(AfterTaxMode::Bucketed),
            "custom" => Ok(AfterTaxMode::Custom),
            _ => Err(LoadError::UnknownValue {
                field: "after-tax mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Withdrawal tax rates, as fractions (0.22 = 22%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxRates {
    pub flat: f64,
    pub tax_free: f64,
    pub tax_deferred: f64,
    pub taxable: f64,
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            flat: 0.20,
            tax_free: 0.0,
            tax_deferred: 0.22,
            taxable: 0.15,
        }
    }
}

impl TaxRates {
    pub fn rate_for(&self, character: TaxCharacter) -> f64 {
        match character {
            TaxCharacter::TaxFree => self.tax_free,
            TaxCharacter::TaxDeferred => self.tax_deferred,
            TaxCharacter::Taxable => self.taxable,
        }
    }
}

/// Projected balance per tax character after `months` of contributions and growth
fn projected_by_character(accounts: &[RetirementAccount], months: i64, annual_percent: f64) -> [(TaxCharacter, f64); 3] {
    let mut totals = [
        (TaxCharacter::TaxFree, 0.0),
        (TaxCharacter::TaxDeferred, 0.0),
        (TaxCharacter::Taxable, 0.0),
    ];
    for acc in accounts {
        let projected = project_balance(acc.balance.max(0.0), acc.contribution.max(0.0), months, annual_percent);
        let character = acc.tax_character();
        if let Some(slot) = totals.iter_mut().find(|(c, _)| *c == character) {
            slot.1 += projected;
        }
    }
    totals
}

/// Effective tax rate on withdrawals at the horizon, in [0, 1]
pub fn effective_withdrawal_tax_rate(
    mode: AfterTaxMode,
    rates: &TaxRates,
    accounts: &[RetirementAccount],
    months: i64,
    annual_percent: f64,
) -> f64 {
    match mode {
        AfterTaxMode::Flat => rates.flat.clamp(0.0, 1.0),
        AfterTaxMode::Bucketed | AfterTaxMode::Custom => {
            let projected = projected_by_character(accounts, months, annual_percent);
            let total: f64 = projected.iter().map(|(_, b)| b).sum();
            if total <= 0.0 {
                return 0.0;
            }
            projected
                .iter()
                .map(|(character, balance)| balance / total * rates.rate_for(*character))
                .sum::<f64>()
                .clamp(0.0, 1.0)
        }
    }
}

/// Share of current retirement balances in each tax bucket, in percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TaxDiversification {
    pub tax_free_percent: f64,
    pub tax_deferred_percent: f64,
    pub taxable_percent: f64,
    pub total_balance: f64,
}

impl TaxDiversification {
    /// Education accounts are left out
    pub fn from_accounts(accounts: &[RetirementAccount]) -> Self {
        let mut by_character = [0.0; 3];
        for acc in accounts.iter().filter(|a| a.counts_toward_retirement()) {
            let index = match acc.tax_character() {
                TaxCharacter::TaxFree => 0,
                TaxCharacter::TaxDeferred => 1,
                TaxCharacter::Taxable => 2,
            };
            by_character[index] += acc.balance.max(0.0);
        }

        let total: f64 = by_character.iter().sum();
        if total <= 0.0 {
            return Self::default();
        }
        Self {
            tax_free_percent: by_character[0] / total * 100.0,
            tax_deferred_percent: by_character[1] / total * 100.0,
            taxable_percent: by_character[2] / total * 100.0,
            total_balance: total,
        }
    }
}
