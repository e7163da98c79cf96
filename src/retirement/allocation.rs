//! Contribution waterfall across tax buckets

use std::fmt;

use serde::Serialize;

use super::tax::TaxCharacter;
use crate::assumptions::ContributionLimits;

/// Destination of a monthly contribution, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContributionBucket {
    /// Tax-free growth
    RothIra,
    /// Triple-tax-advantaged
    Hsa,
    /// Tax-deferred
    Traditional401k,
    /// Taxable, uncapped
    Brokerage,
}

impl ContributionBucket {
    /// Waterfall order
    pub const PRIORITY: [ContributionBucket; 4] = [
        ContributionBucket::RothIra,
        ContributionBucket::Hsa,
        ContributionBucket::Traditional401k,
        ContributionBucket::Brokerage,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ContributionBucket::RothIra => "Roth IRA",
            ContributionBucket::Hsa => "HSA",
            ContributionBucket::Traditional401k => "401k",
            ContributionBucket::Brokerage => "Brokerage",
        }
    }

    pub fn tax_character(&self) -> TaxCharacter {
        match self {
            ContributionBucket::RothIra | ContributionBucket::Hsa => TaxCharacter::TaxFree,
            ContributionBucket::Traditional401k => TaxCharacter::TaxDeferred,
            ContributionBucket::Brokerage => TaxCharacter::Taxable,
        }
    }
}

impl fmt::Display for ContributionBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Monthly amount routed to one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Allocation {
    pub bucket: ContributionBucket,
    pub monthly_amount: f64,
    /// Monthly cap applied, `None` for the uncapped bucket
    pub monthly_cap: Option<f64>,
}

impl Allocation {
    /// Whether this bucket is filled to its cap
    pub fn is_maxed(&self) -> bool {
        self.monthly_cap
            .is_some_and(|cap| self.monthly_amount >= cap - 1e-9)
    }
}

/// Split `required_monthly` across the buckets in priority order, filling each
/// up to its annual limit / 12. Every bucket appears in the result; whatever the
/// capped buckets cannot take lands in brokerage.
pub fn allocate_contributions(required_monthly: f64, limits: &ContributionLimits) -> Vec<Allocation> {
    let mut remaining = required_monthly.max(0.0);

    ContributionBucket::PRIORITY
        .into_iter()
        .map(|bucket| {
            let cap = limits.monthly_cap(bucket);
            let amount = match cap {
                Some(cap) => remaining.min(cap.max(0.0)),
                None => remaining,
            };
            remaining -= amount;
            Allocation {
                bucket,
                monthly_amount: amount,
                monthly_cap: cap,
            }
        })
        .collect()
}

/// How close a contribution is to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContributionStatus {
    Reached,
    /// Within 80% of the target
    Close,
    Behind,
}

impl ContributionStatus {
    pub fn classify(contribution: f64, target: f64) -> Self {
        if contribution >= target {
            ContributionStatus::Reached
        } else if contribution >= target * 0.8 {
            ContributionStatus::Close
        } else {
            ContributionStatus::Behind
        }
    }
}
