//! Statutory annual contribution limits for the tax-advantaged buckets

use super::loader::{apply, Overrides};
use crate::retirement::ContributionBucket;

#[derive(Debug, Clone, PartialEq)]
pub struct ContributionLimits {
    /// Roth IRA annual limit
    pub roth_ira_annual: f64,

    /// HSA annual limit (self-only coverage)
    pub hsa_annual: f64,

    /// 401k elective deferral annual limit
    pub k401_annual: f64,
}

impl Default for ContributionLimits {
    fn default() -> Self {
        Self {
            roth_ira_annual: 7_000.0,
            hsa_annual: 4_150.0,
            k401_annual: 23_000.0,
        }
    }
}

impl ContributionLimits {
    pub fn from_loaded(overrides: &Overrides) -> Self {
        let mut limits = Self::default();
        apply(
            overrides,
            "contribution limits",
            &mut [
                ("roth_ira_annual", &mut limits.roth_ira_annual),
                ("hsa_annual", &mut limits.hsa_annual),
                ("k401_annual", &mut limits.k401_annual),
            ],
        );
        limits
    }

    /// Monthly cap for a bucket; `None` means uncapped
    pub fn monthly_cap(&self, bucket: ContributionBucket) -> Option<f64> {
        match bucket {
            ContributionBucket::RothIra => Some(self.roth_ira_annual / 12.0),
            ContributionBucket::Hsa => Some(self.hsa_annual / 12.0),
            ContributionBucket::Traditional401k => Some(self.k401_annual / 12.0),
            ContributionBucket::Brokerage => None,
        }
    }
}
