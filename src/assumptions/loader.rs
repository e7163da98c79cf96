//! CSV-based assumption loader
//!
//! Each table in data/assumptions/ is a two-column `Key,Value` file.
//! Missing files leave the built-in defaults in place.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};

use crate::error::{LoadError, LoadResult};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

pub const DEBT_FILE: &str = "debt.csv";
pub const LIMITS_FILE: &str = "contribution_limits.csv";
pub const PROFILE_FILE: &str = "retirement_profile.csv";
pub const BUDGET_FILE: &str = "budget.csv";

/// Key/value overrides read from a single table
pub type Overrides = HashMap<String, f64>;

/// Read a `Key,Value` table from any reader
pub fn load_key_values_from_reader<R: Read>(reader: R) -> LoadResult<Overrides> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut values = HashMap::new();

    for result in reader.records() {
        let record = result?;
        let key = record.get(0).unwrap_or("").trim().to_string();
        let raw = record.get(1).unwrap_or("").trim();
        if key.is_empty() {
            continue;
        }
        let value: f64 = raw.parse().map_err(|_| LoadError::InvalidNumber {
            key: key.clone(),
            value: raw.to_string(),
        })?;
        values.insert(key, value);
    }

    Ok(values)
}

/// Read a `Key,Value` table; a missing file yields no overrides
pub fn load_key_values(path: &Path) -> LoadResult<Overrides> {
    if !path.exists() {
        debug!("No assumption table at {}, using defaults", path.display());
        return Ok(Overrides::new());
    }
    load_key_values_from_reader(File::open(path)?)
}

/// Apply overrides onto named fields, warning about keys nobody claimed
pub(crate) fn apply(overrides: &Overrides, table: &str, fields: &mut [(&str, &mut f64)]) {
    for (key, value) in overrides {
        let mut claimed = false;
        for (name, slot) in fields.iter_mut() {
            if *name == key.as_str() {
                **slot = *value;
                claimed = true;
            }
        }
        if !claimed {
            warn!("Ignoring unknown key '{}' in {}", key, table);
        }
    }
}

/// All assumption tables loaded from a directory
#[derive(Debug, Default)]
pub struct LoadedAssumptions {
    pub debt: Overrides,
    pub limits: Overrides,
    pub profile: Overrides,
    pub budget: Overrides,
}

impl LoadedAssumptions {
    /// Load all tables from the default path
    pub fn load_default() -> LoadResult<Self> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> LoadResult<Self> {
        Ok(Self {
            debt: load_key_values(&path.join(DEBT_FILE))?,
            limits: load_key_values(&path.join(LIMITS_FILE))?,
            profile: load_key_values(&path.join(PROFILE_FILE))?,
            budget: load_key_values(&path.join(BUDGET_FILE))?,
        })
    }
}
