//! Feature Schema - Frozen column layout for one analysis run
//!
//! **The schema is built once by the feature builder and then passed by value
//! into every scorer.** It is never stored globally, so two runs can never
//! share or leak column sets.
//!
//! ## Rules:
//! 1. Base columns always come first, in `BASE_FEATURES` order
//! 2. One-hot columns follow, metric names before sources, each sorted
//! 3. Change any of the above → increment SCHEMA_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::logic::error::DetectorError;

// ============================================================================
// SCHEMA VERSION
// ============================================================================

/// Current layout version
/// MUST be incremented when the base layout or ordering rules change
pub const SCHEMA_VERSION: u8 = 1;

/// Numeric columns every row carries, in order
pub const BASE_FEATURES: &[&str] = &[
    "value",            // 0: raw sample value
    "hour",             // 1: hour of day (0-23)
    "day_of_week",      // 2: Monday = 0
    "is_weekend",       // 3: Saturday/Sunday indicator
    "value_ma_5",       // 4: rolling mean, window 5
    "value_ma_10",      // 5: rolling mean, window 10
    "value_std_5",      // 6: rolling sample std, window 5
    "value_diff",       // 7: first difference
    "value_pct_change", // 8: percentage change
];

/// Prefix of one-hot metric name columns
pub const METRIC_NAME_PREFIX: &str = "metric_name_";

/// Prefix of one-hot source columns
pub const SOURCE_PREFIX: &str = "source_";

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub version: u8,
    pub hash: u32,
    columns: Vec<String>,
}

impl FeatureSchema {
    pub fn new(columns: Vec<String>) -> Self {
        let hash = compute_hash(&columns);
        Self {
            version: SCHEMA_VERSION,
            hash,
            columns,
        }
    }

    /// Schema of an empty run
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column index by name (O(n), schemas are small)
    #[cfg(test)]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[cfg(test)]
    pub fn name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(String::as_str)
    }

    /// Ensure a matrix width matches this schema before scoring
    pub fn check_width(&self, width: usize) -> Result<(), DetectorError> {
        if width != self.columns.len() {
            return Err(DetectorError::SchemaMismatch {
                expected: self.columns.len(),
                expected_hash: self.hash,
                actual: width,
            });
        }
        Ok(())
    }
}

/// CRC32 over version and ordered column names
fn compute_hash(columns: &[String]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[SCHEMA_VERSION]);

    for name in columns {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(names: &[&str]) -> FeatureSchema {
        FeatureSchema::new(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_hash_consistency() {
        assert_eq!(schema(&["value", "hour"]).hash, schema(&["value", "hour"]).hash);
    }

    #[test]
    fn test_hash_depends_on_order() {
        assert_ne!(schema(&["value", "hour"]).hash, schema(&["hour", "value"]).hash);
    }

    #[test]
    fn test_index_lookup() {
        let s = schema(BASE_FEATURES);
        assert_eq!(s.index_of("value"), Some(0));
        assert_eq!(s.index_of("value_pct_change"), Some(8));
        assert_eq!(s.index_of("nonexistent"), None);
        assert_eq!(s.name(1), Some("hour"));
        assert_eq!(s.name(100), None);
    }

    #[test]
    fn test_check_width() {
        let s = schema(&["a", "b", "c"]);
        assert!(s.check_width(3).is_ok());
        assert!(matches!(
            s.check_width(2),
            Err(DetectorError::SchemaMismatch { expected: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_empty_schema() {
        let s = FeatureSchema::empty();
        assert!(s.is_empty());
        assert_eq!(s.version, SCHEMA_VERSION);
    }
}
