//! Shared fixtures for the scorer and pipeline tests.

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::logic::features::table::FeatureRow;
use crate::logic::features::{FeatureSchema, FeatureTable};
use crate::logic::model::sequence::SequenceBackend;
use crate::logic::model::SequenceConfig;

/// Standard normal draw (Box-Muller)
pub fn standard_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// `rows x cols` table of N(0, 1) values whose trailing `shifted` rows are
/// moved by `shift` in every column.
pub fn shifted_table(rows: usize, cols: usize, shifted: usize, shift: f64, seed: u64) -> FeatureTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let schema = FeatureSchema::new((0..cols).map(|c| format!("feature_{}", c)).collect());
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

    let rows = (0..rows)
        .map(|i| {
            let offset = if i + shifted >= rows { shift } else { 0.0 };
            FeatureRow {
                timestamp: start + Duration::minutes(i as i64),
                values: (0..cols).map(|_| standard_normal(&mut rng) + offset).collect(),
            }
        })
        .collect();

    FeatureTable::new(schema, rows)
}

/// Backend provider for runs that skip the sequence scorer
pub fn no_backend(_config: &SequenceConfig) -> Option<Box<dyn SequenceBackend>> {
    None
}
