//! Feature Builder
//!
//! Turns merged raw metric records into the run's feature table and freezes
//! the column schema. Rolling statistics follow load order, not timestamp
//! order.

use std::collections::BTreeSet;

use chrono::{Datelike, Timelike};

use crate::logic::stats;
use super::record::{MetricSource, RawMetricRecord};
use super::schema::{FeatureSchema, BASE_FEATURES, METRIC_NAME_PREFIX, SOURCE_PREFIX};
use super::table::{FeatureRow, FeatureTable};

/// Short rolling window (mean and std)
pub const SHORT_WINDOW: usize = 5;

/// Long rolling window (mean)
pub const LONG_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureBuilder;

impl FeatureBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the feature table; empty input gives an empty table and schema
    pub fn build(&self, records: &[RawMetricRecord]) -> FeatureTable {
        if records.is_empty() {
            return FeatureTable::empty();
        }

        let metric_names: BTreeSet<&str> = records.iter().map(|r| r.metric_name.as_str()).collect();
        let sources: BTreeSet<MetricSource> = records.iter().map(|r| r.source).collect();
        let schema = freeze_schema(&metric_names, &sources);

        let values: Vec<f64> = records.iter().map(|r| sanitize(r.value)).collect();
        let ma_short = rolling(&values, SHORT_WINDOW, stats::mean);
        let ma_long = rolling(&values, LONG_WINDOW, stats::mean);
        let std_short = rolling(&values, SHORT_WINDOW, stats::std_sample);
        let diffs = first_difference(&values);
        let pct = percent_change(&values);

        let base = BASE_FEATURES.len();
        let name_offset = base;
        let source_offset = base + metric_names.len();

        let rows = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let weekday = record.timestamp.weekday().num_days_from_monday();

                let mut row = vec![0.0; schema.len()];
                row[0] = values[i];
                row[1] = record.timestamp.hour() as f64;
                row[2] = weekday as f64;
                row[3] = if weekday >= 5 { 1.0 } else { 0.0 };
                row[4] = ma_short[i];
                row[5] = ma_long[i];
                row[6] = std_short[i];
                row[7] = diffs[i];
                row[8] = pct[i];

                if let Some(pos) = metric_names.iter().position(|n| *n == record.metric_name) {
                    row[name_offset + pos] = 1.0;
                }
                if let Some(pos) = sources.iter().position(|s| *s == record.source) {
                    row[source_offset + pos] = 1.0;
                }

                FeatureRow {
                    timestamp: record.timestamp,
                    values: row,
                }
            })
            .collect();

        let table = FeatureTable::new(schema, rows);
        log::info!(
            "Built feature table: {} rows x {} features",
            table.len(),
            table.schema().len()
        );
        table
    }
}

fn freeze_schema(metric_names: &BTreeSet<&str>, sources: &BTreeSet<MetricSource>) -> FeatureSchema {
    let mut columns: Vec<String> = BASE_FEATURES.iter().map(|s| s.to_string()).collect();
    columns.extend(metric_names.iter().map(|n| format!("{}{}", METRIC_NAME_PREFIX, n)));
    columns.extend(sources.iter().map(|s| format!("{}{}", SOURCE_PREFIX, s.as_str())));
    FeatureSchema::new(columns)
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Trailing window statistic with minimum period 1
fn rolling(values: &[f64], window: usize, stat: fn(&[f64]) -> f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            sanitize(stat(&values[start..=i]))
        })
        .collect()
}

fn first_difference(values: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| if i == 0 { 0.0 } else { sanitize(values[i] - values[i - 1]) })
        .collect()
}

/// Relative change; division by zero clamps to 0
fn percent_change(values: &[f64]) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            if i == 0 {
                return 0.0;
            }
            let prev = values[i - 1];
            sanitize((values[i] - prev) / prev)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_min_period_one() {
        let v = [2.0, 4.0, 6.0];
        assert_eq!(rolling(&v, 5, stats::mean), vec![2.0, 3.0, 4.0]);
        assert_eq!(rolling(&v, 5, stats::std_sample)[0], 0.0);
    }

    #[test]
    fn test_rolling_window_slides() {
        let v = [1.0, 1.0, 1.0, 1.0, 1.0, 11.0];
        let ma = rolling(&v, 5, stats::mean);
        assert_eq!(ma[4], 1.0);
        assert_eq!(ma[5], 3.0);
    }

    #[test]
    fn test_percent_change_clamps_division_by_zero() {
        let pct = percent_change(&[0.0, 5.0, 10.0, 0.0, 0.0]);
        assert_eq!(pct, vec![0.0, 0.0, 1.0, -1.0, 0.0]);
    }

    #[test]
    fn test_first_difference() {
        assert_eq!(first_difference(&[3.0, 5.0, 4.0]), vec![0.0, 2.0, -1.0]);
    }
}
