//! Statistical Anomaly Scorer
//!
//! Per-column z-score and IQR outlier counts over the unscaled feature table.

use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureTable;
use crate::logic::stats;

/// Columns with fewer samples are skipped entirely
pub const MIN_COLUMN_SAMPLES: usize = 5;

/// |z| above this is an outlier
pub const Z_SCORE_LIMIT: f64 = 3.0;

/// Fence width in interquartile ranges
pub const IQR_FENCE: f64 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDetail {
    pub column: String,
    pub z_score_anomalies: usize,
    pub iqr_anomalies: usize,
    pub total_points: usize,
}

impl ColumnDetail {
    pub fn combined(&self) -> usize {
        self.z_score_anomalies + self.iqr_anomalies
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalResult {
    pub method: String,
    /// Qualifying columns, in schema order
    pub column_details: Vec<ColumnDetail>,
    pub total_anomalies: usize,
    pub total_points: usize,
    pub anomaly_rate: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalScorer;

impl StatisticalScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, table: &FeatureTable) -> StatisticalResult {
        let column_details: Vec<ColumnDetail> = table
            .schema()
            .columns()
            .iter()
            .enumerate()
            .filter_map(|(i, name)| {
                let values: Vec<f64> = table
                    .column(i)
                    .into_iter()
                    .filter(|v| v.is_finite())
                    .collect();

                if values.len() < MIN_COLUMN_SAMPLES {
                    return None;
                }

                Some(ColumnDetail {
                    column: name.clone(),
                    z_score_anomalies: z_score_outliers(&values),
                    iqr_anomalies: iqr_outliers(&values),
                    total_points: values.len(),
                })
            })
            .collect();

        let total_anomalies: usize = column_details.iter().map(ColumnDetail::combined).sum();
        let total_points: usize = column_details.iter().map(|c| c.total_points).sum();
        let anomaly_rate = total_anomalies as f64 / total_points.max(1) as f64;

        log::debug!(
            "Statistical scorer: {} anomalies over {} points in {} columns",
            total_anomalies,
            total_points,
            column_details.len()
        );

        StatisticalResult {
            method: "statistical".to_string(),
            column_details,
            total_anomalies,
            total_points,
            anomaly_rate,
        }
    }
}

/// Count of |z| > 3 (population std); a flat column has none
pub fn z_score_outliers(values: &[f64]) -> usize {
    let mean = stats::mean(values);
    let std = stats::std_population(values);

    if std <= f64::EPSILON * mean.abs().max(1.0) {
        return 0;
    }

    values
        .iter()
        .filter(|&&v| ((v - mean) / std).abs() > Z_SCORE_LIMIT)
        .count()
}

/// Count of values outside [Q1 - 1.5 IQR, Q3 + 1.5 IQR]
pub fn iqr_outliers(values: &[f64]) -> usize {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = stats::quantile_sorted(&sorted, 0.25);
    let q3 = stats::quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower = q1 - IQR_FENCE * iqr;
    let upper = q3 + IQR_FENCE * iqr;

    values.iter().filter(|&&v| v < lower || v > upper).count()
}
