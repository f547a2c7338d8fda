//! Density Anomaly Scorer
//!
//! Fits an isolation forest on the scaled feature matrix and flags rows whose
//! anomaly score sits above a contamination-calibrated cut-off.
//!
//! The cut-off is `median + z(1 - contamination / 2) * 1.4826 * MAD` over the
//! run's own scores. Isolation scores are right-skewed, so the two-sided
//! quantile keeps clean data at or below the contamination prior, while a
//! genuinely shifted sub-population lands above the cut-off as a block.
//!
//! Trees are grown on small sub-samples. With large ones a dense shifted
//! cluster masks itself and scores barely above the bulk.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::features::FeatureSchema;
use crate::logic::stats;
use super::isolation::IsolationForest;

/// Scale factor turning MAD into a normal-consistent std estimate
const MAD_TO_STD: f64 = 1.4826;

/// Upper bound on rows per tree
pub const MAX_SAMPLES: usize = 32;

/// Upper bound on columns per tree
pub const MAX_FEATURES: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityConfig {
    pub contamination: f64,
    pub n_estimators: usize,
    pub max_samples: usize,
    pub max_features: usize,
    pub seed: u64,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            contamination: crate::constants::DEFAULT_CONTAMINATION,
            n_estimators: crate::constants::DEFAULT_N_ESTIMATORS,
            max_samples: MAX_SAMPLES,
            max_features: MAX_FEATURES,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl ScoreStats {
    fn from_scores(scores: &[f64]) -> Self {
        if scores.is_empty() {
            return Self::default();
        }

        Self {
            mean: stats::mean(scores),
            std: stats::std_population(scores),
            min: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityResult {
    pub anomaly_ratio: f64,
    pub flagged_rows: usize,
    pub threshold: f64,
    pub score_stats: ScoreStats,
    /// |corr(column, score)| in schema order
    pub feature_importance: Vec<FeatureImportance>,
}

#[derive(Debug, Clone, Default)]
pub struct DensityScorer {
    config: DensityConfig,
}

impl DensityScorer {
    pub fn new(config: DensityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, data: &Array2<f64>, schema: &FeatureSchema) -> DensityResult {
        log::info!("Training isolation forest ({} trees)", self.config.n_estimators);

        let mut forest = IsolationForest::new(
            self.config.n_estimators,
            self.config.max_samples,
            self.config.max_features.min(schema.len()),
            self.config.seed,
        );
        forest.fit(data);
        let scores = forest.score(data);

        let threshold = decision_threshold(&scores, self.config.contamination);
        let flagged_rows = scores.iter().filter(|&&s| s > threshold).count();
        let anomaly_ratio = if scores.is_empty() {
            0.0
        } else {
            flagged_rows as f64 / scores.len() as f64
        };

        let feature_importance = schema
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i < data.ncols())
            .map(|(i, name)| {
                let column = data.index_axis(Axis(1), i).to_vec();
                FeatureImportance {
                    feature: name.clone(),
                    importance: stats::pearson(&column, &scores).abs(),
                }
            })
            .collect();

        log::debug!(
            "Isolation forest flagged {}/{} rows (ratio {:.3}, cut-off {:.4})",
            flagged_rows,
            scores.len(),
            anomaly_ratio,
            threshold
        );

        DensityResult {
            anomaly_ratio,
            flagged_rows,
            threshold,
            score_stats: ScoreStats::from_scores(&scores),
            feature_importance,
        }
    }
}

/// Robust upper cut-off over the run's scores
fn decision_threshold(scores: &[f64], contamination: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }

    let center = stats::median(scores);
    let deviations: Vec<f64> = scores.iter().map(|s| (s - center).abs()).collect();
    let spread = MAD_TO_STD * stats::median(&deviations);
    let z = stats::normal_quantile(1.0 - contamination.clamp(1e-6, 0.5) / 2.0);

    center + z * spread
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_of_constant_scores_is_the_score() {
        assert_eq!(decision_threshold(&[0.4; 10], 0.1), 0.4);
        assert_eq!(decision_threshold(&[], 0.1), 0.0);
    }

    #[test]
    fn test_threshold_uses_two_sided_quantile() {
        // median 0.5, MAD 0.1
        let scores = [0.3, 0.4, 0.5, 0.6, 0.7];
        let expected = 0.5 + 1.644_853_6 * MAD_TO_STD * 0.1;

        assert!((decision_threshold(&scores, 0.1) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_empty_matrix() {
        let scorer = DensityScorer::default();
        let result = scorer.score(&Array2::zeros((0, 0)), &FeatureSchema::empty());

        assert_eq!(result.anomaly_ratio, 0.0);
        assert_eq!(result.score_stats, ScoreStats::default());
        assert!(result.feature_importance.is_empty());
    }

    #[test]
    fn test_constant_column_has_zero_importance() {
        let data = Array2::from_shape_fn((30, 2), |(i, j)| if j == 0 { i as f64 } else { 3.0 });
        let schema = FeatureSchema::new(vec!["ramp".into(), "flat".into()]);

        let result = DensityScorer::default().score(&data, &schema);

        assert_eq!(result.feature_importance.len(), 2);
        assert_eq!(result.feature_importance[1].feature, "flat");
        assert_eq!(result.feature_importance[1].importance, 0.0);
        assert!(result.feature_importance[0].importance.is_finite());
    }

    #[test]
    fn test_tiny_matrix_still_scores() {
        let data = Array2::from_shape_fn((2, 3), |(i, j)| (i + j) as f64);
        let schema = FeatureSchema::new(vec!["a".into(), "b".into(), "c".into()]);

        let result = DensityScorer::default().score(&data, &schema);
        assert!((0.0..=1.0).contains(&result.anomaly_ratio));
        assert!(result.score_stats.mean.is_finite());
    }
}
