//! Detector Configuration
//!
//! Effective options for one analysis run. Built once by the CLI and passed by
//! reference into the pipeline; persisted alongside the results.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants;
use super::error::DetectorError;

// ============================================================================
// MODEL SELECTION
// ============================================================================

/// Which optional scorer set runs. Density and statistical scorers always run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Density + statistical only
    IsolationForest,
    /// Adds the sequence scorer
    Lstm,
    /// Every scorer
    All,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::IsolationForest => "isolation_forest",
            ModelType::Lstm => "lstm",
            ModelType::All => "all",
        }
    }

    pub fn runs_sequence(&self) -> bool {
        matches!(self, ModelType::Lstm | ModelType::All)
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = DetectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolation_forest" | "density" => Ok(ModelType::IsolationForest),
            "lstm" | "sequence" => Ok(ModelType::Lstm),
            "all" => Ok(ModelType::All),
            other => Err(DetectorError::InvalidConfig(format!(
                "unknown model type '{}' (expected isolation_forest, lstm or all)",
                other
            ))),
        }
    }
}

// ============================================================================
// DETECTOR CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub metrics_path: PathBuf,
    pub logs_path: PathBuf,
    pub alerts_path: PathBuf,
    pub model_type: ModelType,
    /// Advisory: how much history the loader should supply
    pub training_window: String,
    /// Gate between "no action" and surfacing an alert
    pub confidence_threshold: f64,
    pub contamination: f64,
    pub n_estimators: usize,
    pub seed: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            metrics_path: PathBuf::from(constants::DEFAULT_METRICS_PATH),
            logs_path: PathBuf::from(constants::DEFAULT_LOGS_PATH),
            alerts_path: PathBuf::from(constants::DEFAULT_ALERTS_PATH),
            model_type: ModelType::IsolationForest,
            training_window: constants::DEFAULT_TRAINING_WINDOW.to_string(),
            confidence_threshold: constants::DEFAULT_CONFIDENCE_THRESHOLD,
            contamination: constants::DEFAULT_CONTAMINATION,
            n_estimators: constants::DEFAULT_N_ESTIMATORS,
            seed: constants::DEFAULT_SEED,
        }
    }
}

impl DetectorConfig {
    /// Reject values the scorers cannot work with
    pub fn validate(&self) -> Result<(), DetectorError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(DetectorError::InvalidConfig(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }

        if !(self.contamination > 0.0 && self.contamination < 0.5) {
            return Err(DetectorError::InvalidConfig(format!(
                "contamination must be within (0, 0.5), got {}",
                self.contamination
            )));
        }

        if self.n_estimators == 0 {
            return Err(DetectorError::InvalidConfig(
                "n_estimators must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Directory receiving the detailed run documents
    pub fn results_dir(&self) -> PathBuf {
        self.metrics_path.join("anomaly_detection")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_parse() {
        assert_eq!("isolation_forest".parse::<ModelType>().unwrap(), ModelType::IsolationForest);
        assert_eq!("LSTM".parse::<ModelType>().unwrap(), ModelType::Lstm);
        assert_eq!("all".parse::<ModelType>().unwrap(), ModelType::All);
        assert!("random_forest".parse::<ModelType>().is_err());
    }

    #[test]
    fn test_runs_sequence() {
        assert!(!ModelType::IsolationForest.runs_sequence());
        assert!(ModelType::Lstm.runs_sequence());
        assert!(ModelType::All.runs_sequence());
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.confidence_threshold, 0.85);
        assert_eq!(config.training_window, "720h");
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let config = DetectorConfig {
            confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_results_dir() {
        let config = DetectorConfig {
            metrics_path: PathBuf::from("/tmp/metrics"),
            ..Default::default()
        };
        assert_eq!(config.results_dir(), PathBuf::from("/tmp/metrics/anomaly_detection"));
    }
}
