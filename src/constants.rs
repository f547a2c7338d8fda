//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every default can be overridden from the environment (or a `.env` file).

/// Default directory holding historical metric files
pub const DEFAULT_METRICS_PATH: &str = ".github/observability-data/metrics";

/// Default directory holding pipeline logs (advisory, not read by the detector)
pub const DEFAULT_LOGS_PATH: &str = ".github/observability-data/logs";

/// Default CI alert summary file
pub const DEFAULT_ALERTS_PATH: &str = ".github/observability-data/current-alerts.json";

/// Default model selection
pub const DEFAULT_MODEL_TYPE: &str = "isolation_forest";

/// Default history window the loader is expected to supply
pub const DEFAULT_TRAINING_WINDOW: &str = "720h";

/// Confidence needed before an alert is surfaced
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Assumed fraction of outliers for the density model
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// Number of isolation trees
pub const DEFAULT_N_ESTIMATORS: usize = 100;

/// Seed for every stochastic model in a run
pub const DEFAULT_SEED: u64 = 42;

/// Confidence at or above which an anomaly is treated as critical by CI
pub const CRITICAL_CONFIDENCE: f64 = 0.9;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Pipeline Anomaly Detector";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get metrics path from environment or use default
pub fn get_metrics_path() -> String {
    std::env::var("ANOMALY_METRICS_PATH")
        .unwrap_or_else(|_| DEFAULT_METRICS_PATH.to_string())
}

/// Get logs path from environment or use default
pub fn get_logs_path() -> String {
    std::env::var("ANOMALY_LOGS_PATH")
        .unwrap_or_else(|_| DEFAULT_LOGS_PATH.to_string())
}

/// Get alert summary path from environment or use default
pub fn get_alerts_path() -> String {
    std::env::var("ANOMALY_ALERTS_PATH")
        .unwrap_or_else(|_| DEFAULT_ALERTS_PATH.to_string())
}

/// Get model type from environment or use default
pub fn get_model_type() -> String {
    std::env::var("ANOMALY_MODEL_TYPE")
        .unwrap_or_else(|_| DEFAULT_MODEL_TYPE.to_string())
}

/// Get training window from environment or use default
pub fn get_training_window() -> String {
    std::env::var("ANOMALY_TRAINING_WINDOW")
        .unwrap_or_else(|_| DEFAULT_TRAINING_WINDOW.to_string())
}

/// Get confidence threshold from environment or use default
pub fn get_confidence_threshold() -> f64 {
    std::env::var("ANOMALY_CONFIDENCE_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CONFIDENCE_THRESHOLD)
}

/// Get contamination fraction from environment or use default
pub fn get_contamination() -> f64 {
    std::env::var("ANOMALY_CONTAMINATION")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_CONTAMINATION)
}

/// Get tree count from environment or use default
pub fn get_n_estimators() -> usize {
    std::env::var("ANOMALY_N_ESTIMATORS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_N_ESTIMATORS)
}

/// Get model seed from environment or use default
pub fn get_seed() -> u64 {
    std::env::var("ANOMALY_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED)
}
