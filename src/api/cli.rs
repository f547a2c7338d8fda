//! Command-line flags and the analysis command.
//!
//! Every flag falls back to an `ANOMALY_*` environment variable (a `.env`
//! file is loaded first), then to the built-in default.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::constants;
use crate::logic::config::{DetectorConfig, ModelType};
use crate::logic::detector::AnomalyDetector;
use crate::logic::error::DetectorResult;
use super::exit::CliExitCode;

/// ML-based anomaly detection for CI/CD pipeline metrics
#[derive(Debug, Parser)]
#[command(name = "anomaly-detector")]
#[command(version = constants::APP_VERSION)]
#[command(about = "ML-based anomaly detection for CI/CD pipeline metrics")]
pub struct Cli {
    /// Path to metrics data
    #[arg(long, default_value_t = constants::get_metrics_path())]
    pub metrics_path: String,

    /// Path to logs data
    #[arg(long, default_value_t = constants::get_logs_path())]
    pub logs_path: String,

    /// Where the CI alert summary is written
    #[arg(long, default_value_t = constants::get_alerts_path())]
    pub alerts_path: String,

    /// Type of model to use (isolation_forest, lstm, all)
    #[arg(long, default_value_t = constants::get_model_type())]
    pub model_type: String,

    /// Training window (e.g. 720h)
    #[arg(long, default_value_t = constants::get_training_window())]
    pub training_window: String,

    /// Confidence threshold for anomaly detection
    #[arg(long, default_value_t = constants::get_confidence_threshold())]
    pub confidence_threshold: f64,

    /// Assumed outlier fraction for the isolation forest
    #[arg(long, default_value_t = constants::get_contamination())]
    pub contamination: f64,

    /// Number of isolation trees
    #[arg(long, default_value_t = constants::get_n_estimators())]
    pub n_estimators: usize,

    /// Seed for every stochastic model
    #[arg(long, default_value_t = constants::get_seed())]
    pub seed: u64,

    /// Verbose logging (debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn to_config(&self) -> DetectorResult<DetectorConfig> {
        let model_type: ModelType = self.model_type.parse()?;

        Ok(DetectorConfig {
            metrics_path: PathBuf::from(&self.metrics_path),
            logs_path: PathBuf::from(&self.logs_path),
            alerts_path: PathBuf::from(&self.alerts_path),
            model_type,
            training_window: self.training_window.clone(),
            confidence_threshold: self.confidence_threshold,
            contamination: self.contamination,
            n_estimators: self.n_estimators,
            seed: self.seed,
        })
    }
}

/// Run one analysis and print the CI step outputs
pub fn execute(cli: &Cli) -> anyhow::Result<CliExitCode> {
    let config = cli.to_config().context("invalid arguments")?;
    log::debug!("Effective configuration: {:?}", config);

    let detector = AnomalyDetector::new(config)?;
    let outcome = detector.run()?;

    if !outcome.report.has_data() {
        println!("No data available for analysis");
        return Ok(CliExitCode::NoAnomaly);
    }

    println!("anomalies={}", outcome.report.anomalies_detected);
    println!("confidence={:.3}", outcome.report.confidence);
    println!("severity={}", outcome.insights.severity);
    println!("{}", outcome.insights.summary);

    for recommendation in &outcome.insights.recommendations {
        log::info!("Recommendation: {}", recommendation);
    }

    if let Some(path) = &outcome.results_path {
        log::info!("Run document: {}", path.display());
    }

    Ok(outcome.verdict().into())
}
