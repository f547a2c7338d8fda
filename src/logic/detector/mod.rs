//! Detector Module - One analysis run, end to end
//!
//! load → build features → scale → score → fuse → insights → persist
//!
//! `anomalies_detected` is the ensemble verdict. The confidence threshold only
//! decides whether an alert is emitted when the run is persisted.
//!
//! Everything a run needs (schema, scaler, fitted models) is created here and
//! dropped when the run ends. Only configuration outlives a run.


use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::constants::CRITICAL_CONFIDENCE;
use crate::logic::config::DetectorConfig;
use crate::logic::ensemble::{fuse, ScorerOutput, ScorerResult};
use crate::logic::error::DetectorResult;
use crate::logic::features::{FeatureBuilder, FeatureTable, RawMetricRecord, RobustScaler};
use crate::logic::insight::{self, InsightReport};
use crate::logic::loader::MetricLoader;
use crate::logic::model::{
    available_backend, BackendProvider, DensityConfig, DensityScorer, SequenceConfig,
    SequenceScorer, StatisticalScorer,
};
use crate::logic::report::{Analysis, DetectionReport, ReportWriter};

// ============================================================================
// VERDICT CLASS
// ============================================================================

/// Coarse outcome used for the process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictClass {
    NoAnomaly,
    Anomaly,
    CriticalAnomaly,
}

impl VerdictClass {
    pub fn of(report: &DetectionReport) -> Self {
        if !report.anomalies_detected {
            VerdictClass::NoAnomaly
        } else if report.confidence >= CRITICAL_CONFIDENCE {
            VerdictClass::CriticalAnomaly
        } else {
            VerdictClass::Anomaly
        }
    }
}

/// Result of `AnomalyDetector::run`
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: DetectionReport,
    pub insights: InsightReport,
    /// `None` when nothing was persisted (no data)
    pub results_path: Option<PathBuf>,
}

impl RunOutcome {
    pub fn verdict(&self) -> VerdictClass {
        VerdictClass::of(&self.report)
    }
}

// ============================================================================
// DETECTOR
// ============================================================================

pub struct AnomalyDetector {
    config: DetectorConfig,
    backend_provider: BackendProvider,
}

impl AnomalyDetector {
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            backend_provider: available_backend,
        })
    }

    /// Replace the sequence backend provider
    #[cfg(test)]
    pub fn with_backend_provider(mut self, provider: BackendProvider) -> Self {
        self.backend_provider = provider;
        self
    }

    pub fn load_historical_data(&self) -> Vec<RawMetricRecord> {
        MetricLoader::new(&self.config.metrics_path).load()
    }

    pub fn detect(&self, records: &[RawMetricRecord]) -> DetectorResult<DetectionReport> {
        let table = FeatureBuilder::new().build(records);
        self.analyze_table(&table)
    }

    /// Score an already built feature table
    pub fn analyze_table(&self, table: &FeatureTable) -> DetectorResult<DetectionReport> {
        let timestamp = Utc::now();
        if table.is_empty() {
            return Ok(DetectionReport::no_data(timestamp));
        }

        let schema = table.schema();
        let matrix = table.to_matrix();
        schema.check_width(matrix.ncols())?;

        log::info!(
            "Analyzing {} data points with {} features (schema {:08x})",
            table.len(),
            schema.len(),
            schema.hash
        );

        let (_scaler, scaled) = RobustScaler::fit_transform(&matrix);
        let mut scorers = Vec::new();

        let density = DensityScorer::new(self.density_config()).score(&scaled, schema);
        scorers.push(ScorerResult::Density(density));

        if self.config.model_type.runs_sequence() {
            let sequence_config = self.sequence_config();
            match (self.backend_provider)(&sequence_config) {
                Some(mut backend) => {
                    let scorer = SequenceScorer::new(sequence_config);
                    if let Some(result) = scorer.score(&scaled, backend.as_mut()) {
                        scorers.push(ScorerResult::Sequence(result));
                    }
                }
                None => log::warn!("Sequence backend not available, skipping sequence model"),
            }
        }

        let statistical = StatisticalScorer::new().score(table);
        scorers.push(ScorerResult::Statistical(statistical));

        let outputs: Vec<&dyn ScorerOutput> = scorers.iter().map(|s| s as &dyn ScorerOutput).collect();
        let ensemble = fuse(&outputs);

        let confidence = ensemble.confidence;
        let anomalies_detected = ensemble.anomaly_detected;

        log::info!(
            "Ensemble confidence {:.3} ({}/{} votes), anomalies_detected={}",
            confidence,
            ensemble.vote_count,
            ensemble.contributing_scorer_count,
            anomalies_detected
        );

        Ok(DetectionReport {
            run_id: uuid::Uuid::new_v4(),
            timestamp,
            anomalies_detected,
            confidence,
            message: None,
            analysis: Some(Analysis {
                data_points: table.len(),
                features: schema.columns().to_vec(),
                schema_hash: schema.hash,
                scorers,
                ensemble,
            }),
        })
    }

    pub fn generate_insights(&self, report: &DetectionReport) -> InsightReport {
        let analysis = report.analysis.as_ref();
        insight::generate(
            report.confidence,
            report.anomalies_detected,
            analysis.and_then(Analysis::statistical),
            analysis.and_then(Analysis::density),
        )
    }

    /// Full run. Nothing is written when there is no data or a step fails.
    pub fn run(&self) -> DetectorResult<RunOutcome> {
        let records = self.load_historical_data();

        if records.is_empty() {
            let report = DetectionReport::no_data(Utc::now());
            let insights = self.generate_insights(&report);
            return Ok(RunOutcome { report, insights, results_path: None });
        }

        let report = self.detect(&records)?;
        let insights = self.generate_insights(&report);
        let results_path = ReportWriter::new(&self.config).persist(&report, &insights, &self.config)?;

        Ok(RunOutcome {
            report,
            insights,
            results_path: Some(results_path),
        })
    }

    fn density_config(&self) -> DensityConfig {
        DensityConfig {
            contamination: self.config.contamination,
            n_estimators: self.config.n_estimators,
            seed: self.config.seed,
            ..Default::default()
        }
    }

    fn sequence_config(&self) -> SequenceConfig {
        SequenceConfig {
            seed: self.config.seed,
            ..Default::default()
        }
    }
}
