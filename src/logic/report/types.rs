//! Report Types - run document, CI alert and their serialized shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::config::DetectorConfig;
use crate::logic::ensemble::{EnsembleVerdict, ScorerResult};
use crate::logic::insight::{InsightReport, Severity};
use crate::logic::model::{DensityResult, SequenceResult, StatisticalResult};

/// Message carried by a run that found nothing to analyze
pub const NO_DATA_MESSAGE: &str = "No data available";

// ============================================================================
// DETECTION REPORT
// ============================================================================

/// Outcome of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// Ensemble verdict (majority of contributing scorers)
    pub anomalies_detected: bool,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub analysis: Option<Analysis>,
}

/// Everything computed when there was data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub data_points: usize,
    pub features: Vec<String>,
    pub schema_hash: u32,
    pub scorers: Vec<ScorerResult>,
    pub ensemble: EnsembleVerdict,
}

impl Analysis {
    pub fn density(&self) -> Option<&DensityResult> {
        self.scorers.iter().find_map(|s| match s {
            ScorerResult::Density(r) => Some(r),
            _ => None,
        })
    }

    pub fn statistical(&self) -> Option<&StatisticalResult> {
        self.scorers.iter().find_map(|s| match s {
            ScorerResult::Statistical(r) => Some(r),
            _ => None,
        })
    }

    pub fn sequence(&self) -> Option<&SequenceResult> {
        self.scorers.iter().find_map(|s| match s {
            ScorerResult::Sequence(r) => Some(r),
            _ => None,
        })
    }
}

impl DetectionReport {
    pub fn no_data(timestamp: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            timestamp,
            anomalies_detected: false,
            confidence: 0.0,
            message: Some(NO_DATA_MESSAGE.to_string()),
            analysis: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.analysis.is_some()
    }

    /// Scorers that ran in this report
    pub fn model_count(&self) -> usize {
        self.analysis.as_ref().map(|a| a.scorers.len()).unwrap_or(0)
    }
}

// ============================================================================
// PERSISTED DOCUMENTS
// ============================================================================

/// Full run document: report, insights and the effective configuration
#[derive(Debug, Serialize)]
pub struct RunDocument<'a> {
    #[serde(flatten)]
    pub report: &'a DetectionReport,
    pub insights: &'a InsightReport,
    pub config: &'a DetectorConfig,
}

/// CI alert summary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub severity: Severity,
    pub confidence: f64,
    pub description: String,
    pub recommended_actions: Vec<String>,
    pub affected_metrics: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub slo_impact: String,
    pub error_budget_consumed: f64,
}

impl Alert {
    pub fn from_run(report: &DetectionReport, insights: &InsightReport) -> Self {
        let slo_impact = if insights.severity.impacts_slo() { "high" } else { "low" };

        Self {
            title: insights.summary.clone(),
            severity: insights.severity,
            confidence: report.confidence,
            description: format!(
                "Detected with {:.1}% confidence using {} detection methods",
                report.confidence * 100.0,
                report.model_count()
            ),
            recommended_actions: insights.recommendations.clone(),
            affected_metrics: insights.affected_metrics.iter().map(|m| m.metric.clone()).collect(),
            timestamp: report.timestamp,
            slo_impact: slo_impact.to_string(),
            error_budget_consumed: (report.confidence * 100.0).min(100.0),
        }
    }
}
