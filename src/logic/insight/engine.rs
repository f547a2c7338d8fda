//! Insight Engine - severity tier, summary, actions and affected metrics

use super::types::{AffectedMetric, InsightReport, Severity};
use crate::logic::ensemble::ScorerKind;
use crate::logic::model::{DensityResult, StatisticalResult};

/// Confidence at or above which a detected anomaly is critical
pub const CRITICAL_CONFIDENCE: f64 = crate::constants::CRITICAL_CONFIDENCE;

/// Confidence at or above which a detected anomaly is high
pub const HIGH_CONFIDENCE: f64 = 0.7;

/// Density features must correlate above this to be reported
const IMPORTANCE_FLOOR: f64 = 0.5;

/// At most this many density features are reported
const TOP_DENSITY_FEATURES: usize = 5;

pub fn classify(confidence: f64, anomaly_detected: bool) -> Severity {
    if !anomaly_detected {
        Severity::Low
    } else if confidence >= CRITICAL_CONFIDENCE {
        Severity::Critical
    } else if confidence >= HIGH_CONFIDENCE {
        Severity::High
    } else {
        Severity::Medium
    }
}

fn summary(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Critical anomalies detected with high confidence",
        Severity::High => "Significant anomalies detected",
        Severity::Medium => "Potential anomalies detected",
        Severity::Low => "No significant anomalies detected",
    }
}

fn recommendations(severity: Severity) -> &'static [&'static str] {
    match severity {
        Severity::Critical => &[
            "Investigate immediately",
            "Check recent deployment changes",
            "Monitor system resources",
            "Consider rollback if necessary",
        ],
        Severity::High => &[
            "Investigate within 1 hour",
            "Check workflow performance metrics",
            "Review recent configuration changes",
        ],
        Severity::Medium => &[
            "Monitor trends over next few runs",
            "Review metrics for patterns",
            "Consider tuning anomaly detection thresholds",
        ],
        Severity::Low => &["Continue normal monitoring"],
    }
}

/// Build the insight report for one run.
///
/// Affected metrics list statistical columns with outliers first (column
/// order), then the strongest density features (importance descending).
pub fn generate(
    confidence: f64,
    anomaly_detected: bool,
    statistical: Option<&StatisticalResult>,
    density: Option<&DensityResult>,
) -> InsightReport {
    let severity = classify(confidence, anomaly_detected);
    let mut affected_metrics = Vec::new();

    if let Some(stat) = statistical {
        for detail in &stat.column_details {
            let count = detail.combined();
            if count > 0 {
                affected_metrics.push(AffectedMetric {
                    metric: detail.column.clone(),
                    magnitude: count as f64,
                    source: ScorerKind::Statistical,
                });
            }
        }
    }

    if let Some(dens) = density {
        let mut ranked: Vec<_> = dens.feature_importance.iter().collect();
        // Stable sort keeps schema order among equal importances
        ranked.sort_by(|a, b| b.importance.total_cmp(&a.importance));

        affected_metrics.extend(
            ranked
                .into_iter()
                .take(TOP_DENSITY_FEATURES)
                .filter(|f| f.importance > IMPORTANCE_FLOOR)
                .map(|f| AffectedMetric {
                    metric: f.feature.clone(),
                    magnitude: f.importance,
                    source: ScorerKind::Density,
                }),
        );
    }

    InsightReport {
        severity,
        summary: summary(severity).to_string(),
        recommendations: recommendations(severity).iter().map(|s| s.to_string()).collect(),
        affected_metrics,
    }
}
