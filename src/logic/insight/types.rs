//! Insight Types - what a run tells the operator

use serde::{Deserialize, Serialize};

use crate::logic::ensemble::ScorerKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,      // Nothing detected
    Medium,   // Detected, confidence below 0.7
    High,     // Detected, confidence 0.7 - 0.9
    Critical, // Detected, confidence 0.9 or more
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Whether an alert at this tier threatens the SLO
    pub fn impacts_slo(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectedMetric {
    pub metric: String,
    /// Outlier count for statistical, importance for density (units differ)
    pub magnitude: f64,
    pub source: ScorerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub severity: Severity,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub affected_metrics: Vec<AffectedMetric>,
}
