//! Raw Metric Record - one timestamped sample as loaded from disk

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a metric sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSource {
    Prometheus,
    Workflow,
}

impl MetricSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricSource::Prometheus => "prometheus",
            MetricSource::Workflow => "workflow",
        }
    }
}

impl std::fmt::Display for MetricSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One raw observation, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMetricRecord {
    pub timestamp: DateTime<Utc>,
    pub metric_name: String,
    pub value: f64,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    pub source: MetricSource,
}

impl RawMetricRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        metric_name: impl Into<String>,
        value: f64,
        source: MetricSource,
    ) -> Self {
        Self {
            timestamp,
            metric_name: metric_name.into(),
            value,
            labels: BTreeMap::new(),
            source,
        }
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels = labels;
        self
    }
}
