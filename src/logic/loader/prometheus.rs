//! Prometheus gauge snapshots
//!
//! `{ "timestamp": ..., "metrics": [{ "name", "type", "values": [{ "value", "labels" }] }] }`
//! Only gauges are kept; every value entry becomes one record.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::logic::error::{DetectorError, DetectorResult};
use crate::logic::features::{MetricSource, RawMetricRecord};
use super::timestamp;

#[derive(Debug, Deserialize)]
struct Snapshot {
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    metrics: Vec<Metric>,
}

#[derive(Debug, Deserialize)]
struct Metric {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    values: Vec<Sample>,
}

#[derive(Debug, Deserialize)]
struct Sample {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    labels: BTreeMap<String, Value>,
}

pub fn parse(path: &Path, document: Value, fallback: DateTime<Utc>) -> DetectorResult<Vec<RawMetricRecord>> {
    let snapshot: Snapshot =
        serde_json::from_value(document).map_err(|e| DetectorError::json(path, e))?;

    let ts = match &snapshot.timestamp {
        None | Some(Value::Null) => fallback,
        Some(raw) => timestamp::parse_value(raw)
            .ok_or_else(|| DetectorError::parse(path, format!("unrecognised timestamp {}", raw)))?,
    };

    let mut records = Vec::new();
    for metric in snapshot.metrics.iter().filter(|m| m.kind.as_deref() == Some("gauge")) {
        let name = metric.name.as_deref().unwrap_or("unknown");

        for sample in &metric.values {
            let value = sample_value(sample.value.as_ref())
                .ok_or_else(|| DetectorError::parse(path, format!("non-numeric value for gauge {}", name)))?;

            let labels = sample
                .labels
                .iter()
                .map(|(k, v)| (k.clone(), label_text(v)))
                .collect();

            records.push(RawMetricRecord::new(ts, name, value, MetricSource::Prometheus).with_labels(labels));
        }
    }

    Ok(records)
}

/// Number, numeric string, or missing (= 0)
fn sample_value(raw: Option<&Value>) -> Option<f64> {
    match raw {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

fn label_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
