//! Workflow metric files
//!
//! Either one object (must carry `timestamp`) or an array of objects.
//! An object with a `value` field is a single record named by
//! `metric_name` / `name`; any other object contributes one record per
//! numeric field. Remaining string fields become labels.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::logic::error::{DetectorError, DetectorResult};
use crate::logic::features::{MetricSource, RawMetricRecord};
use super::timestamp;

const RESERVED: &[&str] = &["timestamp", "metric_name", "name", "value", "source", "labels"];

pub fn parse(path: &Path, document: Value, fallback: DateTime<Utc>) -> DetectorResult<Vec<RawMetricRecord>> {
    match document {
        Value::Array(items) => {
            let mut records = Vec::new();
            for item in items {
                match item {
                    Value::Object(obj) => records.extend(parse_object(path, &obj, fallback)?),
                    other => {
                        return Err(DetectorError::parse(path, format!("expected object, found {}", other)));
                    }
                }
            }
            Ok(records)
        }
        // A lone object without a timestamp is not a metric entry
        Value::Object(obj) if obj.contains_key("timestamp") => parse_object(path, &obj, fallback),
        Value::Object(_) => Ok(Vec::new()),
        _ => Err(DetectorError::parse(path, "expected an object or an array")),
    }
}

fn parse_object(path: &Path, obj: &Map<String, Value>, fallback: DateTime<Utc>) -> DetectorResult<Vec<RawMetricRecord>> {
    let ts = match obj.get("timestamp") {
        None | Some(Value::Null) => fallback,
        Some(raw) => timestamp::parse_value(raw)
            .ok_or_else(|| DetectorError::parse(path, format!("unrecognised timestamp {}", raw)))?,
    };

    let labels = labels_of(obj);

    if let Some(raw) = obj.get("value") {
        let value = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Null => Some(0.0),
            _ => None,
        }
        .ok_or_else(|| DetectorError::parse(path, format!("non-numeric value {}", raw)))?;

        let name = obj
            .get("metric_name")
            .or_else(|| obj.get("name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        return Ok(vec![RawMetricRecord::new(ts, name, value, MetricSource::Workflow).with_labels(labels)]);
    }

    Ok(obj
        .iter()
        .filter(|(key, _)| !RESERVED.contains(&key.as_str()))
        .filter_map(|(key, v)| v.as_f64().map(|value| (key, value)))
        .map(|(key, value)| {
            RawMetricRecord::new(ts, key.as_str(), value, MetricSource::Workflow).with_labels(labels.clone())
        })
        .collect())
}

fn labels_of(obj: &Map<String, Value>) -> BTreeMap<String, String> {
    let mut labels: BTreeMap<String, String> = obj
        .get("labels")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default();

    for (key, v) in obj {
        if RESERVED.contains(&key.as_str()) {
            continue;
        }
        if let Value::String(s) = v {
            labels.insert(key.clone(), s.clone());
        }
    }

    labels
}
