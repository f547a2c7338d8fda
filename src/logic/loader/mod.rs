//! Loader Module - Historical metric discovery and parsing
//!
//! Reads everything under the metrics directory into raw records:
//! 1. `prometheus/*.json` gauge snapshots
//! 2. `*metrics*.json` workflow files directly in the directory
//!
//! Files are visited in lexicographic order within each group. A file that
//! cannot be read or parsed is skipped with a warning; loading itself never
//! fails.

pub mod timestamp;
pub mod prometheus;
pub mod workflow;


use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::logic::error::{DetectorError, DetectorResult};
use crate::logic::features::RawMetricRecord;

/// Sub-directory holding Prometheus snapshots
pub const PROMETHEUS_DIR: &str = "prometheus";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Prometheus,
    Workflow,
}

#[derive(Debug, Clone)]
pub struct MetricLoader {
    metrics_path: PathBuf,
    /// Stamp for records whose file carries no timestamp
    run_started: DateTime<Utc>,
}

impl MetricLoader {
    pub fn new(metrics_path: impl Into<PathBuf>) -> Self {
        Self {
            metrics_path: metrics_path.into(),
            run_started: Utc::now(),
        }
    }

    #[cfg(test)]
    pub fn with_run_start(mut self, run_started: DateTime<Utc>) -> Self {
        self.run_started = run_started;
        self
    }

    /// Load every discoverable record, in discovery order
    pub fn load(&self) -> Vec<RawMetricRecord> {
        log::info!("Loading historical data from {}", self.metrics_path.display());

        let files = self.discover();
        let mut records = Vec::new();
        let mut loaded_files = 0;

        for (path, kind) in &files {
            match self.load_file(path, *kind) {
                Ok(batch) => {
                    log::debug!("{}: {} records", path.display(), batch.len());
                    if !batch.is_empty() {
                        loaded_files += 1;
                    }
                    records.extend(batch);
                }
                Err(e) => log::warn!("Could not load {}: {}", path.display(), e),
            }
        }

        if records.is_empty() {
            log::error!("No metrics data found");
        } else {
            log::info!("Loaded {} records from {} files", records.len(), loaded_files);
        }

        records
    }

    fn discover(&self) -> Vec<(PathBuf, FileKind)> {
        let prometheus = json_files(&self.metrics_path.join(PROMETHEUS_DIR), |_| true);
        let workflow = json_files(&self.metrics_path, |name| name.contains("metrics"));

        prometheus
            .into_iter()
            .map(|p| (p, FileKind::Prometheus))
            .chain(workflow.into_iter().map(|p| (p, FileKind::Workflow)))
            .collect()
    }

    fn load_file(&self, path: &Path, kind: FileKind) -> DetectorResult<Vec<RawMetricRecord>> {
        let content = std::fs::read_to_string(path).map_err(|e| DetectorError::io(path, e))?;
        let document: Value = serde_json::from_str(&content).map_err(|e| DetectorError::json(path, e))?;

        match kind {
            FileKind::Prometheus => prometheus::parse(path, document, self.run_started),
            FileKind::Workflow => workflow::parse(path, document, self.run_started),
        }
    }
}

/// Sorted `*.json` files directly inside `dir` whose name passes `accept`.
/// A missing directory yields nothing.
fn json_files(dir: &Path, accept: impl Fn(&str) -> bool) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .map(|name| name.ends_with(".json") && accept(name))
                .unwrap_or(false)
        })
        .collect();

    files.sort();
    files
}
