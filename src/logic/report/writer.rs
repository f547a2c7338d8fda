//! Report Writer - run document and CI alert summary on disk

use std::fs;
use std::path::{Path, PathBuf};

use crate::logic::config::DetectorConfig;
use crate::logic::error::{DetectorError, DetectorResult};
use crate::logic::insight::InsightReport;
use super::types::{Alert, DetectionReport, RunDocument};

/// Writes the run document and the CI alert summary
pub struct ReportWriter {
    results_dir: PathBuf,
    alerts_path: PathBuf,
}

impl ReportWriter {
    pub fn new(config: &DetectorConfig) -> Self {
        Self::from_paths(config.results_dir(), config.alerts_path.clone())
    }

    pub fn from_paths(results_dir: PathBuf, alerts_path: PathBuf) -> Self {
        Self { results_dir, alerts_path }
    }

    /// Persist one run; returns the path of the run document.
    ///
    /// The alert summary is rewritten every time. It holds one alert when the
    /// ensemble detected an anomaly with confidence at or above
    /// `confidence_threshold`, and is empty otherwise. It is written first, so
    /// a failed alert write leaves no run document behind.
    pub fn persist(
        &self,
        report: &DetectionReport,
        insights: &InsightReport,
        config: &DetectorConfig,
    ) -> DetectorResult<PathBuf> {
        let alerts = if should_alert(report, config) {
            vec![Alert::from_run(report, insights)]
        } else {
            Vec::new()
        };
        self.write_alerts(&alerts)?;

        let document = RunDocument { report, insights, config };
        let results_path = self.write_results(&document)?;

        log::info!("Results saved to {}", self.results_dir.display());
        Ok(results_path)
    }

    fn write_results(&self, document: &RunDocument<'_>) -> DetectorResult<PathBuf> {
        fs::create_dir_all(&self.results_dir).map_err(|e| DetectorError::io(&self.results_dir, e))?;

        let file_name = format!(
            "anomaly_results_{}.json",
            document.report.timestamp.format("%Y%m%d_%H%M%S")
        );
        let path = self.results_dir.join(file_name);

        let json = serde_json::to_string_pretty(document).map_err(|e| DetectorError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| DetectorError::io(&path, e))?;

        Ok(path)
    }

    fn write_alerts(&self, alerts: &[Alert]) -> DetectorResult<()> {
        ensure_parent(&self.alerts_path)?;

        let json = serde_json::to_string_pretty(alerts).map_err(|e| DetectorError::json(&self.alerts_path, e))?;
        fs::write(&self.alerts_path, json).map_err(|e| DetectorError::io(&self.alerts_path, e))
    }
}

/// Alert gate for the consuming pipeline
fn should_alert(report: &DetectionReport, config: &DetectorConfig) -> bool {
    report.anomalies_detected && report.confidence >= config.confidence_threshold
}

fn ensure_parent(path: &Path) -> DetectorResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| DetectorError::io(parent, e))
        }
        _ => Ok(()),
    }
}
