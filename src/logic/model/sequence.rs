//! Sequence Anomaly Scorer
//!
//! Slides a window of consecutive rows over the scaled matrix and trains a
//! backend to predict each window's last row from the whole window. The
//! held-out reconstruction loss against the training loss is the signal.
//!
//! The scorer has no opinion when no backend is compiled in or the matrix is
//! too short to form a single window.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::stats;

/// Longest window ever used
pub const MAX_WINDOW: usize = 10;

/// Percentile of per-window MSE reported as the reconstruction threshold
const THRESHOLD_PERCENTILE: f64 = 0.95;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub max_window: usize,
    pub validation_split: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub hidden_units: usize,
    pub learning_rate: f64,
    pub seed: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            max_window: MAX_WINDOW,
            validation_split: 0.2,
            epochs: 50,
            batch_size: 32,
            hidden_units: 32,
            learning_rate: 0.001,
            seed: crate::constants::DEFAULT_SEED,
        }
    }
}

/// Per-epoch losses; `val_loss` is empty when nothing was held out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingHistory {
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
}

// ============================================================================
// BACKEND TRAIT
// ============================================================================

/// Window reconstruction model
pub trait SequenceBackend {
    fn name(&self) -> &'static str;

    /// Train on `inputs` (one flattened window per row) against `targets`,
    /// holding out the trailing `validation_split` fraction.
    fn fit(&mut self, inputs: &Array2<f64>, targets: &Array2<f64>, validation_split: f64)
        -> TrainingHistory;

    fn predict(&self, inputs: &Array2<f64>) -> Array2<f64>;
}

/// Signature of a backend provider; `None` means no backend in this build
pub type BackendProvider = fn(&SequenceConfig) -> Option<Box<dyn SequenceBackend>>;

/// Default provider: the native window regressor when compiled in
#[cfg(feature = "sequence-model")]
pub fn available_backend(config: &SequenceConfig) -> Option<Box<dyn SequenceBackend>> {
    Some(Box::new(super::network::WindowRegressor::new(config)))
}

#[cfg(not(feature = "sequence-model"))]
pub fn available_backend(_config: &SequenceConfig) -> Option<Box<dyn SequenceBackend>> {
    None
}

// ============================================================================
// SCORER
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceResult {
    pub backend: String,
    pub window_length: usize,
    pub windows: usize,
    pub training_loss: f64,
    pub validation_loss: Option<f64>,
    /// 95th percentile of per-window reconstruction MSE
    pub threshold: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SequenceScorer {
    config: SequenceConfig,
}

impl SequenceScorer {
    pub fn new(config: SequenceConfig) -> Self {
        Self { config }
    }

    /// Window length for a matrix of `rows` rows; 0 means too short
    pub fn window_length(&self, rows: usize) -> usize {
        self.config.max_window.min(rows / 10)
    }

    pub fn score(
        &self,
        data: &Array2<f64>,
        backend: &mut dyn SequenceBackend,
    ) -> Option<SequenceResult> {
        let window_length = self.window_length(data.nrows());
        if window_length == 0 || data.ncols() == 0 {
            log::warn!("Not enough data for sequence model ({} rows)", data.nrows());
            return None;
        }

        let (inputs, targets) = build_windows(data, window_length);
        let windows = inputs.nrows();

        log::info!(
            "Training sequence model '{}' on {} windows of length {}",
            backend.name(),
            windows,
            window_length
        );

        let history = backend.fit(&inputs, &targets, self.config.validation_split);
        let training_loss = history.loss.last().copied().unwrap_or(0.0);
        let validation_loss = history.val_loss.last().copied();

        let predictions = backend.predict(&inputs);
        let errors: Vec<f64> = (&predictions - &targets)
            .mapv(|e| e * e)
            .mean_axis(Axis(1))
            .map(|m| m.to_vec())
            .unwrap_or_default();
        let threshold = stats::quantile(&errors, THRESHOLD_PERCENTILE);

        log::debug!(
            "Sequence model: loss {:.6}, val_loss {:?}, threshold {:.6}",
            training_loss,
            validation_loss,
            threshold
        );

        Some(SequenceResult {
            backend: backend.name().to_string(),
            window_length,
            windows,
            training_loss,
            validation_loss,
            threshold,
        })
    }
}

/// Overlapping windows flattened row-major; target is each window's last row
fn build_windows(data: &Array2<f64>, length: usize) -> (Array2<f64>, Array2<f64>) {
    let (rows, cols) = data.dim();
    let count = rows + 1 - length;

    let inputs = Array2::from_shape_fn((count, length * cols), |(w, k)| {
        data[[w + k / cols, k % cols]]
    });
    let targets = Array2::from_shape_fn((count, cols), |(w, c)| data[[w + length - 1, c]]);

    (inputs, targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_length() {
        let scorer = SequenceScorer::default();
        assert_eq!(scorer.window_length(9), 0);
        assert_eq!(scorer.window_length(10), 1);
        assert_eq!(scorer.window_length(57), 5);
        assert_eq!(scorer.window_length(500), 10);
    }

    #[test]
    fn test_build_windows_layout() {
        let data = Array2::from_shape_fn((4, 2), |(i, j)| (i * 10 + j) as f64);
        let (inputs, targets) = build_windows(&data, 2);

        assert_eq!(inputs.dim(), (3, 4));
        assert_eq!(inputs.row(0).to_vec(), vec![0.0, 1.0, 10.0, 11.0]);
        assert_eq!(inputs.row(2).to_vec(), vec![20.0, 21.0, 30.0, 31.0]);
        assert_eq!(targets.row(0).to_vec(), vec![10.0, 11.0]);
        assert_eq!(targets.row(2).to_vec(), vec![30.0, 31.0]);
    }
}
