//! Model Module - Anomaly Scorers
//!
//! Three independent scorers over one run's feature table.
//! Each returns its own result type; the ensemble only sees contributions.
//!
//! - `density` - isolation forest over the scaled matrix
//! - `statistical` - z-score and IQR counts per column
//! - `sequence` - sliding-window reconstruction (optional)

pub mod isolation;
pub mod density;
pub mod statistical;
pub mod sequence;
#[cfg(feature = "sequence-model")]
pub mod network;


// Re-export common types
pub use density::{DensityConfig, DensityResult, DensityScorer};
pub use statistical::{StatisticalResult, StatisticalScorer};
pub use sequence::{
    available_backend, BackendProvider, SequenceConfig, SequenceResult, SequenceScorer,
};
