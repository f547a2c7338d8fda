//! Insight Module - Severity, summary and recommendations
//!
//! Pure mapping from a run's verdict and scorer detail to something a human
//! (or a CI step) can act on.

pub mod types;
pub mod engine;

pub use types::{InsightReport, Severity};
pub use engine::generate;
