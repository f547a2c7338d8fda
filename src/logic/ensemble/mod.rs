//! Ensemble Module
//!
//! Turns independent scorer outputs into one confidence and one verdict.
//!
//! ## Structure
//! - `rules`: Per-scorer scales and vote thresholds
//! - `contribution`: `ScorerOutput` trait and its implementations
//! - `fusion`: Averaging and majority vote
//!
//! ## Usage
//! ```ignore
//! use crate::logic::ensemble::{fuse, ScorerOutput};
//!
//! let verdict = fuse(&[&density, &statistical]);
//! if verdict.anomaly_detected {
//!     println!("confidence {:.3}", verdict.confidence);
//! }
//! ```

pub mod rules;
pub mod contribution;
pub mod fusion;

#[cfg(test)]
mod tests;

pub use contribution::{ScorerKind, ScorerOutput, ScorerResult};
pub use fusion::{fuse, EnsembleVerdict};
