//! Ensemble Rules & Thresholds
//!
//! Per-scorer contribution constants. No fusion logic here.

// ============================================================================
// DENSITY
// ============================================================================

/// Ratio multiplier before clamping to 1
pub const DENSITY_CONFIDENCE_SCALE: f64 = 10.0;

/// Density votes anomalous above this flagged-row ratio
pub const DENSITY_VOTE_RATIO: f64 = 0.15;

// ============================================================================
// STATISTICAL
// ============================================================================

pub const STATISTICAL_CONFIDENCE_SCALE: f64 = 5.0;

/// Statistical votes anomalous above this outlier rate
pub const STATISTICAL_VOTE_RATE: f64 = 0.10;

// ============================================================================
// SEQUENCE
// ============================================================================

/// Slope applied to (validation / training - 1)
pub const SEQUENCE_CONFIDENCE_SLOPE: f64 = 2.0;

/// Sequence votes anomalous above this loss ratio
pub const SEQUENCE_VOTE_RATIO: f64 = 1.5;
