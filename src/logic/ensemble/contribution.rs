//! Scorer Contributions
//!
//! Each scorer result maps to at most one `(confidence, vote)` pair.
//! The fusion step never looks at concrete scorer types.

use serde::{Deserialize, Serialize};

use crate::logic::model::{DensityResult, SequenceResult, StatisticalResult};
use super::rules::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    Density,
    Statistical,
    Sequence,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Density => "density",
            ScorerKind::Statistical => "statistical",
            ScorerKind::Sequence => "sequence",
        }
    }
}

impl std::fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// In [0, 1]
    pub confidence: f64,
    /// Local anomaly indicator
    pub vote: bool,
}

/// Anything the ensemble can fuse
pub trait ScorerOutput {
    fn kind(&self) -> ScorerKind;

    /// `None` = no opinion; the scorer is left out of the average and the vote
    fn contribution(&self) -> Option<Contribution>;
}

impl ScorerOutput for DensityResult {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Density
    }

    fn contribution(&self) -> Option<Contribution> {
        Some(Contribution {
            confidence: (self.anomaly_ratio * DENSITY_CONFIDENCE_SCALE).clamp(0.0, 1.0),
            vote: self.anomaly_ratio > DENSITY_VOTE_RATIO,
        })
    }
}

impl ScorerOutput for StatisticalResult {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Statistical
    }

    fn contribution(&self) -> Option<Contribution> {
        Some(Contribution {
            confidence: (self.anomaly_rate * STATISTICAL_CONFIDENCE_SCALE).clamp(0.0, 1.0),
            vote: self.anomaly_rate > STATISTICAL_VOTE_RATE,
        })
    }
}

impl ScorerOutput for SequenceResult {
    fn kind(&self) -> ScorerKind {
        ScorerKind::Sequence
    }

    fn contribution(&self) -> Option<Contribution> {
        let validation = self.validation_loss?;
        if self.training_loss <= 0.0 || validation <= 0.0 {
            return None;
        }

        let ratio = validation / self.training_loss;
        let confidence = if ratio > 1.0 {
            ((ratio - 1.0) * SEQUENCE_CONFIDENCE_SLOPE).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(Contribution {
            confidence,
            vote: ratio > SEQUENCE_VOTE_RATIO,
        })
    }
}

// ============================================================================
// TAGGED RESULT
// ============================================================================

/// One scorer's full output, tagged by kind for serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerResult {
    Density(DensityResult),
    Statistical(StatisticalResult),
    Sequence(SequenceResult),
}

impl ScorerResult {
    fn inner(&self) -> &dyn ScorerOutput {
        match self {
            ScorerResult::Density(r) => r,
            ScorerResult::Statistical(r) => r,
            ScorerResult::Sequence(r) => r,
        }
    }
}

impl ScorerOutput for ScorerResult {
    fn kind(&self) -> ScorerKind {
        self.inner().kind()
    }

    fn contribution(&self) -> Option<Contribution> {
        self.inner().contribution()
    }
}
