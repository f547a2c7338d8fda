//! Ensemble Fusion
//!
//! Input: scorer outputs (any mix, any order)
//! Output: EnsembleVerdict

use serde::{Deserialize, Serialize};

use super::contribution::{ScorerKind, ScorerOutput};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualConfidence {
    pub scorer: ScorerKind,
    pub confidence: f64,
    pub vote: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleVerdict {
    /// Mean of contributed confidences, 0 when nobody contributed
    pub confidence: f64,
    pub anomaly_detected: bool,
    pub contributing_scorer_count: usize,
    pub vote_count: usize,
    /// Scorers that ran, contributing or not
    pub model_count: usize,
    pub individual_confidences: Vec<IndividualConfidence>,
}

impl EnsembleVerdict {
    pub fn empty() -> Self {
        Self {
            confidence: 0.0,
            anomaly_detected: false,
            contributing_scorer_count: 0,
            vote_count: 0,
            model_count: 0,
            individual_confidences: Vec::new(),
        }
    }
}

/// Fuse scorer outputs into one verdict.
///
/// Unweighted mean of confidences; detected when at least half of the
/// contributors vote anomalous (ties count as detected).
pub fn fuse(outputs: &[&dyn ScorerOutput]) -> EnsembleVerdict {
    let individual_confidences: Vec<IndividualConfidence> = outputs
        .iter()
        .filter_map(|output| {
            output.contribution().map(|c| IndividualConfidence {
                scorer: output.kind(),
                confidence: c.confidence.clamp(0.0, 1.0),
                vote: c.vote,
            })
        })
        .collect();

    let contributors = individual_confidences.len();
    if contributors == 0 {
        return EnsembleVerdict {
            model_count: outputs.len(),
            ..EnsembleVerdict::empty()
        };
    }

    let vote_count = individual_confidences.iter().filter(|c| c.vote).count();
    let confidence = individual_confidences.iter().map(|c| c.confidence).sum::<f64>() / contributors as f64;

    // votes >= contributors / 2, kept in integers
    let anomaly_detected = 2 * vote_count >= contributors;

    log::debug!(
        "Ensemble: {}/{} votes, confidence {:.3} over {} contributors",
        vote_count,
        contributors,
        confidence,
        contributors
    );

    EnsembleVerdict {
        confidence: confidence.clamp(0.0, 1.0),
        anomaly_detected,
        contributing_scorer_count: contributors,
        vote_count,
        model_count: outputs.len(),
        individual_confidences,
    }
}
