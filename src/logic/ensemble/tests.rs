//! Unit Tests for Ensemble Fusion

#[cfg(test)]
mod fusion_tests {
    use crate::logic::ensemble::{fuse, ScorerKind, ScorerOutput, ScorerResult};
    use crate::logic::model::density::ScoreStats;
    use crate::logic::model::{DensityResult, SequenceResult, StatisticalResult};

    fn density(ratio: f64) -> DensityResult {
        DensityResult {
            anomaly_ratio: ratio,
            flagged_rows: 0,
            threshold: 0.5,
            score_stats: ScoreStats::default(),
            feature_importance: Vec::new(),
        }
    }

    fn statistical(rate: f64) -> StatisticalResult {
        StatisticalResult {
            method: "statistical".to_string(),
            column_details: Vec::new(),
            total_anomalies: 0,
            total_points: 100,
            anomaly_rate: rate,
        }
    }

    fn sequence(train: f64, val: Option<f64>) -> SequenceResult {
        SequenceResult {
            backend: "test".to_string(),
            window_length: 10,
            windows: 91,
            training_loss: train,
            validation_loss: val,
            threshold: 0.1,
        }
    }

    #[test]
    fn test_contribution_formulas() {
        let d = density(0.05).contribution().unwrap();
        assert!((d.confidence - 0.5).abs() < 1e-12);
        assert!(!d.vote);

        let d = density(0.3).contribution().unwrap();
        assert_eq!(d.confidence, 1.0);
        assert!(d.vote);

        let s = statistical(0.12).contribution().unwrap();
        assert!((s.confidence - 0.6).abs() < 1e-12);
        assert!(s.vote);

        let q = sequence(0.2, Some(0.4)).contribution().unwrap();
        assert_eq!(q.confidence, 1.0);
        assert!(q.vote);

        let q = sequence(0.2, Some(0.22)).contribution().unwrap();
        assert!((q.confidence - 0.2).abs() < 1e-9);
        assert!(!q.vote);

        let q = sequence(0.4, Some(0.2)).contribution().unwrap();
        assert_eq!(q.confidence, 0.0);
    }

    #[test]
    fn test_sequence_without_losses_has_no_opinion() {
        assert!(sequence(0.0, Some(0.3)).contribution().is_none());
        assert!(sequence(0.3, Some(0.0)).contribution().is_none());
        assert!(sequence(0.3, None).contribution().is_none());
    }

    #[test]
    fn test_statistical_only_zero_rate() {
        let s = statistical(0.0);
        let verdict = fuse(&[&s]);

        assert_eq!(verdict.confidence, 0.0);
        assert!(!verdict.anomaly_detected);
        assert_eq!(verdict.contributing_scorer_count, 1);
        assert_eq!(verdict.vote_count, 0);
    }

    #[test]
    fn test_no_contributors() {
        let verdict = fuse(&[]);
        assert_eq!(verdict.confidence, 0.0);
        assert!(!verdict.anomaly_detected);

        let silent = sequence(0.0, None);
        let verdict = fuse(&[&silent]);
        assert_eq!(verdict.model_count, 1);
        assert_eq!(verdict.contributing_scorer_count, 0);
        assert!(!verdict.anomaly_detected);
    }

    /// One vote out of two is a tie, and ties are detected
    #[test]
    fn test_tie_counts_as_detected() {
        let d = density(0.2);
        let s = statistical(0.0);
        let verdict = fuse(&[&d, &s]);

        assert_eq!(verdict.vote_count, 1);
        assert_eq!(verdict.contributing_scorer_count, 2);
        assert!(verdict.anomaly_detected);
        assert!((verdict.confidence - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_absent_sequence_is_excluded_from_mean() {
        let d = density(0.05);
        let s = statistical(0.05);
        let q = sequence(0.3, None);

        let with = fuse(&[&d, &s, &q]);
        let without = fuse(&[&d, &s]);

        assert_eq!(with.confidence, without.confidence);
        assert_eq!(with.model_count, 3);
        assert_eq!(with.individual_confidences.len(), 2);
    }

    #[test]
    fn test_confidence_always_in_unit_range() {
        let cases = [0.0, 0.01, 0.1, 0.5, 1.0, 7.0];
        for &a in &cases {
            for &b in &cases {
                let d = density(a);
                let s = statistical(b);
                let verdict = fuse(&[&d, &s]);
                assert!((0.0..=1.0).contains(&verdict.confidence));
            }
        }
    }

    #[test]
    fn test_tagged_result_delegates() {
        let tagged = ScorerResult::Statistical(statistical(0.2));
        assert_eq!(tagged.kind(), ScorerKind::Statistical);
        assert_eq!(tagged.contribution(), statistical(0.2).contribution());

        let json = serde_json::to_value(&tagged).unwrap();
        assert_eq!(json["kind"], "statistical");
    }
}
