//! Integration Tests for the Feature Builder
//!
//! Checks the assembled table: layout, calendar features and finiteness.

#[cfg(test)]
mod integration_tests {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::logic::features::{
        FeatureBuilder, MetricSource, RawMetricRecord,
        schema::BASE_FEATURES,
    };

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn mixed_records() -> Vec<RawMetricRecord> {
        vec![
            RawMetricRecord::new(at(2024, 3, 4, 9), "queue_depth", 0.0, MetricSource::Prometheus),
            RawMetricRecord::new(at(2024, 3, 4, 10), "queue_depth", 4.0, MetricSource::Prometheus),
            RawMetricRecord::new(at(2024, 3, 9, 23), "build_duration", 120.0, MetricSource::Workflow),
            RawMetricRecord::new(at(2024, 3, 10, 0), "build_duration", 0.0, MetricSource::Workflow),
            RawMetricRecord::new(at(2024, 3, 10, 1), "build_duration", 0.0, MetricSource::Workflow),
        ]
    }

    /// Layout: base columns, then sorted metric names, then sorted sources
    #[test]
    fn test_column_layout() {
        let table = FeatureBuilder::new().build(&mixed_records());
        let columns = table.schema().columns();

        assert_eq!(&columns[..BASE_FEATURES.len()], BASE_FEATURES);
        assert_eq!(
            &columns[BASE_FEATURES.len()..],
            &[
                "metric_name_build_duration",
                "metric_name_queue_depth",
                "source_prometheus",
                "source_workflow",
            ]
        );
        assert!(!columns.iter().any(|c| c == "timestamp"));
    }

    /// Every row has every column and all values are finite
    #[test]
    fn test_all_values_finite() {
        let table = FeatureBuilder::new().build(&mixed_records());
        let width = table.schema().len();

        for row in table.rows() {
            assert_eq!(row.values.len(), width);
            assert!(row.values.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_calendar_features() {
        let table = FeatureBuilder::new().build(&mixed_records());

        // 2024-03-04 is a Monday
        assert_eq!(table.get(0, "hour"), Some(9.0));
        assert_eq!(table.get(0, "day_of_week"), Some(0.0));
        assert_eq!(table.get(0, "is_weekend"), Some(0.0));

        // 2024-03-09 is a Saturday, 2024-03-10 a Sunday
        assert_eq!(table.get(2, "day_of_week"), Some(5.0));
        assert_eq!(table.get(2, "is_weekend"), Some(1.0));
        assert_eq!(table.get(3, "day_of_week"), Some(6.0));
        assert_eq!(table.get(3, "is_weekend"), Some(1.0));
    }

    #[test]
    fn test_one_hot_indicators() {
        let table = FeatureBuilder::new().build(&mixed_records());

        assert_eq!(table.get(0, "metric_name_queue_depth"), Some(1.0));
        assert_eq!(table.get(0, "metric_name_build_duration"), Some(0.0));
        assert_eq!(table.get(0, "source_prometheus"), Some(1.0));
        assert_eq!(table.get(4, "source_workflow"), Some(1.0));
        assert_eq!(table.get(4, "source_prometheus"), Some(0.0));
    }

    /// Percent change from a zero predecessor is clamped, not infinite
    #[test]
    fn test_pct_change_from_zero() {
        let table = FeatureBuilder::new().build(&mixed_records());

        assert_eq!(table.get(1, "value_pct_change"), Some(0.0));
        assert_eq!(table.get(1, "value_diff"), Some(4.0));
        assert_eq!(table.get(4, "value_pct_change"), Some(0.0));
    }

    #[test]
    fn test_single_row_rolling_stats() {
        let records = vec![RawMetricRecord::new(at(2024, 1, 1, 12), "cpu", 42.5, MetricSource::Prometheus)];
        let table = FeatureBuilder::new().build(&records);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "value_ma_5"), Some(42.5));
        assert_eq!(table.get(0, "value_ma_10"), Some(42.5));
        assert_eq!(table.get(0, "value_std_5"), Some(0.0));
        assert_eq!(table.get(0, "value_diff"), Some(0.0));
        assert_eq!(table.get(0, "value_pct_change"), Some(0.0));
    }

    #[test]
    fn test_rolling_follows_load_order() {
        // Out-of-order timestamps are not re-sorted
        let records = vec![
            RawMetricRecord::new(at(2024, 1, 2, 0), "cpu", 10.0, MetricSource::Prometheus),
            RawMetricRecord::new(at(2024, 1, 1, 0), "cpu", 20.0, MetricSource::Prometheus),
        ];
        let table = FeatureBuilder::new().build(&records);

        assert_eq!(table.get(1, "value_ma_5"), Some(15.0));
        assert_eq!(table.get(1, "value_diff"), Some(10.0));
    }

    #[test]
    fn test_empty_input() {
        let table = FeatureBuilder::new().build(&[]);
        assert!(table.is_empty());
        assert!(table.schema().is_empty());
    }

    /// The same records always freeze the same schema
    #[test]
    fn test_schema_is_deterministic() {
        let a = FeatureBuilder::new().build(&mixed_records());
        let b = FeatureBuilder::new().build(&mixed_records());
        assert_eq!(a.schema(), b.schema());
    }
}
