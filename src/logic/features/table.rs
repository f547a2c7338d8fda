//! Feature Table - Rectangular numeric view of a run's metric records
//!
//! Rows keep their values in schema order, so every row carries the same
//! column set by construction.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::schema::FeatureSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct FeatureTable {
    schema: FeatureSchema,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    /// Rows shorter than the schema are zero padded, longer rows truncated
    pub fn new(schema: FeatureSchema, rows: Vec<FeatureRow>) -> Self {
        let width = schema.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.values.resize(width, 0.0);
                for v in row.values.iter_mut() {
                    if !v.is_finite() {
                        *v = 0.0;
                    }
                }
                row
            })
            .collect();

        Self { schema, rows }
    }

    pub fn empty() -> Self {
        Self {
            schema: FeatureSchema::empty(),
            rows: Vec::new(),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    #[cfg(test)]
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of a named feature in a given row
    #[cfg(test)]
    pub fn get(&self, row: usize, name: &str) -> Option<f64> {
        let col = self.schema.index_of(name)?;
        self.rows.get(row).and_then(|r| r.values.get(col).copied())
    }

    /// All values of one column, in row order
    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows
            .iter()
            .map(|r| r.values.get(index).copied().unwrap_or(0.0))
            .collect()
    }

    /// Dense `rows x columns` matrix in schema order
    pub fn to_matrix(&self) -> Array2<f64> {
        let width = self.schema.len();
        Array2::from_shape_fn((self.rows.len(), width), |(i, j)| self.rows[i].values[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_rows_are_padded_and_sanitized() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into(), "c".into()]);
        let table = FeatureTable::new(
            schema,
            vec![
                FeatureRow { timestamp: ts(), values: vec![1.0] },
                FeatureRow { timestamp: ts(), values: vec![f64::NAN, f64::INFINITY, 2.0, 9.0] },
            ],
        );

        assert_eq!(table.rows()[0].values, vec![1.0, 0.0, 0.0]);
        assert_eq!(table.rows()[1].values, vec![0.0, 0.0, 2.0]);
        assert_eq!(table.get(1, "c"), Some(2.0));
        assert_eq!(table.get(1, "missing"), None);
    }

    #[test]
    fn test_to_matrix_shape() {
        let schema = FeatureSchema::new(vec!["a".into(), "b".into()]);
        let table = FeatureTable::new(
            schema,
            vec![
                FeatureRow { timestamp: ts(), values: vec![1.0, 2.0] },
                FeatureRow { timestamp: ts(), values: vec![3.0, 4.0] },
                FeatureRow { timestamp: ts(), values: vec![5.0, 6.0] },
            ],
        );

        let m = table.to_matrix();
        assert_eq!(m.dim(), (3, 2));
        assert_eq!(m[[2, 1]], 6.0);
        assert_eq!(table.column(0), vec![1.0, 3.0, 5.0]);
    }
}
