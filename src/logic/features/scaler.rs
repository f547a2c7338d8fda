//! Robust Feature Scaler
//!
//! Centers each column on its median and divides by its interquartile range.
//! Fitted once per run; columns with zero IQR keep unit scale.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::logic::stats;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RobustScaler {
    pub centers: Vec<f64>,
    pub scales: Vec<f64>,
}

impl RobustScaler {
    pub fn fit(data: &Array2<f64>) -> Self {
        let mut centers = Vec::with_capacity(data.ncols());
        let mut scales = Vec::with_capacity(data.ncols());

        for column in data.axis_iter(Axis(1)) {
            let mut values: Vec<f64> = column.to_vec();
            values.sort_by(|a, b| a.total_cmp(b));

            let q1 = stats::quantile_sorted(&values, 0.25);
            let q3 = stats::quantile_sorted(&values, 0.75);
            let iqr = q3 - q1;

            centers.push(stats::quantile_sorted(&values, 0.5));
            scales.push(if iqr > f64::EPSILON { iqr } else { 1.0 });
        }

        Self { centers, scales }
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        let mut out = data.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let center = self.centers.get(j).copied().unwrap_or(0.0);
            let scale = self.scales.get(j).copied().unwrap_or(1.0);
            column.mapv_inplace(|v| (v - center) / scale);
        }
        out
    }

    pub fn fit_transform(data: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(data);
        let scaled = scaler.transform(data);
        (scaler, scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_median_iqr_scaling() {
        let data = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0], [5.0, 5.0]];
        let (scaler, scaled) = RobustScaler::fit_transform(&data);

        assert_eq!(scaler.centers, vec![3.0, 5.0]);
        assert_eq!(scaler.scales, vec![2.0, 1.0]);
        assert_eq!(scaled[[0, 0]], -1.0);
        assert_eq!(scaled[[4, 0]], 1.0);
        // Constant column collapses to zero, never NaN
        assert!(scaled.column(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_matrix() {
        let data = Array2::<f64>::zeros((0, 3));
        let (scaler, scaled) = RobustScaler::fit_transform(&data);
        assert_eq!(scaler.centers.len(), 3);
        assert_eq!(scaled.dim(), (0, 3));
    }
}
