//! Isolation Forest
//!
//! Random axis-aligned partitioning: points that are isolated in fewer splits
//! are more anomalous. Each tree sees a sub-sample of rows (without
//! replacement) and a random subset of at most `max_features` columns.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_9;

#[derive(Debug, Clone)]
pub struct IsolationForest {
    n_estimators: usize,
    max_samples: usize,
    max_features: usize,
    seed: u64,
    /// Rows per tree actually used at fit time
    sample_size: usize,
    trees: Vec<IsolationTree>,
}

impl IsolationForest {
    pub fn new(n_estimators: usize, max_samples: usize, max_features: usize, seed: u64) -> Self {
        Self {
            n_estimators: n_estimators.max(1),
            max_samples: max_samples.max(1),
            max_features: max_features.max(1),
            seed,
            sample_size: 0,
            trees: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Fit the forest; an empty matrix leaves it unfitted
    pub fn fit(&mut self, data: &Array2<f64>) {
        self.trees.clear();

        let (n_rows, n_cols) = data.dim();
        if n_rows == 0 {
            return;
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.sample_size = self.max_samples.min(n_rows);
        let max_depth = (self.sample_size.max(2) as f64).log2().ceil() as usize;
        let n_features = self.max_features.min(n_cols);

        for _ in 0..self.n_estimators {
            let rows = sample(&mut rng, n_rows, self.sample_size).into_vec();
            let features = if n_features > 0 {
                sample(&mut rng, n_cols, n_features).into_vec()
            } else {
                Vec::new()
            };

            let root = Node::build(data, &rows, &features, 0, max_depth, &mut rng);
            self.trees.push(IsolationTree { root });
        }
    }

    /// Anomaly score per row in (0, 1]; higher = more anomalous.
    /// An unfitted forest scores every row 0.5.
    pub fn score(&self, data: &Array2<f64>) -> Vec<f64> {
        let c_n = average_path_length(self.sample_size as f64);
        if self.trees.is_empty() || c_n <= 0.0 {
            return vec![0.5; data.nrows()];
        }

        data.rows()
            .into_iter()
            .map(|point| {
                let avg_path = self
                    .trees
                    .iter()
                    .map(|tree| tree.root.path_length(point, 0))
                    .sum::<f64>()
                    / self.trees.len() as f64;

                // s(x) = 2^(-E[h(x)] / c(n))
                2.0_f64.powf(-avg_path / c_n)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct IsolationTree {
    root: Node,
}

#[derive(Debug, Clone)]
enum Node {
    Internal {
        feature: usize,
        split: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    External {
        size: usize,
    },
}

impl Node {
    fn build(
        data: &Array2<f64>,
        rows: &[usize],
        features: &[usize],
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> Node {
        if depth >= max_depth || rows.len() <= 1 || features.is_empty() {
            return Node::External { size: rows.len() };
        }

        // Try features in random order until one is not constant on this node
        let start = rng.gen_range(0..features.len());
        for offset in 0..features.len() {
            let feature = features[(start + offset) % features.len()];

            let (min, max) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                let v = data[[r, feature]];
                (lo.min(v), hi.max(v))
            });

            if max - min <= f64::EPSILON {
                continue;
            }

            let split = rng.gen_range(min..max);
            let (left, right): (Vec<usize>, Vec<usize>) =
                rows.iter().copied().partition(|&r| data[[r, feature]] < split);

            if left.is_empty() || right.is_empty() {
                return Node::External { size: rows.len() };
            }

            return Node::Internal {
                feature,
                split,
                left: Box::new(Node::build(data, &left, features, depth + 1, max_depth, rng)),
                right: Box::new(Node::build(data, &right, features, depth + 1, max_depth, rng)),
            };
        }

        Node::External { size: rows.len() }
    }

    fn path_length(&self, point: ArrayView1<f64>, depth: usize) -> f64 {
        match self {
            Node::External { size } => depth as f64 + average_path_length(*size as f64),
            Node::Internal { feature, split, left, right } => {
                let value = point.get(*feature).copied().unwrap_or(0.0);
                if value < *split {
                    left.path_length(point, depth + 1)
                } else {
                    right.path_length(point, depth + 1)
                }
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
fn average_path_length(n: f64) -> f64 {
    if n <= 1.0 {
        return 0.0;
    }
    if n <= 2.0 {
        return 1.0;
    }
    2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    #[test]
    fn test_average_path_length() {
        assert_eq!(average_path_length(1.0), 0.0);
        assert_eq!(average_path_length(2.0), 1.0);
        assert!((average_path_length(256.0) - 10.24).abs() < 0.05);
    }

    #[test]
    fn test_isolated_point_scores_highest() {
        let mut data = Array2::<f64>::zeros((64, 2));
        for i in 0..63 {
            data[[i, 0]] = (i % 8) as f64 * 0.1;
            data[[i, 1]] = (i / 8) as f64 * 0.1;
        }
        data[[63, 0]] = 50.0;
        data[[63, 1]] = 50.0;

        let mut forest = IsolationForest::new(100, 256, 10, 7);
        forest.fit(&data);
        let scores = forest.score(&data);

        let outlier = scores[63];
        assert!(scores[..63].iter().all(|&s| s < outlier));
    }

    #[test]
    fn test_seed_determinism() {
        let data = Array2::from_shape_fn((40, 3), |(i, j)| ((i * 7 + j * 13) % 11) as f64);

        let mut a = IsolationForest::new(50, 256, 10, 42);
        let mut b = IsolationForest::new(50, 256, 10, 42);
        a.fit(&data);
        b.fit(&data);

        assert_eq!(a.score(&data), b.score(&data));
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        let mut forest = IsolationForest::new(10, 256, 10, 1);

        forest.fit(&Array2::zeros((0, 4)));
        assert!(!forest.is_fitted());

        let one_row = Array2::from_elem((1, 3), 2.0);
        forest.fit(&one_row);
        assert_eq!(forest.score(&one_row), vec![0.5]);

        let constant = Array2::from_elem((20, 3), 1.0);
        forest.fit(&constant);
        let scores = forest.score(&constant);
        assert!(scores.iter().all(|s| s.is_finite()));
    }
}
