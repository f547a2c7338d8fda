//! Window Regressor - native sequence backend
//!
//! Two-layer dense network (flattened window → tanh hidden → linear output)
//! trained with Adam on mean-squared error. Deterministic for a given seed.

use ndarray::{Array, Array1, Array2, Axis, Dimension, Zip};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::sequence::{SequenceBackend, SequenceConfig, TrainingHistory};

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

/// First/second moment estimates for one parameter tensor
#[derive(Debug, Clone)]
struct AdamState<D: Dimension> {
    m: Array<f64, D>,
    v: Array<f64, D>,
}

impl<D: Dimension> AdamState<D> {
    fn like(param: &Array<f64, D>) -> Self {
        Self {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn step(&mut self, param: &mut Array<f64, D>, grad: &Array<f64, D>, lr: f64, t: i32) {
        let bias1 = 1.0 - ADAM_BETA1.powi(t);
        let bias2 = 1.0 - ADAM_BETA2.powi(t);

        Zip::from(param)
            .and(&mut self.m)
            .and(&mut self.v)
            .and(grad)
            .for_each(|p, m, v, &g| {
                *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
                *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *p -= lr * m_hat / (v_hat.sqrt() + ADAM_EPSILON);
            });
    }
}

#[derive(Debug, Clone)]
pub struct WindowRegressor {
    hidden_units: usize,
    epochs: usize,
    batch_size: usize,
    learning_rate: f64,
    seed: u64,
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

impl WindowRegressor {
    pub fn new(config: &SequenceConfig) -> Self {
        Self {
            hidden_units: config.hidden_units.max(1),
            epochs: config.epochs.max(1),
            batch_size: config.batch_size.max(1),
            learning_rate: config.learning_rate,
            seed: config.seed,
            w1: Array2::zeros((0, 0)),
            b1: Array1::zeros(0),
            w2: Array2::zeros((0, 0)),
            b2: Array1::zeros(0),
        }
    }

    /// Glorot-uniform weights, zero biases
    fn init_weights(&mut self, n_in: usize, n_out: usize, rng: &mut StdRng) {
        let h = self.hidden_units;
        self.w1 = glorot(n_in, h, rng);
        self.b1 = Array1::zeros(h);
        self.w2 = glorot(h, n_out, rng);
        self.b2 = Array1::zeros(n_out);
    }

    fn hidden(&self, inputs: &Array2<f64>) -> Array2<f64> {
        (inputs.dot(&self.w1) + &self.b1).mapv(f64::tanh)
    }

    fn output(&self, hidden: &Array2<f64>) -> Array2<f64> {
        hidden.dot(&self.w2) + &self.b2
    }
}

impl SequenceBackend for WindowRegressor {
    fn name(&self) -> &'static str {
        "window_regressor"
    }

    fn fit(
        &mut self,
        inputs: &Array2<f64>,
        targets: &Array2<f64>,
        validation_split: f64,
    ) -> TrainingHistory {
        let n = inputs.nrows();
        let n_train = training_rows(n, validation_split);
        let n_val = n - n_train;

        let mut rng = StdRng::seed_from_u64(self.seed);
        self.init_weights(inputs.ncols(), targets.ncols(), &mut rng);

        let mut history = TrainingHistory::default();
        if n_train == 0 {
            return history;
        }

        // Tail of the window sequence is held out
        let train_x = inputs.slice(ndarray::s![..n_train, ..]).to_owned();
        let train_y = targets.slice(ndarray::s![..n_train, ..]).to_owned();
        let val_x = inputs.slice(ndarray::s![n_train.., ..]).to_owned();
        let val_y = targets.slice(ndarray::s![n_train.., ..]).to_owned();

        let mut adam_w1 = AdamState::like(&self.w1);
        let mut adam_b1 = AdamState::like(&self.b1);
        let mut adam_w2 = AdamState::like(&self.w2);
        let mut adam_b2 = AdamState::like(&self.b2);
        let mut step = 0;

        let mut order: Vec<usize> = (0..n_train).collect();

        for _ in 0..self.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in order.chunks(self.batch_size) {
                let x = train_x.select(Axis(0), batch);
                let y = train_y.select(Axis(0), batch);

                let h = self.hidden(&x);
                let pred = self.output(&h);
                let err = &pred - &y;
                epoch_loss += err.mapv(|e| e * e).mean().unwrap_or(0.0) * batch.len() as f64;

                // Backward pass
                let d_out = err * (2.0 / (x.nrows() * y.ncols()).max(1) as f64);
                let grad_w2 = h.t().dot(&d_out);
                let grad_b2 = d_out.sum_axis(Axis(0));
                let d_hidden = d_out.dot(&self.w2.t()) * h.mapv(|a| 1.0 - a * a);
                let grad_w1 = x.t().dot(&d_hidden);
                let grad_b1 = d_hidden.sum_axis(Axis(0));

                step += 1;
                adam_w1.step(&mut self.w1, &grad_w1, self.learning_rate, step);
                adam_b1.step(&mut self.b1, &grad_b1, self.learning_rate, step);
                adam_w2.step(&mut self.w2, &grad_w2, self.learning_rate, step);
                adam_b2.step(&mut self.b2, &grad_b2, self.learning_rate, step);
            }

            history.loss.push(epoch_loss / n_train as f64);
            if n_val > 0 {
                history.val_loss.push(mse(&self.predict(&val_x), &val_y));
            }
        }

        history
    }

    fn predict(&self, inputs: &Array2<f64>) -> Array2<f64> {
        self.output(&self.hidden(inputs))
    }
}

/// Rows kept for training; the rest of the tail is held out.
/// The training share is rounded down, so the held-out share rounds up.
fn training_rows(n: usize, validation_split: f64) -> usize {
    ((n as f64) * (1.0 - validation_split.clamp(0.0, 0.9))).floor() as usize
}

fn glorot(n_in: usize, n_out: usize, rng: &mut StdRng) -> Array2<f64> {
    let limit = (6.0 / (n_in + n_out).max(1) as f64).sqrt();
    Array2::from_shape_fn((n_in, n_out), |_| rng.gen_range(-limit..limit))
}

fn mse(pred: &Array2<f64>, target: &Array2<f64>) -> f64 {
    (pred - target).mapv(|e| e * e).mean().unwrap_or(0.0)
}
