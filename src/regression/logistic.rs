//! Binary logistic regression fit by quasi-Newton minimization.
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::anytime::AnytimeAlgorithm;
use crate::common::checker;
use crate::hypothesis::Classifier;
use crate::optimizer::{
    DifferentiableObjective,
    HessianUpdate,
    Objective,
    QuasiNewton,
};
use crate::sample::Sample;


const DEFAULT_TOLERANCE: f64 = 1e-8;
const DEFAULT_MAX_ITER: usize = 200;


/// A linear threshold classifier `sign(w·x + b)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearClassifier {
    weights: Vec<f64>,
    bias: f64,
}


impl LinearClassifier {
    /// The learned feature weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }


    /// The learned bias term.
    pub fn bias(&self) -> f64 {
        self.bias
    }


    fn margin(&self, sample: &Sample, row: usize) -> f64 {
        let x = sample.row(row);
        self.weights.iter()
            .zip(&x)
            .map(|(w, xi)| w * xi)
            .sum::<f64>()
            + self.bias
    }
}


impl Classifier for LinearClassifier {
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        // Squash the margin into `(-1, 1)`, keeping its sign.
        (0.5 * self.margin(sample, row)).tanh()
    }
}


/// `ln(1 + exp(t))` without overflow for large `|t|`.
fn softplus(t: f64) -> f64 {
    t.max(0.0) + (-t.abs()).exp().ln_1p()
}


/// The standard logistic function, evaluated without overflow.
fn sigmoid(t: f64) -> f64 {
    if t >= 0.0 {
        1.0 / (1.0 + (-t).exp())
    } else {
        let e = t.exp();
        e / (1.0 + e)
    }
}


/// The regularized negative log-likelihood of a linear
/// classifier, over parameters `[w₁, …, w_d, b]`.
struct LogisticCost<'a> {
    sample: &'a Sample,
    regularization: f64,
}


impl LogisticCost<'_> {
    /// The margin `w·xᵢ + b` at `row`.
    fn margin(&self, params: &[f64], row: usize) -> f64 {
        let x = self.sample.row(row);
        let (weights, bias) = params.split_at(params.len() - 1);
        weights.iter()
            .zip(&x)
            .map(|(w, xi)| w * xi)
            .sum::<f64>()
            + bias[0]
    }
}


impl Objective for LogisticCost<'_> {
    fn evaluate(&self, params: &[f64]) -> f64 {
        let n_sample = self.sample.shape().0;
        let target = self.sample.target();

        let loss = (0..n_sample).into_par_iter()
            .map(|row| {
                let z = self.margin(params, row);
                softplus(-target[row] * z)
            })
            .sum::<f64>()
            / n_sample as f64;

        let penalty = 0.5 * self.regularization
            * params[..params.len() - 1].iter()
                .map(|w| w * w)
                .sum::<f64>();
        loss + penalty
    }
}


impl DifferentiableObjective for LogisticCost<'_> {
    fn differentiate(&self, params: &[f64]) -> Vec<f64> {
        let n_sample = self.sample.shape().0;
        let n_param = params.len();
        let target = self.sample.target();

        let mut gradient = (0..n_sample).into_par_iter()
            .map(|row| {
                let y = target[row];
                let z = self.margin(params, row);
                // d/dz softplus(-y z) = -y σ(-y z).
                let factor = -y * sigmoid(-y * z);

                let mut g = self.sample.row(row);
                g.iter_mut().for_each(|gi| *gi *= factor);
                g.push(factor);
                g
            })
            .reduce(
                || vec![0f64; n_param],
                |mut acc, g| {
                    acc.iter_mut()
                        .zip(&g)
                        .for_each(|(a, gi)| *a += gi);
                    acc
                },
            );

        gradient.iter_mut()
            .for_each(|gi| *gi /= n_sample as f64);
        // The bias term is not regularized.
        gradient[..n_param - 1].iter_mut()
            .zip(params)
            .for_each(|(gi, w)| *gi += self.regularization * w);
        gradient
    }
}


/// Fits a [`LinearClassifier`] by minimizing the regularized
/// logistic loss with [`QuasiNewton`].
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
///
/// let sample = SampleReader::new()
///     .file("training.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
///
/// let f = LogisticRegression::init(&sample)
///     .regularization(1e-3)
///     .fit()
///     .unwrap();
/// let predictions = f.predict_all(&sample);
/// ```
pub struct LogisticRegression<'a> {
    sample: &'a Sample,
    regularization: f64,
    tolerance: f64,
    max_iter: usize,
}


impl<'a> LogisticRegression<'a> {
    /// Construct a new instance of `LogisticRegression`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            regularization: 0.0,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
        }
    }


    /// Set the L2 regularization strength on the weights.
    /// The bias is never regularized.
    /// Default value is `0.0.`
    pub fn regularization(mut self, regularization: f64) -> Self {
        assert!(
            regularization >= 0.0,
            "The regularization strength must be non-negative."
        );
        self.regularization = regularization;
        self
    }


    /// Set the relative function-decrease tolerance of the
    /// inner minimizer.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        checker::check_tolerance(tolerance);
        self.tolerance = tolerance;
        self
    }


    /// Set the iteration limit of the inner minimizer.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }


    /// Fit the model.
    /// Returns `None` when the training sample is empty.
    pub fn fit(&self) -> Option<LinearClassifier> {
        let (n_sample, n_feature) = self.sample.shape();
        if n_sample == 0 || n_feature == 0 {
            return None;
        }
        self.sample.is_valid_binary_instance();

        let cost = LogisticCost {
            sample: self.sample,
            regularization: self.regularization,
        };

        let minimum = QuasiNewton::init(
            &cost, vec![0f64; n_feature + 1],
        )
            .update_rule(HessianUpdate::Bfgs)
            .tolerance(self.tolerance)
            .max_iterations(self.max_iter)
            .run()?;

        let mut weights = minimum.point;
        let bias = weights.pop()?;
        Some(LinearClassifier { weights, bias })
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn softplus_is_stable_at_extremes() {
        assert!(softplus(-1e3).abs() < 1e-12);
        assert!((softplus(1e3) - 1e3).abs() < 1e-9);
        assert!((softplus(0.0) - 2f64.ln()).abs() < 1e-12);
    }


    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert!(sigmoid(-1e3) >= 0.0);
        assert!(sigmoid(-1e3) < 1e-12);
        assert!((sigmoid(1e3) - 1.0).abs() < 1e-12);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
