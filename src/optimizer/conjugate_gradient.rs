//! A conjugate-gradient solver for symmetric positive-definite
//! linear systems, given only as a matrix-vector product.
use std::ops::ControlFlow;

use crate::anytime::{AnytimeAlgorithm, StopFlag};
use crate::common::{checker, utils};


const DEFAULT_TOLERANCE: f64 = 1e-10;
/// Recompute the residual from scratch every this many
/// iterations to bound floating-point drift.
const RESIDUAL_REFRESH_INTERVAL: usize = 50;


/// A symmetric positive-definite linear operator.
/// The matrix is never materialized beyond what the operator
/// needs; the solver only asks for products `A·x`.
pub trait LinearOperator {
    /// The product `A·x`.
    fn apply(&self, x: &[f64]) -> Vec<f64>;
}


impl LinearOperator for Vec<Vec<f64>> {
    fn apply(&self, x: &[f64]) -> Vec<f64> {
        utils::matrix_vector_product(self, x)
    }
}


impl<F> LinearOperator for F
    where F: Fn(&[f64]) -> Vec<f64>,
{
    fn apply(&self, x: &[f64]) -> Vec<f64> {
        self(x)
    }
}


/// Solves `A·x = b` for a symmetric positive-definite operator
/// `A` by the conjugate-gradient iteration.
/// Terminates once the squared residual norm falls below the
/// tolerance or the iteration limit is reached;
/// for a well-conditioned `N`-dimensional system the exact
/// solution is reached in at most `N` iterations.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
///
/// let a = vec![
///     vec![4.0, 1.0],
///     vec![1.0, 3.0],
/// ];
/// let b = vec![1.0, 2.0];
/// let x = ConjugateGradient::init(&a, b).run().unwrap();
/// ```
pub struct ConjugateGradient<'a, A> {
    operator: &'a A,
    rhs: Vec<f64>,
    tolerance: f64,
    max_iter: Option<usize>,
    stop_flag: Option<StopFlag>,

    // Transient state.
    estimate: Vec<f64>,
    residual: Vec<f64>,
    direction: Vec<f64>,
    delta: f64,
    iterations: usize,
}


impl<'a, A> ConjugateGradient<'a, A> {
    /// Initialize the solver for the right-hand side `rhs`,
    /// starting from the zero vector.
    pub fn init(operator: &'a A, rhs: Vec<f64>) -> Self {
        Self {
            operator,
            rhs,
            tolerance: DEFAULT_TOLERANCE,
            max_iter: None,
            stop_flag: None,

            estimate: Vec::new(),
            residual: Vec::new(),
            direction: Vec::new(),
            delta: f64::INFINITY,
            iterations: 0,
        }
    }


    /// Set the squared-residual convergence tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        checker::check_tolerance(tolerance);
        self.tolerance = tolerance;
        self
    }


    /// Set the maximum number of iterations.
    /// Default is ten times the problem dimension.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }


    /// Attach a cooperative cancellation handle.
    pub fn stopped_by(mut self, flag: StopFlag) -> Self {
        self.stop_flag = Some(flag);
        self
    }


    /// The number of iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}


impl<A> AnytimeAlgorithm for ConjugateGradient<'_, A>
    where A: LinearOperator,
{
    type Output = Vec<f64>;


    fn initialize(&mut self) -> bool {
        let dim = self.rhs.len();
        if dim == 0 {
            return false;
        }

        self.estimate = vec![0f64; dim];
        self.residual = self.rhs.clone();
        self.direction = self.residual.clone();
        self.delta = utils::inner_product(
            &self.residual, &self.residual,
        );
        self.iterations = 0;
        true
    }


    fn step(&mut self) -> ControlFlow<()> {
        if self.delta <= self.tolerance {
            return ControlFlow::Break(());
        }

        let q = self.operator.apply(&self.direction);
        let dq = utils::inner_product(&self.direction, &q);
        if dq.abs() <= f64::MIN_POSITIVE {
            // Near-singular direction: stop rather than divide.
            return ControlFlow::Break(());
        }

        let alpha = self.delta / dq;
        self.estimate = utils::add_scaled(
            &self.estimate, alpha, &self.direction,
        );
        self.iterations += 1;

        if self.iterations % RESIDUAL_REFRESH_INTERVAL == 0 {
            // Periodic recomputation bounds the drift of the
            // incremental residual update.
            let ax = self.operator.apply(&self.estimate);
            self.residual = utils::subtract(&self.rhs, &ax);
        } else {
            self.residual = utils::add_scaled(
                &self.residual, -alpha, &q,
            );
        }

        let delta_new = utils::inner_product(
            &self.residual, &self.residual,
        );
        let beta = delta_new / self.delta;
        self.direction = utils::add_scaled(
            &self.residual, beta, &self.direction,
        );
        self.delta = delta_new;

        if self.delta <= self.tolerance {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }


    fn output(&mut self) -> Self::Output {
        self.estimate.clone()
    }


    fn max_iterations(&self) -> usize {
        self.max_iter.unwrap_or(10 * self.rhs.len().max(1))
    }


    fn stop_flag(&self) -> Option<&StopFlag> {
        self.stop_flag.as_ref()
    }
}
