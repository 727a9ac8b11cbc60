//! Gauss-Newton and Fletcher-Xu hybrid nonlinear least squares.
use rayon::prelude::*;

use std::ops::ControlFlow;

use crate::anytime::{AnytimeAlgorithm, StopFlag};
use crate::common::{checker, utils};

use super::conjugate_gradient::ConjugateGradient;
use super::line_search::FletcherLineSearch;
use super::objective::{
    DifferentiableObjective,
    Minimum,
    Objective,
};


const DEFAULT_TOLERANCE: f64 = 1e-5;
const DEFAULT_MAX_ITER: usize = 1_000;
/// Largest allowed norm of a computed search direction.
/// A single bad Gauss-Newton step must not send the search
/// off to infinity.
const STEP_MAX: f64 = 100.0;
/// Fletcher-Xu switching threshold on the relative reduction.
const DEFAULT_SWITCH_THRESHOLD: f64 = 0.2;


/// A nonlinear least-squares problem:
/// a residual vector and its Jacobian.
/// The Jacobian is row-major, one row per residual.
pub trait LeastSquaresProblem {
    /// The residual vector at `params`.
    fn residuals(&self, params: &[f64]) -> Vec<f64>;

    /// The Jacobian of the residuals at `params`.
    fn jacobian(&self, params: &[f64]) -> Vec<Vec<f64>>;
}


/// The scalar cost `½‖r(x)‖²` of a least-squares problem,
/// exposed as a differentiable objective so any minimizer in
/// this crate can work on it.
pub struct SumOfSquares<'a, P> {
    problem: &'a P,
}


impl<'a, P> SumOfSquares<'a, P> {
    /// Wrap the given problem.
    pub fn new(problem: &'a P) -> Self {
        Self { problem }
    }
}


impl<P> Objective for SumOfSquares<'_, P>
    where P: LeastSquaresProblem,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        let residuals = self.problem.residuals(x);
        0.5 * utils::inner_product(&residuals, &residuals)
    }
}


impl<P> DifferentiableObjective for SumOfSquares<'_, P>
    where P: LeastSquaresProblem,
{
    fn differentiate(&self, x: &[f64]) -> Vec<f64> {
        let residuals = self.problem.residuals(x);
        let jacobian = self.problem.jacobian(x);
        transpose_product(&jacobian, &residuals)
    }
}


/// The product `Jᵀ·v`.
fn transpose_product(jacobian: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    let n_param = jacobian.first().map_or(0, |row| row.len());
    (0..n_param).map(|j| {
            jacobian.iter()
                .zip(v)
                .map(|(row, vi)| row[j] * vi)
                .sum::<f64>()
        })
        .collect()
}


/// The Gauss-Newton model matrix `Jᵀ·J`.
fn normal_matrix(jacobian: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n_param = jacobian.first().map_or(0, |row| row.len());
    (0..n_param).into_par_iter()
        .map(|j| {
            (0..n_param).map(|k| {
                    jacobian.iter()
                        .map(|row| row[j] * row[k])
                        .sum::<f64>()
                })
                .collect::<Vec<_>>()
        })
        .collect()
}


/// The direct BFGS update of a Hessian estimate (not its
/// inverse), used by the Fletcher-Xu hybrid when the
/// Gauss-Newton model is unreliable.
/// Returns `false` without touching the estimate when the
/// curvature denominators are near singular.
fn bfgs_direct_update(
    hessian: &mut [Vec<f64>],
    delta: &[f64],
    gamma: &[f64],
    tolerance: f64,
) -> bool
{
    let dg = utils::inner_product(delta, gamma);
    let h_delta = utils::matrix_vector_product(hessian, delta);
    let dhd = utils::inner_product(delta, &h_delta);

    let floor = (
        tolerance
            * utils::inner_product(delta, delta)
            * utils::inner_product(gamma, gamma)
    ).sqrt();
    if dg.abs() < floor || dhd.abs() < floor {
        return false;
    }

    utils::rank_one_update(hessian, 1.0 / dg, gamma, gamma);
    utils::rank_one_update(hessian, -1.0 / dhd, &h_delta, &h_delta);
    true
}


/// Minimizes a sum of squared residuals.
///
/// Each outer iteration solves the normal equations
/// `(JᵀJ)·d = -Jᵀr` with the conjugate-gradient solver,
/// clips the direction to [`STEP_MAX`], and line-searches
/// along it.
/// With [`GaussNewton::fletcher_xu`] enabled, an iteration whose
/// relative reduction falls below the switching threshold keeps
/// a BFGS-updated model matrix instead of rebuilding `JᵀJ`,
/// which restores fast convergence on large-residual problems.
pub struct GaussNewton<'a, P> {
    problem: &'a P,
    initial_point: Vec<f64>,
    line_search: FletcherLineSearch,
    tolerance: f64,
    max_iter: usize,
    switch_threshold: Option<f64>,
    stop_flag: Option<StopFlag>,

    // Transient state of the outer loop.
    point: Vec<f64>,
    value: f64,
    gradient: Vec<f64>,
    hessian: Vec<Vec<f64>>,
    use_gauss_newton_model: bool,
    iterations: usize,
}


impl<'a, P> GaussNewton<'a, P> {
    /// Initialize the minimizer at the given starting point.
    pub fn init(problem: &'a P, initial_point: Vec<f64>) -> Self {
        Self {
            problem,
            initial_point,
            line_search: FletcherLineSearch::new(),
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            switch_threshold: None,
            stop_flag: None,

            point: Vec::new(),
            value: f64::INFINITY,
            gradient: Vec::new(),
            hessian: Vec::new(),
            use_gauss_newton_model: true,
            iterations: 0,
        }
    }


    /// Enable the Fletcher-Xu hybrid with the default
    /// switching threshold.
    pub fn fletcher_xu(mut self) -> Self {
        self.switch_threshold = Some(DEFAULT_SWITCH_THRESHOLD);
        self
    }


    /// Enable the Fletcher-Xu hybrid with the given
    /// switching threshold in `[0, 1]`.
    pub fn switch_threshold(mut self, threshold: f64) -> Self {
        checker::check_probability(threshold);
        self.switch_threshold = Some(threshold);
        self
    }


    /// Set the relative function-decrease tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        checker::check_tolerance(tolerance);
        self.tolerance = tolerance;
        self
    }


    /// Set the maximum number of outer iterations.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }


    /// Attach a cooperative cancellation handle.
    pub fn stopped_by(mut self, flag: StopFlag) -> Self {
        self.stop_flag = Some(flag);
        self
    }


    /// The number of outer iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}


impl<P> AnytimeAlgorithm for GaussNewton<'_, P>
    where P: LeastSquaresProblem,
{
    type Output = Minimum;


    fn initialize(&mut self) -> bool {
        if self.initial_point.is_empty() {
            return false;
        }
        let cost = SumOfSquares::new(self.problem);

        self.point = self.initial_point.clone();
        self.value = cost.evaluate(&self.point);
        self.gradient = cost.differentiate(&self.point);
        self.hessian = Vec::new();
        self.use_gauss_newton_model = true;
        self.iterations = 0;
        true
    }


    fn step(&mut self) -> ControlFlow<()> {
        self.iterations += 1;
        let cost = SumOfSquares::new(self.problem);

        if self.use_gauss_newton_model {
            let jacobian = self.problem.jacobian(&self.point);
            self.hessian = normal_matrix(&jacobian);
        }

        // Solve the normal equations for the search direction.
        let rhs = utils::scale(-1.0, &self.gradient);
        let mut direction = ConjugateGradient::init(
            &self.hessian, rhs,
        )
            .tolerance(self.tolerance * self.tolerance)
            .run()
            .unwrap_or_else(|| utils::scale(-1.0, &self.gradient));

        // A non-descent direction means the model matrix is not
        // positive definite here; fall back to steepest descent.
        if utils::inner_product(&direction, &self.gradient) >= 0.0 {
            direction = utils::scale(-1.0, &self.gradient);
        }

        let direction_norm = utils::norm(&direction);
        if direction_norm == 0.0 {
            return ControlFlow::Break(());
        }
        if direction_norm > STEP_MAX {
            direction = utils::scale(
                STEP_MAX / direction_norm, &direction,
            );
        }

        let (_, minimum) = self.line_search.minimize_along_direction(
            &cost,
            &self.point,
            &direction,
            self.value,
            &self.gradient,
        );

        let new_gradient = cost.differentiate(&minimum.point);
        let delta = utils::subtract(&minimum.point, &self.point);
        let gamma = utils::subtract(&new_gradient, &self.gradient);

        let old_value = self.value;
        self.point = minimum.point;
        self.value = minimum.value;
        self.gradient = new_gradient;

        if 2.0 * (old_value - self.value).abs()
            <= self.tolerance * (old_value.abs() + self.value.abs())
        {
            return ControlFlow::Break(());
        }

        if let Some(threshold) = self.switch_threshold {
            let good_reduction =
                old_value - self.value >= threshold * old_value;
            if good_reduction {
                self.use_gauss_newton_model = true;
            } else {
                // Poor reduction: keep a quasi-Newton model.
                self.use_gauss_newton_model = false;
                let _ = bfgs_direct_update(
                    &mut self.hessian,
                    &delta,
                    &gamma,
                    self.tolerance,
                );
            }
        }

        ControlFlow::Continue(())
    }


    fn output(&mut self) -> Self::Output {
        Minimum {
            point: self.point.clone(),
            value: self.value,
        }
    }


    fn max_iterations(&self) -> usize {
        self.max_iter
    }


    fn stop_flag(&self) -> Option<&StopFlag> {
        self.stop_flag.as_ref()
    }
}
