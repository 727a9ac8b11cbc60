//! Quasi-Newton minimization with rank-2 Hessian-inverse updates.
use std::fmt;
use std::ops::ControlFlow;

use crate::anytime::{AnytimeAlgorithm, StopFlag};
use crate::common::{checker, utils};

use super::line_search::FletcherLineSearch;
use super::objective::{DifferentiableObjective, Minimum};


const DEFAULT_TOLERANCE: f64 = 1e-5;
const DEFAULT_MAX_ITER: usize = 1_000;
/// Initial scale of the Hessian-inverse estimate.
const INITIAL_HESSIAN_SCALE: f64 = 0.5;
/// Declare convergence once the largest relative coordinate
/// move drops below this threshold.
const COORDINATE_TOLERANCE: f64 = 1e-7;


/// The rank-2 formula applied to the Hessian-inverse estimate
/// each outer iteration.
/// BFGS and DFP differ only in which vectors the formula is
/// applied to, so the choice is a plain value rather than a
/// separate minimizer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HessianUpdate {
    /// Broyden-Fletcher-Goldfarb-Shanno.
    Bfgs,
    /// Davidon-Fletcher-Powell.
    Dfp,
}


impl HessianUpdate {
    /// Applies the rank-2 update to the Hessian-inverse estimate
    /// `hessian_inverse`, given the point difference `delta` and
    /// the gradient difference `gamma`.
    ///
    /// Returns `false` without touching the estimate when the
    /// curvature denominators are near singular; skipping the
    /// update preserves positive-definiteness.
    pub fn update(
        &self,
        hessian_inverse: &mut [Vec<f64>],
        delta: &[f64],
        gamma: &[f64],
        tolerance: f64,
    ) -> bool
    {
        let dg = utils::inner_product(delta, gamma);
        let h_gamma = utils::matrix_vector_product(
            hessian_inverse, gamma,
        );
        let ghg = utils::inner_product(gamma, &h_gamma);

        let floor = (
            tolerance
                * utils::inner_product(delta, delta)
                * utils::inner_product(gamma, gamma)
        ).sqrt();
        if dg.abs() < floor || ghg.abs() < floor {
            return false;
        }

        match self {
            Self::Bfgs => {
                let c = (1.0 + ghg / dg) / dg;
                utils::rank_one_update(
                    hessian_inverse, c, delta, delta,
                );
                utils::rank_one_update(
                    hessian_inverse, -1.0 / dg, delta, &h_gamma,
                );
                utils::rank_one_update(
                    hessian_inverse, -1.0 / dg, &h_gamma, delta,
                );
            },
            Self::Dfp => {
                utils::rank_one_update(
                    hessian_inverse, 1.0 / dg, delta, delta,
                );
                utils::rank_one_update(
                    hessian_inverse, -1.0 / ghg, &h_gamma, &h_gamma,
                );
            },
        }
        true
    }
}


impl fmt::Display for HessianUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bfgs => "BFGS",
            Self::Dfp => "DFP",
        };
        write!(f, "{name}")
    }
}


/// Minimizes a differentiable function by the quasi-Newton
/// method: the search direction is the current Hessian-inverse
/// estimate applied to the negative gradient, the step length
/// comes from a derivative-based line search, and the estimate
/// is refreshed by the chosen [`HessianUpdate`].
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use minilearn::optimizer::{DifferentiableObjective, Objective};
///
/// struct Sphere;
/// impl Objective for Sphere {
///     fn evaluate(&self, x: &[f64]) -> f64 {
///         x.iter().map(|v| v * v).sum()
///     }
/// }
/// impl DifferentiableObjective for Sphere {
///     fn differentiate(&self, x: &[f64]) -> Vec<f64> {
///         x.iter().map(|v| 2.0 * v).collect()
///     }
/// }
///
/// let mut minimizer = QuasiNewton::init(&Sphere, vec![3.0, -4.0])
///     .update_rule(HessianUpdate::Bfgs)
///     .tolerance(1e-10);
/// let minimum = minimizer.run().unwrap();
/// assert!(minimum.value < 1e-8);
/// ```
pub struct QuasiNewton<'a, F> {
    objective: &'a F,
    initial_point: Vec<f64>,
    update_rule: HessianUpdate,
    line_search: FletcherLineSearch,
    tolerance: f64,
    max_iter: usize,
    stop_flag: Option<StopFlag>,

    // Transient state of the outer loop.
    point: Vec<f64>,
    value: f64,
    gradient: Vec<f64>,
    hessian_inverse: Vec<Vec<f64>>,
    iterations: usize,
}


impl<'a, F> QuasiNewton<'a, F> {
    /// Initialize the minimizer at the given starting point.
    pub fn init(objective: &'a F, initial_point: Vec<f64>) -> Self {
        Self {
            objective,
            initial_point,
            update_rule: HessianUpdate::Bfgs,
            line_search: FletcherLineSearch::new(),
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            stop_flag: None,

            point: Vec::new(),
            value: f64::INFINITY,
            gradient: Vec::new(),
            hessian_inverse: Vec::new(),
            iterations: 0,
        }
    }


    /// Choose the Hessian-inverse update formula.
    /// Default is [`HessianUpdate::Bfgs`].
    pub fn update_rule(mut self, update_rule: HessianUpdate) -> Self {
        self.update_rule = update_rule;
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


    /// Replace the inner line search.
    pub fn line_search(mut self, line_search: FletcherLineSearch)
        -> Self
    {
        self.line_search = line_search;
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


    /// A read-only view of the current Hessian-inverse estimate.
    pub fn hessian_inverse(&self) -> &[Vec<f64>] {
        &self.hessian_inverse
    }
}


impl<F> AnytimeAlgorithm for QuasiNewton<'_, F>
    where F: DifferentiableObjective,
{
    type Output = Minimum;


    fn initialize(&mut self) -> bool {
        let dim = self.initial_point.len();
        if dim == 0 {
            return false;
        }

        self.point = self.initial_point.clone();
        self.value = self.objective.evaluate(&self.point);
        self.gradient = self.objective.differentiate(&self.point);
        self.hessian_inverse = utils::scaled_identity(
            dim, INITIAL_HESSIAN_SCALE,
        );
        self.iterations = 0;
        true
    }


    fn step(&mut self) -> ControlFlow<()> {
        self.iterations += 1;

        let mut direction = utils::scale(
            -1.0,
            &utils::matrix_vector_product(
                &self.hessian_inverse, &self.gradient,
            ),
        );

        // A non-descent direction means the estimate has been
        // corrupted by roundoff; fall back to steepest descent.
        if utils::inner_product(&direction, &self.gradient) >= 0.0 {
            self.hessian_inverse = utils::scaled_identity(
                self.point.len(), INITIAL_HESSIAN_SCALE,
            );
            direction = utils::scale(-1.0, &self.gradient);
        }
        if utils::norm(&direction) == 0.0 {
            return ControlFlow::Break(());
        }

        let (_, minimum) = self.line_search.minimize_along_direction(
            self.objective,
            &self.point,
            &direction,
            self.value,
            &self.gradient,
        );

        let new_gradient = self.objective.differentiate(&minimum.point);
        let delta = utils::subtract(&minimum.point, &self.point);
        let gamma = utils::subtract(&new_gradient, &self.gradient);

        let old_value = self.value;
        self.point = minimum.point;
        self.value = minimum.value;
        self.gradient = new_gradient;

        // Relative function decrease.
        if 2.0 * (old_value - self.value).abs()
            <= self.tolerance * (old_value.abs() + self.value.abs())
        {
            return ControlFlow::Break(());
        }

        // Largest relative coordinate move.
        let max_move = delta.iter()
            .zip(&self.point)
            .map(|(d, x)| d.abs() / x.abs().max(1.0))
            .fold(0f64, f64::max);
        if max_move < COORDINATE_TOLERANCE {
            return ControlFlow::Break(());
        }

        // A near-singular update is silently skipped.
        let _ = self.update_rule.update(
            &mut self.hessian_inverse,
            &delta,
            &gamma,
            self.tolerance,
        );

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
