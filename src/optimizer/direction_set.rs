//! Powell's direction-set minimization.
use std::ops::ControlFlow;

use crate::anytime::{AnytimeAlgorithm, StopFlag};
use crate::common::{checker, utils};

use super::line_search::BrentLineSearch;
use super::objective::{Minimum, Objective};


const DEFAULT_TOLERANCE: f64 = 1e-5;
const DEFAULT_MAX_ITER: usize = 1_000;
/// Replace a direction only when the normalized displacement
/// of the pass exceeds this threshold.
const DISPLACEMENT_TOLERANCE: f64 = 1e-7;


/// Minimizes a function without derivatives by Powell's method.
///
/// The minimizer keeps an ordered set of search directions,
/// one per problem dimension, initially the coordinate basis.
/// Each outer iteration line-searches every direction in turn,
/// then replaces the direction that produced the largest single
/// decrease by the net displacement of the whole pass
/// (Powell's modification, which keeps the set from collapsing
/// into linear dependence).
/// The direction set never grows or shrinks.
///
/// Each inner line search is preceded by a cancellation
/// checkpoint, so a stop request aborts a pass early and keeps
/// the best point found so far.
pub struct DirectionSetMinimizer<'a, F> {
    objective: &'a F,
    initial_point: Vec<f64>,
    line_search: BrentLineSearch,
    tolerance: f64,
    max_iter: usize,
    stop_flag: Option<StopFlag>,

    // Transient state of the outer loop.
    point: Vec<f64>,
    value: f64,
    directions: Vec<Vec<f64>>,
    iterations: usize,
}


impl<'a, F> DirectionSetMinimizer<'a, F> {
    /// Initialize the minimizer at the given starting point.
    pub fn init(objective: &'a F, initial_point: Vec<f64>) -> Self {
        Self {
            objective,
            initial_point,
            line_search: BrentLineSearch::new(),
            tolerance: DEFAULT_TOLERANCE,
            max_iter: DEFAULT_MAX_ITER,
            stop_flag: None,

            point: Vec::new(),
            value: f64::INFINITY,
            directions: Vec::new(),
            iterations: 0,
        }
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
    pub fn line_search(mut self, line_search: BrentLineSearch) -> Self {
        self.line_search = line_search;
        self
    }


    /// Attach a cooperative cancellation handle.
    pub fn stopped_by(mut self, flag: StopFlag) -> Self {
        self.stop_flag = Some(flag);
        self
    }


    /// The number of completed outer iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }


    /// A read-only view of the current direction set.
    pub fn directions(&self) -> &[Vec<f64>] {
        &self.directions
    }


    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.is_requested())
    }
}


impl<F> AnytimeAlgorithm for DirectionSetMinimizer<'_, F>
    where F: Objective,
{
    type Output = Minimum;


    fn initialize(&mut self) -> bool {
        let dim = self.initial_point.len();
        if dim == 0 {
            return false;
        }

        self.point = self.initial_point.clone();
        self.value = self.objective.evaluate(&self.point);
        self.directions = utils::scaled_identity(dim, 1.0);
        self.iterations = 0;
        true
    }


    /// One full pass over the direction set.
    fn step(&mut self) -> ControlFlow<()> {
        self.iterations += 1;

        let pass_start_point = self.point.clone();
        let pass_start_value = self.value;

        let mut best_index = 0;
        let mut best_decrease = 0f64;

        for index in 0..self.directions.len() {
            // Checkpoint: abort the pass early on a stop request,
            // keeping the best point found so far.
            if self.stop_requested() {
                return ControlFlow::Break(());
            }

            let (scale, minimum) = self.line_search
                .minimize_along_direction(
                    self.objective,
                    &self.point,
                    &self.directions[index],
                    self.value,
                );

            let decrease = self.value - minimum.value;
            if decrease > best_decrease {
                best_decrease = decrease;
                best_index = index;
            }
            self.point = minimum.point;
            self.value = minimum.value;

            // Record the effective step length in the stored
            // direction, replacing it explicitly.
            if scale != 0.0 {
                self.directions[index] = utils::scale(
                    scale, &self.directions[index],
                );
            }
        }

        // Relative decrease over the whole pass.
        if 2.0 * (pass_start_value - self.value).abs()
            <= self.tolerance
                * (pass_start_value.abs() + self.value.abs())
        {
            return ControlFlow::Break(());
        }

        let displacement = utils::subtract(
            &self.point, &pass_start_point,
        );
        let max_move = displacement.iter()
            .zip(&self.point)
            .map(|(d, x)| d.abs() / x.abs().max(1.0))
            .fold(0f64, f64::max);
        if max_move <= DISPLACEMENT_TOLERANCE {
            return ControlFlow::Break(());
        }

        // Try the net displacement as a conjugate direction.
        let (scale, minimum) = self.line_search
            .minimize_along_direction(
                self.objective,
                &self.point,
                &displacement,
                self.value,
            );
        if minimum.value < self.value {
            self.point = minimum.point;
            self.value = minimum.value;
            self.directions[best_index] = utils::scale(
                scale, &displacement,
            );
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
