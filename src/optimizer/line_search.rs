//! Line minimization along a search direction.
//!
//! Both searches run the same two-phase state machine:
//! a *bracketing* phase that establishes an interval guaranteed
//! to contain a minimum, then a *sectioning* phase that narrows
//! the interval until an acceptable point is found.
//! [`FletcherLineSearch`] is derivative-based and accepts a point
//! as soon as the Wolfe conditions hold;
//! [`BrentLineSearch`] is derivative-free and narrows the bracket
//! down to a width tolerance.
use crate::common::{checker, utils};

use super::objective::{
    DifferentiableObjective,
    DifferentiableScalarObjective,
    DirectionalObjective,
    Minimum,
    Objective,
    ScalarObjective,
};
use super::triplet::{InputOutputSlopeTriplet, LineBracket};
use super::wolfe::WolfeConditions;


/// Maximal extrapolation factor of the bracketing phase.
const TAU1: f64 = 5.0;
/// Lower sectioning margin, as a fraction of the bracket width.
const TAU2: f64 = 0.1;
/// Upper sectioning margin, as a fraction of the bracket width.
const TAU3: f64 = 0.5;

const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;
/// Interior golden-section fraction, `2 - φ`.
const GOLDEN_SECTION: f64 = 0.381_966_011_250_105;

const DEFAULT_TOLERANCE: f64 = 1e-5;
const DEFAULT_INITIAL_STEP: f64 = 1.0;
const DEFAULT_SLOPE_CONDITION: f64 = 1e-4;
const DEFAULT_CURVATURE_CONDITION: f64 = 0.9;
const DEFAULT_MIN_FUNCTION_VALUE: f64 = 0.0;
const DEFAULT_MAX_BRACKET_STEPS: usize = 100;
const DEFAULT_MAX_SECTION_STEPS: usize = 100;


/// The phase of a line search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchPhase {
    Bracketing,
    Sectioning,
    Done,
}


/// Derivative-based line search (Fletcher's algorithm).
///
/// The bracketing phase walks forward from the origin,
/// extrapolating by at least one previous step width and at most
/// `TAU1 = 5` times the previous step, clipped to the largest
/// step consistent with [`FletcherLineSearch::min_function_value`].
/// A bracket is declared as soon as the Goldstein condition fails,
/// the function stops decreasing, or the slope changes sign;
/// a point satisfying both Wolfe conditions short-circuits the
/// search entirely.
/// The sectioning phase fits a Hermite cubic to the value and
/// slope at both bracket ends and evaluates its minimizer inside
/// `[a + TAU2·Δ, b − TAU3·Δ]`, narrowing until the strict
/// curvature condition holds or the bracket width falls below
/// the tolerance.
#[derive(Debug, Clone)]
pub struct FletcherLineSearch {
    slope_condition: f64,
    curvature_condition: f64,
    tolerance: f64,
    initial_step: f64,
    min_function_value: f64,
    max_bracket_steps: usize,
    max_section_steps: usize,
}


impl Default for FletcherLineSearch {
    fn default() -> Self {
        Self::new()
    }
}


impl FletcherLineSearch {
    /// Construct a search with the default parameters.
    pub fn new() -> Self {
        Self {
            slope_condition: DEFAULT_SLOPE_CONDITION,
            curvature_condition: DEFAULT_CURVATURE_CONDITION,
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            min_function_value: DEFAULT_MIN_FUNCTION_VALUE,
            max_bracket_steps: DEFAULT_MAX_BRACKET_STEPS,
            max_section_steps: DEFAULT_MAX_SECTION_STEPS,
        }
    }


    /// Set the Wolfe condition parameters.
    /// Panics unless `0 < slope < curvature < 1`.
    pub fn wolfe_parameters(mut self, slope: f64, curvature: f64)
        -> Self
    {
        checker::check_wolfe_parameters(slope, curvature);
        self.slope_condition = slope;
        self.curvature_condition = curvature;
        self
    }


    /// Set the bracket-width tolerance of the sectioning phase.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        checker::check_tolerance(tolerance);
        self.tolerance = tolerance;
        self
    }


    /// Set the first trial step of the bracketing phase.
    pub fn initial_step(mut self, step: f64) -> Self {
        assert!(step > 0f64, "The initial step must be positive");
        self.initial_step = step;
        self
    }


    /// Set the smallest function value considered acceptable.
    /// The bracketing phase never extrapolates past the step at
    /// which a linear decrease would reach this value.
    pub fn min_function_value(mut self, value: f64) -> Self {
        self.min_function_value = value;
        self
    }


    /// Minimizes `objective` starting at `x = 0`,
    /// where `known_value = f(0)` and `known_slope = f'(0) < 0`
    /// have already been measured.
    /// Returns the accepted point.
    pub fn minimize<F>(
        &self,
        objective: &F,
        known_value: f64,
        known_slope: f64,
    ) -> InputOutputSlopeTriplet
        where F: DifferentiableScalarObjective,
    {
        let origin = InputOutputSlopeTriplet::with_slope(
            0.0, known_value, known_slope,
        );
        let wolfe = WolfeConditions::new(
            origin, self.slope_condition, self.curvature_condition,
        );

        // The largest step at which the Goldstein line would
        // reach the minimum acceptable function value.
        let max_input = if self.min_function_value < known_value {
            (self.min_function_value - known_value)
                / (self.slope_condition * known_slope)
        } else {
            f64::INFINITY
        };

        let mut phase = SearchPhase::Bracketing;
        let mut previous = origin;
        let first = self.initial_step.min(max_input);
        let mut current = InputOutputSlopeTriplet::new(
            first, objective.evaluate_scalar(first),
        );
        let mut bracket = LineBracket::new(origin, current);

        // Bracketing phase.
        for _ in 0..self.max_bracket_steps {
            if phase != SearchPhase::Bracketing { break; }

            if !wolfe.goldstein(&current)
                || current.output >= previous.output
            {
                bracket = LineBracket::new(previous, current);
                phase = SearchPhase::Sectioning;
                break;
            }

            let slope = objective.differentiate_scalar(current.input);
            current.slope = Some(slope);

            if wolfe.strict_curvature(slope) {
                // Both conditions hold: accept directly.
                return current;
            }

            if slope >= 0.0 {
                // Sign change: the reversed order records it.
                bracket = LineBracket::new(current, previous);
                phase = SearchPhase::Sectioning;
                break;
            }

            if current.input >= max_input {
                // Clipped at the extrapolation limit.
                return current;
            }

            let width = current.input - previous.input;
            let next = (current.input + TAU1 * width)
                .min(max_input)
                .max(current.input + width);
            previous = current;
            current = InputOutputSlopeTriplet::new(
                next, objective.evaluate_scalar(next),
            );
        }

        if phase != SearchPhase::Sectioning {
            // Bracketing ran out of steps; keep the best point seen.
            return if current.output < previous.output {
                current
            } else {
                previous
            };
        }

        self.section(objective, &wolfe, bracket)
    }


    /// The sectioning phase: narrow `bracket` until the strict
    /// curvature condition holds or the width drops below the
    /// tolerance.
    fn section<F>(
        &self,
        objective: &F,
        wolfe: &WolfeConditions,
        mut bracket: LineBracket,
    ) -> InputOutputSlopeTriplet
        where F: DifferentiableScalarObjective,
    {
        for _ in 0..self.max_section_steps {
            let width = bracket.width();
            if width.abs() < self.tolerance {
                return bracket.best();
            }

            let a = ensure_slope(objective, &mut bracket.lower);
            let b = ensure_slope(objective, &mut bracket.upper);

            let lo = a.input + TAU2 * width;
            let hi = b.input - TAU3 * width;
            let trial_input = hermite_minimizer(&a, &b)
                .unwrap_or((lo + hi) / 2.0)
                .clamp(lo.min(hi), lo.max(hi));

            let mut trial = InputOutputSlopeTriplet::new(
                trial_input, objective.evaluate_scalar(trial_input),
            );

            if !wolfe.goldstein(&trial) || trial.output >= a.output {
                bracket.upper = trial;
                continue;
            }

            let slope = objective.differentiate_scalar(trial.input);
            trial.slope = Some(slope);

            if wolfe.strict_curvature(slope) {
                return trial;
            }

            // Keep the minimum inside the new bracket.
            if (b.input - a.input) * slope >= 0.0 {
                bracket.upper = bracket.lower;
            }
            bracket.lower = trial;
        }

        bracket.best()
    }


    /// Minimizes `objective` along `direction` from `origin`,
    /// given the already-measured `value = f(origin)` and
    /// `gradient = ∇f(origin)`.
    /// Returns the optimal scale factor and the reached minimum;
    /// the caller decides whether to scale its stored direction.
    /// A non-descent direction yields a zero step.
    pub fn minimize_along_direction<F>(
        &self,
        objective: &F,
        origin: &[f64],
        direction: &[f64],
        value: f64,
        gradient: &[f64],
    ) -> (f64, Minimum)
        where F: DifferentiableObjective,
    {
        let slope = utils::inner_product(gradient, direction);
        if slope >= 0.0 {
            let minimum = Minimum { point: origin.to_vec(), value, };
            return (0.0, minimum);
        }

        let directional = DirectionalObjective::new(
            objective, origin, direction,
        );
        let best = self.minimize(&directional, value, slope);
        let point = directional.point_at(best.input);
        let minimum = Minimum { point, value: best.output, };
        (best.input, minimum)
    }
}


/// Make sure the triplet carries a measured slope.
fn ensure_slope<F>(
    objective: &F,
    t: &mut InputOutputSlopeTriplet,
) -> InputOutputSlopeTriplet
    where F: DifferentiableScalarObjective,
{
    if t.slope.is_none() {
        t.slope = Some(objective.differentiate_scalar(t.input));
    }
    *t
}


/// The minimizer of the Hermite cubic interpolating the value and
/// slope at both bracket ends.
/// Returns `None` when the cubic has no interior minimum or the
/// formula degenerates.
fn hermite_minimizer(
    a: &InputOutputSlopeTriplet,
    b: &InputOutputSlopeTriplet,
) -> Option<f64>
{
    let sa = a.slope?;
    let sb = b.slope?;
    if a.input == b.input { return None; }

    let d1 = sa + sb - 3.0 * (a.output - b.output) / (a.input - b.input);
    let disc = d1 * d1 - sa * sb;
    if disc < 0.0 || !disc.is_finite() { return None; }

    let d2 = disc.sqrt().copysign(b.input - a.input);
    let denominator = sb - sa + 2.0 * d2;
    if denominator == 0.0 { return None; }

    let x = b.input
        - (b.input - a.input) * (sb + d2 - d1) / denominator;
    x.is_finite().then_some(x)
}


/// Derivative-free line search (Brent-style).
///
/// The bracketing phase expands the trial interval geometrically
/// (by the golden ratio) until the function value increases,
/// trying the negative direction when the first step goes uphill.
/// The sectioning phase keeps a triple of points whose middle has
/// the lowest value and narrows it by parabolic interpolation,
/// falling back to golden sectioning whenever the parabola is
/// degenerate or its vertex falls outside the bracket.
#[derive(Debug, Clone)]
pub struct BrentLineSearch {
    tolerance: f64,
    initial_step: f64,
    max_bracket_steps: usize,
    max_section_steps: usize,
}


impl Default for BrentLineSearch {
    fn default() -> Self {
        Self::new()
    }
}


impl BrentLineSearch {
    /// Construct a search with the default parameters.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            initial_step: DEFAULT_INITIAL_STEP,
            max_bracket_steps: DEFAULT_MAX_BRACKET_STEPS,
            max_section_steps: DEFAULT_MAX_SECTION_STEPS,
        }
    }


    /// Set the bracket-width tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        checker::check_tolerance(tolerance);
        self.tolerance = tolerance;
        self
    }


    /// Set the first trial step.
    pub fn initial_step(mut self, step: f64) -> Self {
        assert!(step > 0f64, "The initial step must be positive");
        self.initial_step = step;
        self
    }


    /// Minimizes `objective` starting at `x = 0`,
    /// where `known_value = f(0)` has already been measured.
    pub fn minimize<F>(&self, objective: &F, known_value: f64)
        -> InputOutputSlopeTriplet
        where F: ScalarObjective,
    {
        let eval = |x: f64| InputOutputSlopeTriplet::new(
            x, objective.evaluate_scalar(x),
        );

        let origin = InputOutputSlopeTriplet::new(0.0, known_value);
        let forward = eval(self.initial_step);

        let (mut low, mut mid) = if forward.output <= origin.output {
            (origin, forward)
        } else {
            let backward = eval(-self.initial_step);
            if backward.output > origin.output {
                // Both neighbors are uphill, so the minimum is
                // already bracketed around the origin.
                let bracket = LineBracket {
                    lower: backward,
                    upper: forward,
                    other: Some(origin),
                };
                return self.section(objective, bracket);
            }
            (origin, backward)
        };

        // Expand geometrically until the function value rises.
        let mut bracket = None;
        for _ in 0..self.max_bracket_steps {
            let next = mid.input
                + GOLDEN_RATIO * (mid.input - low.input);
            let candidate = eval(next);

            if candidate.output >= mid.output {
                bracket = Some(LineBracket {
                    lower: low,
                    upper: candidate,
                    other: Some(mid),
                });
                break;
            }
            low = mid;
            mid = candidate;
        }

        match bracket {
            Some(bracket) => self.section(objective, bracket),
            // Never turned uphill; keep the best point seen.
            None => mid,
        }
    }


    /// Narrows the bracket by parabolic interpolation with a
    /// golden-section fallback until its width drops below the
    /// tolerance.
    fn section<F>(&self, objective: &F, bracket: LineBracket)
        -> InputOutputSlopeTriplet
        where F: ScalarObjective,
    {
        let mut mid = bracket.other
            .unwrap_or_else(|| bracket.best());
        let (mut low, mut high) =
            if bracket.lower.input <= bracket.upper.input {
                (bracket.lower, bracket.upper)
            } else {
                (bracket.upper, bracket.lower)
            };

        for _ in 0..self.max_section_steps {
            if high.input - low.input < self.tolerance {
                return mid;
            }

            let u = parabola_vertex(&low, &mid, &high)
                .filter(|u| {
                    low.input < *u && *u < high.input
                        && *u != mid.input
                })
                .unwrap_or_else(|| {
                    // Golden-section point in the larger half.
                    if mid.input - low.input
                        > high.input - mid.input
                    {
                        mid.input - GOLDEN_SECTION
                            * (mid.input - low.input)
                    } else {
                        mid.input + GOLDEN_SECTION
                            * (high.input - mid.input)
                    }
                });
            let trial = InputOutputSlopeTriplet::new(
                u, objective.evaluate_scalar(u),
            );

            if trial.output < mid.output {
                if trial.input > mid.input {
                    low = mid;
                } else {
                    high = mid;
                }
                mid = trial;
            } else if trial.input > mid.input {
                high = trial;
            } else {
                low = trial;
            }
        }

        mid
    }


    /// Minimizes `objective` along `direction` from `origin`,
    /// given the already-measured `value = f(origin)`.
    /// Returns the optimal scale factor and the reached minimum;
    /// the caller decides whether to scale its stored direction.
    pub fn minimize_along_direction<F>(
        &self,
        objective: &F,
        origin: &[f64],
        direction: &[f64],
        value: f64,
    ) -> (f64, Minimum)
        where F: Objective,
    {
        if utils::norm(direction) == 0.0 {
            let minimum = Minimum { point: origin.to_vec(), value, };
            return (0.0, minimum);
        }

        let directional = DirectionalObjective::new(
            objective, origin, direction,
        );
        let best = self.minimize(&directional, value);

        if best.output >= value {
            // No improvement along this direction.
            let minimum = Minimum { point: origin.to_vec(), value, };
            return (0.0, minimum);
        }

        let point = directional.point_at(best.input);
        let minimum = Minimum { point, value: best.output, };
        (best.input, minimum)
    }
}


/// The vertex of the parabola through three points.
/// Returns `None` when the three points are (nearly) collinear.
fn parabola_vertex(
    low: &InputOutputSlopeTriplet,
    mid: &InputOutputSlopeTriplet,
    high: &InputOutputSlopeTriplet,
) -> Option<f64>
{
    let p1 = (mid.input - low.input) * (mid.output - high.output);
    let p2 = (mid.input - high.input) * (mid.output - low.output);
    let denominator = 2.0 * (p1 - p2);
    if denominator == 0.0 { return None; }

    let x = mid.input
        - ((mid.input - low.input) * p1
            - (mid.input - high.input) * p2)
            / denominator;
    x.is_finite().then_some(x)
}


#[cfg(test)]
mod tests {
    use super::*;

    struct ShiftedSquare;

    impl ScalarObjective for ShiftedSquare {
        fn evaluate_scalar(&self, x: f64) -> f64 {
            (x - 3.0) * (x - 3.0)
        }
    }

    impl DifferentiableScalarObjective for ShiftedSquare {
        fn differentiate_scalar(&self, x: f64) -> f64 {
            2.0 * (x - 3.0)
        }
    }

    #[test]
    fn fletcher_finds_scalar_minimum() {
        let search = FletcherLineSearch::new()
            .wolfe_parameters(1e-4, 0.1)
            .tolerance(1e-10);
        let best = search.minimize(&ShiftedSquare, 9.0, -6.0);
        assert!((best.input - 3.0).abs() < 1e-3);
        assert!(best.output <= 9.0);
    }

    #[test]
    fn brent_finds_scalar_minimum() {
        let search = BrentLineSearch::new().tolerance(1e-8);
        let best = search.minimize(&ShiftedSquare, 9.0);
        assert!((best.input - 3.0).abs() < 1e-4);
    }

    #[test]
    fn brent_searches_backwards() {
        // Minimum at x = -2.
        let f = |x: f64| (x + 2.0) * (x + 2.0);
        let search = BrentLineSearch::new().tolerance(1e-8);
        let best = search.minimize(&f, 4.0);
        assert!((best.input + 2.0).abs() < 1e-4);
    }

    #[test]
    fn hermite_recovers_quadratic_minimum() {
        // f(x) = (x - 3)^2 sampled at 0 and 4.
        let a = InputOutputSlopeTriplet::with_slope(0.0, 9.0, -6.0);
        let b = InputOutputSlopeTriplet::with_slope(4.0, 1.0, 2.0);
        let x = hermite_minimizer(&a, &b).unwrap();
        assert!((x - 3.0).abs() < 1e-12);
    }
}
