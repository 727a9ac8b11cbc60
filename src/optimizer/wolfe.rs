//! The Wolfe acceptance tests for line-search steps.
use crate::common::checker;

use super::triplet::InputOutputSlopeTriplet;


/// The pair of acceptance tests certifying that a line-search
/// step is good enough: the Goldstein (Armijo) sufficient-decrease
/// condition and the strict curvature condition.
///
/// Constructed once per line search from the origin point of the
/// search, which must carry a strictly negative slope
/// (the search direction must be a descent direction),
/// and two parameters `slope_condition < curvature_condition`,
/// both in the open interval `(0, 1)`.
/// Invalid parameters are rejected at construction,
/// never silently clamped.
#[derive(Debug, Clone, Copy)]
pub struct WolfeConditions {
    origin: InputOutputSlopeTriplet,
    origin_slope: f64,
    slope_condition: f64,
    curvature_condition: f64,
}


impl WolfeConditions {
    /// Construct the acceptance tests for a search starting
    /// at `origin`.
    ///
    /// # Panics
    /// When `origin` has no measured slope, its slope is
    /// non-negative, or the two parameters violate
    /// `0 < slope_condition < curvature_condition < 1`.
    pub fn new(
        origin: InputOutputSlopeTriplet,
        slope_condition: f64,
        curvature_condition: f64,
    ) -> Self
    {
        checker::check_wolfe_parameters(
            slope_condition, curvature_condition,
        );
        let origin_slope = origin.slope
            .expect("The origin of a line search must have a slope");
        assert!(
            origin_slope < 0f64,
            "The slope at the origin of a line search must be \
             negative, got {origin_slope}",
        );

        Self {
            origin,
            origin_slope,
            slope_condition,
            curvature_condition,
        }
    }


    /// The origin point this search started from.
    pub fn origin(&self) -> InputOutputSlopeTriplet {
        self.origin
    }


    /// The slope at the origin.
    pub fn origin_slope(&self) -> f64 {
        self.origin_slope
    }


    /// The Goldstein (sufficient-decrease) test:
    /// `f(trial) ≤ f(origin) + Δx · slope_condition · f'(origin)`.
    pub fn goldstein(&self, trial: &InputOutputSlopeTriplet) -> bool {
        let dx = trial.input - self.origin.input;
        trial.output
            <= self.origin.output
                + dx * self.slope_condition * self.origin_slope
    }


    /// The strict curvature test:
    /// `|f'(trial)| ≤ -curvature_condition · f'(origin)`.
    pub fn strict_curvature(&self, trial_slope: f64) -> bool {
        trial_slope.abs()
            <= -self.curvature_condition * self.origin_slope
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> InputOutputSlopeTriplet {
        InputOutputSlopeTriplet::with_slope(0.0, 9.0, -6.0)
    }

    #[test]
    fn goldstein_accepts_proportional_decrease() {
        // f(x) = (x - 3)^2 from x = 0.
        let wolfe = WolfeConditions::new(origin(), 0.1, 0.5);
        let trial = InputOutputSlopeTriplet::new(1.0, 4.0);
        assert!(wolfe.goldstein(&trial));
    }

    #[test]
    fn goldstein_rejects_insufficient_decrease() {
        let wolfe = WolfeConditions::new(origin(), 0.1, 0.5);
        let trial = InputOutputSlopeTriplet::new(1.0, 8.9);
        assert!(!wolfe.goldstein(&trial));
    }

    #[test]
    fn strict_curvature_rejects_steep_slopes() {
        let wolfe = WolfeConditions::new(origin(), 0.1, 0.5);
        // |f'| must be at most 0.5 * 6 = 3.
        assert!(wolfe.strict_curvature(-2.0));
        assert!(!wolfe.strict_curvature(-4.0));
        assert!(!wolfe.strict_curvature(4.0));
    }

    #[test]
    #[should_panic]
    fn rejects_non_descent_origin() {
        let origin = InputOutputSlopeTriplet::with_slope(0.0, 1.0, 0.5);
        let _ = WolfeConditions::new(origin, 0.1, 0.5);
    }

    #[test]
    #[should_panic]
    fn rejects_reversed_parameters() {
        let _ = WolfeConditions::new(origin(), 0.5, 0.1);
    }
}
