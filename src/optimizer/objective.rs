//! Objective-function traits consumed by the minimizers.
use crate::common::utils;


/// A scalar-valued function of a parameter vector.
pub trait Objective {
    /// Evaluates the function at `x`.
    fn evaluate(&self, x: &[f64]) -> f64;
}


/// An [`Objective`] with a gradient.
/// The derivative-based minimizers require this trait;
/// supplying a wrong gradient is a caller contract violation
/// that is not detected at runtime.
pub trait DifferentiableObjective: Objective {
    /// Evaluates the gradient at `x`.
    fn differentiate(&self, x: &[f64]) -> Vec<f64>;
}


impl<F> Objective for F
    where F: Fn(&[f64]) -> f64,
{
    fn evaluate(&self, x: &[f64]) -> f64 {
        self(x)
    }
}


/// A scalar function of a single real input,
/// as seen by the line searches.
pub trait ScalarObjective {
    /// Evaluates the function at `x`.
    fn evaluate_scalar(&self, x: f64) -> f64;
}


/// A [`ScalarObjective`] with a derivative.
pub trait DifferentiableScalarObjective: ScalarObjective {
    /// Evaluates the derivative at `x`.
    fn differentiate_scalar(&self, x: f64) -> f64;
}


impl<F> ScalarObjective for F
    where F: Fn(f64) -> f64,
{
    fn evaluate_scalar(&self, x: f64) -> f64 {
        self(x)
    }
}


/// The restriction of a vector objective to the ray
/// `t ↦ origin + t · direction`.
/// The line searches always work on this adapter,
/// starting their search at `t = 0`.
pub struct DirectionalObjective<'a, F> {
    objective: &'a F,
    origin: &'a [f64],
    direction: &'a [f64],
}


impl<'a, F> DirectionalObjective<'a, F> {
    /// Restrict `objective` to the ray from `origin`
    /// along `direction`.
    pub fn new(
        objective: &'a F,
        origin: &'a [f64],
        direction: &'a [f64],
    ) -> Self
    {
        assert_eq!(origin.len(), direction.len());
        Self { objective, origin, direction, }
    }


    /// The point on the ray at parameter `t`.
    pub fn point_at(&self, t: f64) -> Vec<f64> {
        utils::add_scaled(self.origin, t, self.direction)
    }
}


impl<F> ScalarObjective for DirectionalObjective<'_, F>
    where F: Objective,
{
    fn evaluate_scalar(&self, t: f64) -> f64 {
        self.objective.evaluate(&self.point_at(t))
    }
}


impl<F> DifferentiableScalarObjective for DirectionalObjective<'_, F>
    where F: DifferentiableObjective,
{
    fn differentiate_scalar(&self, t: f64) -> f64 {
        let gradient = self.objective.differentiate(&self.point_at(t));
        utils::inner_product(&gradient, self.direction)
    }
}


/// The result of a minimization:
/// the point reached and the function value there.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// The minimizing parameter vector.
    pub point: Vec<f64>,
    /// The function value at `point`.
    pub value: f64,
}
