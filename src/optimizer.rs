//! Unconstrained nonlinear function minimization.
//!
//! The minimizers in this module fit model parameters for the
//! learners elsewhere in the crate, but they are ordinary
//! library APIs and can be used on their own:
//! a two-phase line search (bracketing and sectioning),
//! quasi-Newton methods with BFGS/DFP Hessian-inverse updates,
//! Powell's direction-set method, a conjugate-gradient linear
//! solver, and Gauss-Newton / Fletcher-Xu nonlinear least squares.

/// Objective function traits and the `Minimum` result type.
pub mod objective;

/// Line-search value types.
pub mod triplet;

/// Wolfe acceptance conditions.
pub mod wolfe;

/// Derivative-based and derivative-free line searches.
pub mod line_search;

/// BFGS/DFP quasi-Newton minimization.
pub mod quasi_newton;

/// Powell's direction-set minimization.
pub mod direction_set;

/// Conjugate-gradient linear solver.
pub mod conjugate_gradient;

/// Gauss-Newton and Fletcher-Xu nonlinear least squares.
pub mod least_squares;

pub use objective::{
    DifferentiableObjective,
    DifferentiableScalarObjective,
    DirectionalObjective,
    Minimum,
    Objective,
    ScalarObjective,
};
pub use triplet::{InputOutputSlopeTriplet, LineBracket};
pub use wolfe::WolfeConditions;
pub use line_search::{BrentLineSearch, FletcherLineSearch};
pub use quasi_newton::{HessianUpdate, QuasiNewton};
pub use direction_set::DirectionSetMinimizer;
pub use conjugate_gradient::{ConjugateGradient, LinearOperator};
pub use least_squares::{
    GaussNewton,
    LeastSquaresProblem,
    SumOfSquares,
};
