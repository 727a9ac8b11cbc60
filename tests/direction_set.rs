use minilearn::prelude::*;
use minilearn::optimizer::Objective;


/// `f(x, y) = (x - 1)² + (y + 2)²`, minimized at `(1, -2)`.
struct ShiftedSphere;

impl Objective for ShiftedSphere {
    fn evaluate(&self, x: &[f64]) -> f64 {
        (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)
    }
}


/// A coupled quadratic whose axes are not coordinate-aligned,
/// minimized at the origin.
struct Coupled;

impl Objective for Coupled {
    fn evaluate(&self, x: &[f64]) -> f64 {
        x[0] * x[0] + 2.0 * x[1] * x[1] + x[0] * x[1]
    }
}


#[test]
fn minimizes_without_derivatives() {
    let mut minimizer = DirectionSetMinimizer::init(
        &ShiftedSphere, vec![0.0, 0.0],
    )
        .tolerance(1e-10);
    let minimum = minimizer.run().unwrap();

    assert!((minimum.point[0] - 1.0).abs() < 1e-3);
    assert!((minimum.point[1] + 2.0).abs() < 1e-3);
    assert!(minimum.value < 1e-6);
}


#[test]
fn minimizes_coupled_quadratic() {
    let mut minimizer = DirectionSetMinimizer::init(
        &Coupled, vec![3.0, -2.0],
    )
        .tolerance(1e-12);
    let minimum = minimizer.run().unwrap();

    assert!(minimum.value < 1e-6);
}


#[test]
fn direction_count_matches_the_dimension() {
    let mut minimizer = DirectionSetMinimizer::init(
        &Coupled, vec![3.0, -2.0],
    );
    let _ = minimizer.run().unwrap();

    // Powell's replacement swaps directions in place;
    // the set never grows or shrinks.
    assert_eq!(minimizer.directions().len(), 2);
    for direction in minimizer.directions() {
        assert_eq!(direction.len(), 2);
    }
}


#[test]
fn empty_starting_point_yields_none() {
    let mut minimizer = DirectionSetMinimizer::init(
        &ShiftedSphere, Vec::new(),
    );
    assert!(minimizer.run().is_none());
}
