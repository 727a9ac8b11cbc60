use minilearn::prelude::*;
use minilearn::optimizer::{DifferentiableObjective, Objective};


/// `f(x, y) = (x - 1)² + (y + 2)²`, minimized at `(1, -2)`.
struct ShiftedSphere;

impl Objective for ShiftedSphere {
    fn evaluate(&self, x: &[f64]) -> f64 {
        (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2)
    }
}

impl DifferentiableObjective for ShiftedSphere {
    fn differentiate(&self, x: &[f64]) -> Vec<f64> {
        vec![2.0 * (x[0] - 1.0), 2.0 * (x[1] + 2.0)]
    }
}


/// A separable quartic, minimized at the origin.
struct Quartic;

impl Objective for Quartic {
    fn evaluate(&self, x: &[f64]) -> f64 {
        x.iter().map(|v| v.powi(4) + v * v).sum()
    }
}

impl DifferentiableObjective for Quartic {
    fn differentiate(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|v| 4.0 * v.powi(3) + 2.0 * v).collect()
    }
}


#[test]
fn bfgs_minimizes_shifted_sphere() {
    let mut minimizer = QuasiNewton::init(
        &ShiftedSphere, vec![0.0, 0.0],
    )
        .update_rule(HessianUpdate::Bfgs)
        .tolerance(1e-10);
    let minimum = minimizer.run().unwrap();

    assert!((minimum.point[0] - 1.0).abs() < 1e-5);
    assert!((minimum.point[1] + 2.0).abs() < 1e-5);
    assert!(minimum.value < 1e-8);
    assert!(minimizer.iterations() < 10);

    // The curvature of this objective is 2·I, so the estimate
    // should approach its inverse, 0.5·I.
    let h = minimizer.hessian_inverse();
    for (i, row) in h.iter().enumerate() {
        for (j, entry) in row.iter().enumerate() {
            let expected = if i == j { 0.5 } else { 0.0 };
            assert!((entry - expected).abs() < 1e-6);
        }
    }
}


#[test]
fn rerunning_the_same_minimizer_reproduces_the_result() {
    let mut minimizer = QuasiNewton::init(
        &ShiftedSphere, vec![3.0, 3.0],
    )
        .tolerance(1e-10);

    // `initialize` resets all transient state, so a second run
    // retraces the first.
    let first = minimizer.run().unwrap();
    let second = minimizer.run().unwrap();
    assert_eq!(first, second);
}


#[test]
fn dfp_minimizes_shifted_sphere() {
    let mut minimizer = QuasiNewton::init(
        &ShiftedSphere, vec![5.0, 5.0],
    )
        .update_rule(HessianUpdate::Dfp)
        .tolerance(1e-10);
    let minimum = minimizer.run().unwrap();

    assert!((minimum.point[0] - 1.0).abs() < 1e-5);
    assert!((minimum.point[1] + 2.0).abs() < 1e-5);
}


#[test]
fn bfgs_minimizes_quartic() {
    let mut minimizer = QuasiNewton::init(
        &Quartic, vec![2.0, -3.0, 1.0],
    )
        .tolerance(1e-12);
    let minimum = minimizer.run().unwrap();

    assert!(minimum.value < 1e-6);
    for coordinate in &minimum.point {
        assert!(coordinate.abs() < 1e-2);
    }
}


#[test]
fn empty_starting_point_yields_none() {
    let mut minimizer = QuasiNewton::init(&ShiftedSphere, Vec::new());
    assert!(minimizer.run().is_none());
}


#[test]
fn requested_stop_keeps_the_starting_point() {
    let flag = StopFlag::new();
    flag.request();

    let start = vec![4.0, 4.0];
    let mut minimizer = QuasiNewton::init(
        &ShiftedSphere, start.clone(),
    )
        .stopped_by(flag);
    let minimum = minimizer.run().unwrap();

    // No step ran, so the result is the evaluated start.
    assert_eq!(minimum.point, start);
    assert_eq!(minimum.value, ShiftedSphere.evaluate(&start));
    assert_eq!(minimizer.iterations(), 0);
}
