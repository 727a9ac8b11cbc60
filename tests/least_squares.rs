use minilearn::prelude::*;
use minilearn::optimizer::{
    DifferentiableObjective,
    LeastSquaresProblem,
    Objective,
    SumOfSquares,
};


/// Residuals `r(x) = A·x - b` with a constant Jacobian.
struct LinearResiduals {
    a: Vec<Vec<f64>>,
    b: Vec<f64>,
}

impl LeastSquaresProblem for LinearResiduals {
    fn residuals(&self, params: &[f64]) -> Vec<f64> {
        self.a.iter()
            .zip(&self.b)
            .map(|(row, bi)| {
                row.iter()
                    .zip(params)
                    .map(|(aij, xj)| aij * xj)
                    .sum::<f64>()
                    - bi
            })
            .collect()
    }

    fn jacobian(&self, _params: &[f64]) -> Vec<Vec<f64>> {
        self.a.clone()
    }
}


fn consistent_problem() -> LinearResiduals {
    // The system has the exact solution (1, 2).
    LinearResiduals {
        a: vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ],
        b: vec![1.0, 2.0, 3.0],
    }
}


#[test]
fn gauss_newton_solves_a_consistent_system() {
    let problem = consistent_problem();
    let mut minimizer = GaussNewton::init(&problem, vec![0.0, 0.0])
        .tolerance(1e-12);
    let minimum = minimizer.run().unwrap();

    assert!((minimum.point[0] - 1.0).abs() < 1e-6);
    assert!((minimum.point[1] - 2.0).abs() < 1e-6);
    assert!(minimum.value < 1e-10);
    assert!(minimizer.iterations() <= 5);
}


#[test]
fn fletcher_xu_hybrid_solves_the_same_system() {
    let problem = consistent_problem();
    let minimum = GaussNewton::init(&problem, vec![-4.0, 7.0])
        .fletcher_xu()
        .tolerance(1e-12)
        .run()
        .unwrap();

    assert!((minimum.point[0] - 1.0).abs() < 1e-5);
    assert!((minimum.point[1] - 2.0).abs() < 1e-5);
}


#[test]
fn sum_of_squares_exposes_cost_and_gradient() {
    let problem = consistent_problem();
    let cost = SumOfSquares::new(&problem);

    // At the origin r = -b, so the cost is ½‖b‖² and the
    // gradient is -Aᵀ·b.
    let value = cost.evaluate(&[0.0, 0.0]);
    assert!((value - 0.5 * (1.0 + 4.0 + 9.0)).abs() < 1e-12);

    let gradient = cost.differentiate(&[0.0, 0.0]);
    assert!((gradient[0] + 4.0).abs() < 1e-12);
    assert!((gradient[1] + 5.0).abs() < 1e-12);

    // The gradient vanishes at the solution.
    let gradient = cost.differentiate(&[1.0, 2.0]);
    assert!(gradient[0].abs() < 1e-12);
    assert!(gradient[1].abs() < 1e-12);
}


#[test]
fn overdetermined_system_reaches_the_normal_solution() {
    // Fit a constant to the observations 1, 2, 3:
    // the least-squares answer is their mean.
    let problem = LinearResiduals {
        a: vec![vec![1.0], vec![1.0], vec![1.0]],
        b: vec![1.0, 2.0, 3.0],
    };
    let minimum = GaussNewton::init(&problem, vec![0.0])
        .tolerance(1e-12)
        .run()
        .unwrap();

    assert!((minimum.point[0] - 2.0).abs() < 1e-6);
}


#[test]
fn empty_starting_point_yields_none() {
    let problem = consistent_problem();
    let mut minimizer = GaussNewton::init(&problem, Vec::new());
    assert!(minimizer.run().is_none());
}
