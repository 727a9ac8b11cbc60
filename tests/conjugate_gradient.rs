use minilearn::prelude::*;


#[test]
fn solves_a_small_system_exactly() {
    let a = vec![
        vec![4.0, 1.0],
        vec![1.0, 3.0],
    ];
    let b = vec![1.0, 2.0];

    let mut solver = ConjugateGradient::init(&a, b);
    let x = solver.run().unwrap();

    // A⁻¹·b = (1/11, 7/11).
    assert!((x[0] - 1.0 / 11.0).abs() < 1e-6);
    assert!((x[1] - 7.0 / 11.0).abs() < 1e-6);
    assert!(solver.iterations() <= 2);

    // The answer must satisfy the system itself.
    assert!((4.0 * x[0] + x[1] - 1.0).abs() < 1e-6);
    assert!((x[0] + 3.0 * x[1] - 2.0).abs() < 1e-6);
}


#[test]
fn accepts_a_closure_operator() {
    // The identity operator: the solution is the right-hand side.
    let identity = |x: &[f64]| x.to_vec();
    let b = vec![3.0, -1.0, 2.5];

    let x = ConjugateGradient::init(&identity, b.clone())
        .run()
        .unwrap();
    for (xi, bi) in x.iter().zip(&b) {
        assert!((xi - bi).abs() < 1e-8);
    }
}


#[test]
fn finishes_within_the_dimension_on_a_diagonal_system() {
    let n = 10;
    let a = (0..n).map(|i| {
            let mut row = vec![0f64; n];
            row[i] = (i + 1) as f64;
            row
        })
        .collect::<Vec<_>>();
    let b = vec![1f64; n];

    let mut solver = ConjugateGradient::init(&a, b)
        .tolerance(1e-14);
    let x = solver.run().unwrap();

    for (i, xi) in x.iter().enumerate() {
        assert!((xi - 1.0 / (i + 1) as f64).abs() < 1e-6);
    }
    assert!(solver.iterations() <= n);
}


#[test]
fn empty_right_hand_side_yields_none() {
    let a: Vec<Vec<f64>> = Vec::new();
    let mut solver = ConjugateGradient::init(&a, Vec::new());
    assert!(solver.run().is_none());
}
