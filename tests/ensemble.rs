use rand::prelude::*;
use rand_distr::Normal;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use minilearn::prelude::*;
use minilearn::research::zero_one_loss;


/// Write a two-blob binary classification dataset to a CSV file
/// in the temporary directory and read it back as a `Sample`.
/// The positive class is centered at `(center, center)`,
/// the negative class at `(-center, -center)`.
fn two_blobs(
    filename: &str,
    n_per_class: usize,
    center: f64,
    std_dev: f64,
    seed: u64,
) -> Sample
{
    let path: PathBuf = std::env::temp_dir().join(filename);
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, std_dev).unwrap();

    let mut file = File::create(&path).unwrap();
    writeln!(file, "x,y,class").unwrap();
    for &label in &[1.0, -1.0] {
        for _ in 0..n_per_class {
            let x = label * center + noise.sample(&mut rng);
            let y = label * center + noise.sample(&mut rng);
            writeln!(file, "{x},{y},{label}").unwrap();
        }
    }
    drop(file);

    SampleReader::new()
        .file(&path)
        .has_header(true)
        .target_feature("class")
        .read()
        .unwrap()
}


#[test]
fn bagging_fits_separable_blobs() {
    let sample = two_blobs("minilearn_bagging.csv", 50, 2.0, 0.5, 42);
    let stump = DecisionStump::init(&sample);

    let mut learner = Bagging::init(&sample)
        .n_bags(30)
        .seed(7);
    let f = learner.run(&stump).unwrap();

    assert_eq!(f.len(), 30);
    assert!(zero_one_loss(&sample, &f) < 0.05);
}


#[test]
fn bagging_runs_are_reproducible() {
    let sample = two_blobs("minilearn_repro.csv", 40, 2.0, 1.0, 3);
    let stump = DecisionStump::init(&sample);

    let mut learner = Bagging::init(&sample)
        .n_bags(20)
        .seed(999);

    // `preprocess` reseeds, so two runs of the same learner
    // must produce identical ensembles.
    let first = learner.run(&stump).unwrap();
    let second = learner.run(&stump).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(
        first.predict_all(&sample),
        second.predict_all(&sample),
    );
}


#[test]
fn bagging_rolls_back_on_out_of_bag_stall() {
    // Heavy class overlap keeps the out-of-bag error noisy,
    // so the stopping rule fires well before the bag limit.
    let sample = two_blobs("minilearn_oob.csv", 100, 1.0, 3.0, 11);
    let stump = DecisionStump::init(&sample);

    let mut learner = Bagging::init(&sample)
        .n_bags(200)
        .smoothing_window(5)
        .seed(13);
    let f = learner.run(&stump).unwrap();

    let n_rates = learner.out_of_bag_rates().len();
    assert!(n_rates <= 200);
    // The rollback never keeps more members than were trained.
    assert!(0 < f.len() && f.len() <= n_rates);
}


#[test]
fn ivoting_fits_separable_blobs() {
    let sample = two_blobs("minilearn_ivoting.csv", 50, 2.0, 0.5, 21);
    let stump = DecisionStump::init(&sample);

    let mut learner = IVoting::init(&sample)
        .max_members(50)
        .seed(5);
    let f = learner.run(&stump).unwrap();

    assert!(!f.is_empty());
    assert!(zero_one_loss(&sample, &f) < 0.1);
}


#[test]
fn ivoting_runs_are_reproducible() {
    let sample = two_blobs("minilearn_ivoting_repro.csv", 40, 2.0, 1.0, 8);
    let stump = DecisionStump::init(&sample);

    let mut learner = IVoting::init(&sample)
        .max_members(25)
        .seed(4242);

    let first = learner.run(&stump).unwrap();
    let second = learner.run(&stump).unwrap();

    assert_eq!(first.len(), second.len());
    assert_eq!(
        first.predict_all(&sample),
        second.predict_all(&sample),
    );
}


#[test]
fn requested_stop_halts_bagging() {
    let sample = two_blobs("minilearn_stop.csv", 30, 2.0, 0.5, 17);
    let stump = DecisionStump::init(&sample);

    let flag = StopFlag::new();
    flag.request();

    let mut learner = Bagging::init(&sample)
        .n_bags(100)
        .stopped_by(flag);
    let f = learner.run(&stump).unwrap();

    // The stop arrived before the first step.
    assert!(f.is_empty());
}


#[test]
fn trained_ensemble_round_trips_through_json() {
    let sample = two_blobs("minilearn_json.csv", 30, 2.0, 0.5, 29);
    let stump = DecisionStump::init(&sample);

    let mut learner = Bagging::init(&sample).n_bags(10).seed(1);
    let f = learner.run(&stump).unwrap();

    let path = std::env::temp_dir().join("minilearn_ensemble.json");
    f.save_json(&path).unwrap();
    let g: WeightedMajority<StumpClassifier> =
        WeightedMajority::load_json(&path).unwrap();

    assert_eq!(f.predict_all(&sample), g.predict_all(&sample));
}


#[test]
fn logistic_regression_separates_blobs() {
    let sample = two_blobs("minilearn_logistic.csv", 50, 2.0, 0.5, 63);

    let f = LogisticRegression::init(&sample)
        .regularization(1e-3)
        .fit()
        .unwrap();

    assert!(zero_one_loss(&sample, &f) < 0.05);
}


#[test]
fn cross_validation_covers_every_fold() {
    let sample = two_blobs("minilearn_cv.csv", 50, 2.0, 0.5, 77);
    let cv = minilearn::research::CrossValidation::new(&sample)
        .n_folds(5)
        .seed(1)
        .shuffle();

    let mut n_folds = 0;
    for (train, test) in cv {
        assert_eq!(train.shape().0, 80);
        assert_eq!(test.shape().0, 20);
        n_folds += 1;
    }
    assert_eq!(n_folds, 5);
}
