use rand::prelude::*;
use colored::Colorize;

use crate::sample::Sample;

const WIDTH: usize = 9;

/// A struct that generates
/// pairs of training/test samples for cross validation.
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
/// use minilearn::research::{CrossValidation, zero_one_loss};
///
/// let sample = SampleReader::new()
///     .file("training.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
/// let cv = CrossValidation::new(&sample)
///     .n_folds(5)
///     .verbose(true)
///     .seed(777)
///     .shuffle();
/// for (train, test) in cv {
///     let mut learner = Bagging::init(&train)
///         .out_of_bag_stopping();
///     let stump = DecisionStump::init(&train);
///     let f = learner.run(&stump).unwrap();
///
///     let train_loss = zero_one_loss(&train, &f);
///     let test_loss = zero_one_loss(&test, &f);
///     println!("[train: {train_loss}] [test: {test_loss}]");
/// }
/// ```
pub struct CrossValidation<'a> {
    current_fold: usize,
    n_folds: usize,
    seed: u64,
    sample: &'a Sample,
    ix: Vec<usize>,
    verbose: bool,
}


impl<'a> CrossValidation<'a> {
    /// Construct a new instance of `CrossValidation.`
    #[inline]
    pub fn new(sample: &'a Sample) -> Self {
        let n_sample = sample.shape().0;
        let ix = (0..n_sample).collect::<Vec<_>>();
        Self {
            current_fold: 0,
            n_folds: 5,
            seed: 1234,
            verbose: false,
            sample,
            ix,
        }
    }


    /// Set the number of folds.
    /// Default value is `5.`
    #[inline]
    pub fn n_folds(mut self, n_folds: usize) -> Self {
        assert!(n_folds > 1, "Cross validation needs 2+ folds.");
        self.n_folds = n_folds;
        self
    }


    /// Set the seed of the randomness for shuffling.
    /// Default value is `1234.`
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the verbose parameter.
    /// If `true`, `CrossValidation` prints some information
    /// when generating a train/test pair.
    /// Default value is `false.`
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }


    /// Shuffle the training sample.
    /// By default, `CrossValidation` does not shuffle the sample.
    #[inline]
    pub fn shuffle(mut self) -> Self {
        let mut rng = StdRng::seed_from_u64(self.seed);
        self.ix.shuffle(&mut rng);
        self
    }


    /// Returns the training/test sample for the `i`th fold.
    #[inline]
    fn fold_at(&self, i: usize) -> (Sample, Sample) {
        let n_sample = self.sample.shape().0;
        let fold_size = n_sample / self.n_folds;
        let (start, end) = (i * fold_size, (i + 1) * fold_size);

        let test_ix = self.ix[start..end].to_vec();
        let train_ix = self.ix[..start].iter()
            .chain(self.ix[end..].iter())
            .copied()
            .collect::<Vec<_>>();

        let train = self.sample.subsample(&train_ix);
        let test = self.sample.subsample(&test_ix);
        (train, test)
    }
}


impl Iterator for CrossValidation<'_> {
    type Item = (Sample, Sample);
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_fold >= self.n_folds { return None; }

        let output = self.fold_at(self.current_fold);
        self.current_fold += 1;

        if self.verbose {
            let train_size = output.0.shape().0;
            let test_size = output.1.shape().0;
            println!(
                "{}    {}    {}",
                format!("  [{: >3}'th fold]", self.current_fold).bold().red(),
                format!("[TRAIN {:>WIDTH$}]", train_size).bold().green(),
                format!("[TEST {:>WIDTH$}]", test_size).bold().yellow(),
            );
        }

        Some(output)
    }
}
