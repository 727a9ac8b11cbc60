//! The bagging ensemble learner.
use rand::prelude::*;
use fixedbitset::FixedBitSet;

use std::ops::ControlFlow;

use crate::anytime::StopFlag;
use crate::common::checker;
use crate::ensemble::core::EnsembleLearner;
use crate::ensemble::out_of_bag::OutOfBagStopping;
use crate::hypothesis::{Classifier, WeightedMajority};
use crate::research::CurrentEnsemble;
use crate::sample::Sample;
use crate::weak_learner::WeakLearner;


const DEFAULT_N_BAGS: usize = 100;
const DEFAULT_BAG_RATIO: f64 = 1.0;
const DEFAULT_SEED: u64 = 1234;


/// The bagging ensemble learner.
///
/// Each iteration draws a bootstrap bag
/// (uniform sampling with replacement),
/// trains one hypothesis on it,
/// and adds the hypothesis to the ensemble with unit weight.
/// With [`Bagging::out_of_bag_stopping`] enabled, training
/// halts once the smoothed out-of-bag error stops improving
/// and the ensemble rolls back to its best length.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
///
/// let sample = SampleReader::new()
///     .file("training.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
///
/// let mut learner = Bagging::init(&sample)
///     .n_bags(50)
///     .seed(111)
///     .out_of_bag_stopping();
/// let stump = DecisionStump::init(&sample);
///
/// let f = learner.run(&stump).unwrap();
/// let predictions = f.predict_all(&sample);
/// ```
pub struct Bagging<'a, F> {
    sample: &'a Sample,
    n_bags: usize,
    bag_ratio: f64,
    seed: u64,
    early_stopping: bool,
    tracker: OutOfBagStopping,
    stop_flag: Option<StopFlag>,

    rng: StdRng,
    weights: Vec<f64>,
    hypotheses: Vec<F>,
}


impl<'a, F> Bagging<'a, F> {
    /// Construct a new instance of `Bagging`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            n_bags: DEFAULT_N_BAGS,
            bag_ratio: DEFAULT_BAG_RATIO,
            seed: DEFAULT_SEED,
            early_stopping: false,
            tracker: OutOfBagStopping::new(),
            stop_flag: None,

            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the maximum number of ensemble members.
    /// Default value is `100.`
    pub fn n_bags(mut self, n_bags: usize) -> Self {
        self.n_bags = n_bags;
        self
    }


    /// Set the bag size as a fraction of the training sample.
    /// Default value is `1.0.`
    pub fn bag_ratio(mut self, bag_ratio: f64) -> Self {
        checker::check_sampling_ratio(bag_ratio);
        self.bag_ratio = bag_ratio;
        self
    }


    /// Set the seed of the randomness for bootstrap sampling.
    /// Default value is `1234.`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Stop early once the smoothed out-of-bag error stops
    /// improving, rolling the ensemble back to its best length.
    /// Off by default.
    pub fn out_of_bag_stopping(mut self) -> Self {
        self.early_stopping = true;
        self
    }


    /// Set the capacity of the out-of-bag smoothing window
    /// and enable early stopping.
    pub fn smoothing_window(mut self, window_capacity: usize) -> Self {
        self.tracker = OutOfBagStopping::with_window(window_capacity);
        self.early_stopping = true;
        self
    }


    /// Attach a cooperative cancellation handle.
    pub fn stopped_by(mut self, flag: StopFlag) -> Self {
        self.stop_flag = Some(flag);
        self
    }


    /// The out-of-bag error rate after each iteration so far.
    pub fn out_of_bag_rates(&self) -> &[f64] {
        self.tracker.raw_rates()
    }


    /// Draw one bootstrap bag.
    /// Returns the induced distribution over the training
    /// sample and the in-bag membership flags.
    fn draw_bag(&mut self) -> (Vec<f64>, FixedBitSet) {
        let n_sample = self.sample.shape().0;
        let n_draw = ((self.bag_ratio * n_sample as f64).ceil()
            as usize).max(1);

        let mut counts = vec![0usize; n_sample];
        let mut in_bag = FixedBitSet::with_capacity(n_sample);
        for _ in 0..n_draw {
            let index = self.rng.gen_range(0..n_sample);
            counts[index] += 1;
            in_bag.insert(index);
        }

        let dist = counts.into_iter()
            .map(|count| count as f64 / n_draw as f64)
            .collect();
        (dist, in_bag)
    }
}


impl<F> EnsembleLearner<F> for Bagging<'_, F>
    where F: Classifier + Clone,
{
    fn preprocess<W>(&mut self, _weak_learner: &W) -> bool
        where W: WeakLearner<Hypothesis = F>,
    {
        let n_sample = self.sample.shape().0;
        if n_sample == 0 {
            return false;
        }
        self.sample.is_valid_binary_instance();

        // Reseeding here makes repeated runs reproduce
        // the same ensemble.
        self.rng = StdRng::seed_from_u64(self.seed);
        self.weights.clear();
        self.hypotheses.clear();
        self.tracker.start(n_sample);
        true
    }


    fn step<W>(&mut self, weak_learner: &W, iteration: usize)
        -> ControlFlow<usize>
        where W: WeakLearner<Hypothesis = F>,
    {
        if iteration > self.n_bags {
            return ControlFlow::Break(iteration);
        }

        let (dist, in_bag) = self.draw_bag();
        let hypothesis = weak_learner.produce(self.sample, &dist);

        let n_sample = self.sample.shape().0;
        let votes = (0..n_sample)
            .map(|row| hypothesis.predict(self.sample, row) as f64)
            .collect::<Vec<_>>();

        self.weights.push(1.0);
        self.hypotheses.push(hypothesis);

        let flow = self.tracker.step_end(
            &in_bag, &votes, self.sample.target(),
        );
        if self.early_stopping {
            if let ControlFlow::Break(keep) = flow {
                self.weights.truncate(keep);
                self.hypotheses.truncate(keep);
                return ControlFlow::Break(iteration);
            }
        }
        ControlFlow::Continue(())
    }


    fn postprocess<W>(&mut self, _weak_learner: &W)
        -> WeightedMajority<F>
        where W: WeakLearner<Hypothesis = F>,
    {
        self.tracker.finish();
        WeightedMajority::from_slices(&self.weights, &self.hypotheses)
    }


    fn stop_requested(&self) -> bool {
        self.stop_flag
            .as_ref()
            .is_some_and(|flag| flag.is_requested())
    }
}


impl<F> CurrentEnsemble<F> for Bagging<'_, F>
    where F: Classifier + Clone,
{
    fn current_ensemble(&self) -> WeightedMajority<F> {
        WeightedMajority::from_slices(&self.weights, &self.hypotheses)
    }
}
