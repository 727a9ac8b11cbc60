//! The importance-voting ensemble learner.
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


const DEFAULT_MAX_MEMBERS: usize = 100;
const DEFAULT_BAG_RATIO: f64 = 0.5;
const DEFAULT_PERCENT_CORRECT: f64 = 0.5;
const DEFAULT_SEED: u64 = 1234;


/// The importance-voting ensemble learner.
///
/// Like [`Bagging`](crate::ensemble::Bagging), each iteration
/// trains one hypothesis on a resampled bag and adds it with
/// unit weight.
/// Unlike bagging, the bag is not uniform: each draw first
/// flips a biased coin to decide whether to pick an example the
/// current ensemble classifies correctly out of bag, then draws
/// uniformly from that pool.
/// Lowering the correct fraction concentrates the training
/// effort on the hard examples.
///
/// Out-of-bag early stopping is always active, since the
/// correctness bookkeeping it needs also drives the pool
/// selection.
pub struct IVoting<'a, F> {
    sample: &'a Sample,
    max_members: usize,
    bag_ratio: f64,
    percent_correct: f64,
    seed: u64,
    tracker: OutOfBagStopping,
    stop_flag: Option<StopFlag>,

    rng: StdRng,
    weights: Vec<f64>,
    hypotheses: Vec<F>,
}


impl<'a, F> IVoting<'a, F> {
    /// Construct a new instance of `IVoting`.
    pub fn init(sample: &'a Sample) -> Self {
        Self {
            sample,
            max_members: DEFAULT_MAX_MEMBERS,
            bag_ratio: DEFAULT_BAG_RATIO,
            percent_correct: DEFAULT_PERCENT_CORRECT,
            seed: DEFAULT_SEED,
            tracker: OutOfBagStopping::new(),
            stop_flag: None,

            rng: StdRng::seed_from_u64(DEFAULT_SEED),
            weights: Vec::new(),
            hypotheses: Vec::new(),
        }
    }


    /// Set the maximum number of ensemble members.
    /// Default value is `100.`
    pub fn max_members(mut self, max_members: usize) -> Self {
        self.max_members = max_members;
        self
    }


    /// Set the bag size as a fraction of the training sample.
    /// Default value is `0.5.`
    pub fn bag_ratio(mut self, bag_ratio: f64) -> Self {
        checker::check_sampling_ratio(bag_ratio);
        self.bag_ratio = bag_ratio;
        self
    }


    /// Set the fraction of each bag drawn from the pool of
    /// correctly classified examples.
    /// Default value is `0.5.`
    pub fn percent_correct(mut self, percent_correct: f64) -> Self {
        checker::check_probability(percent_correct);
        self.percent_correct = percent_correct;
        self
    }


    /// Set the seed of the randomness for bag sampling.
    /// Default value is `1234.`
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }


    /// Set the capacity of the out-of-bag smoothing window.
    pub fn smoothing_window(mut self, window_capacity: usize) -> Self {
        self.tracker = OutOfBagStopping::with_window(window_capacity);
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


    /// Draw one importance-weighted bag.
    /// Returns the induced distribution over the training
    /// sample and the in-bag membership flags.
    fn draw_bag(&mut self) -> (Vec<f64>, FixedBitSet) {
        let n_sample = self.sample.shape().0;
        let n_draw = ((self.bag_ratio * n_sample as f64).ceil()
            as usize).max(1);

        let correct_pool = (0..n_sample)
            .filter(|&i| self.tracker.is_correct(i))
            .collect::<Vec<_>>();
        let incorrect_pool = (0..n_sample)
            .filter(|&i| !self.tracker.is_correct(i))
            .collect::<Vec<_>>();

        let mut counts = vec![0usize; n_sample];
        let mut in_bag = FixedBitSet::with_capacity(n_sample);
        for _ in 0..n_draw {
            let want_correct =
                self.rng.gen::<f64>() < self.percent_correct;
            // Fall back to the other pool when the wanted one
            // is empty, e.g. on the very first iteration.
            let pool = match (want_correct, correct_pool.is_empty()) {
                (true, false) => &correct_pool,
                (true, true) => &incorrect_pool,
                (false, _) if incorrect_pool.is_empty()
                    => &correct_pool,
                (false, _) => &incorrect_pool,
            };

            let index = pool[self.rng.gen_range(0..pool.len())];
            counts[index] += 1;
            in_bag.insert(index);
        }

        let dist = counts.into_iter()
            .map(|count| count as f64 / n_draw as f64)
            .collect();
        (dist, in_bag)
    }
}


impl<F> EnsembleLearner<F> for IVoting<'_, F>
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
        if iteration > self.max_members {
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
        if let ControlFlow::Break(keep) = flow {
            self.weights.truncate(keep);
            self.hypotheses.truncate(keep);
            return ControlFlow::Break(iteration);
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


impl<F> CurrentEnsemble<F> for IVoting<'_, F>
    where F: Classifier + Clone,
{
    fn current_ensemble(&self) -> WeightedMajority<F> {
        WeightedMajority::from_slices(&self.weights, &self.hypotheses)
    }
}
