//! The trait shared by the ensemble learners in this crate.
use std::ops::ControlFlow;

use crate::hypothesis::WeightedMajority;
use crate::weak_learner::WeakLearner;


/// An iterative ensemble learner.
/// Every algorithm implementing this trait grows a
/// [`WeightedMajority`] over hypotheses of type `H`,
/// one member per call to [`EnsembleLearner::step`].
///
/// [`EnsembleLearner::run`] drives the standard loop:
///
/// ```text
/// if !preprocess(weak_learner) { return None; }
/// loop {
///     if stop_requested() { break; }
///     step(weak_learner, iteration)?;
/// }
/// Some(postprocess(weak_learner))
/// ```
///
/// A learner that cannot start (e.g., an empty training sample)
/// returns `false` from [`EnsembleLearner::preprocess`] and the
/// driver yields `None`.
pub trait EnsembleLearner<H> {
    /// Validates the input and resets the learner state.
    /// Returns `false` to abort the run with no result.
    /// Calling this method twice with the same learner must
    /// reproduce the same run, so all randomness is reseeded
    /// here.
    fn preprocess<W>(&mut self, weak_learner: &W) -> bool
        where W: WeakLearner<Hypothesis = H>;


    /// Trains one more ensemble member.
    /// Returns `ControlFlow::Break(iteration)` once the learner
    /// decides to stop growing the ensemble.
    fn step<W>(&mut self, weak_learner: &W, iteration: usize)
        -> ControlFlow<usize>
        where W: WeakLearner<Hypothesis = H>;


    /// Extracts the final combined hypothesis.
    fn postprocess<W>(&mut self, weak_learner: &W)
        -> WeightedMajority<H>
        where W: WeakLearner<Hypothesis = H>;


    /// Returns `true` if a cooperative stop has been requested.
    /// Checked between steps by [`EnsembleLearner::run`].
    fn stop_requested(&self) -> bool {
        false
    }


    /// Runs the learner to completion.
    fn run<W>(&mut self, weak_learner: &W)
        -> Option<WeightedMajority<H>>
        where W: WeakLearner<Hypothesis = H>,
    {
        if !self.preprocess(weak_learner) {
            return None;
        }

        let _ = (1..).try_for_each(|iteration| {
            if self.stop_requested() {
                return ControlFlow::Break(iteration);
            }
            self.step(weak_learner, iteration)
        });

        Some(self.postprocess(weak_learner))
    }
}
