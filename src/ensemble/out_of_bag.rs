//! Out-of-bag error tracking with smoothed early stopping.
use fixedbitset::FixedBitSet;

use std::collections::VecDeque;
use std::ops::ControlFlow;


const DEFAULT_WINDOW_CAPACITY: usize = 25;


/// Tracks the out-of-bag error of a growing ensemble and
/// decides when to stop.
///
/// After each new member, [`OutOfBagStopping::step_end`] adds
/// the member's votes to every example the member was *not*
/// trained on, recomputes which examples the accumulated vote
/// classifies correctly, and appends the raw out-of-bag error
/// rate.
/// The raw rates are smoothed by a moving average over a
/// bounded window; once the smoothed rate stops improving,
/// the tracker requests a stop and names the ensemble length
/// to roll back to: the length whose raw rate within the
/// window was lowest, preferring the most recent on ties.
///
/// Correctness is maintained incrementally.
/// Only examples whose accumulated vote changed sign this step
/// touch the error count, so a step costs time proportional to
/// the sample size, not to the ensemble size.
pub struct OutOfBagStopping {
    window_capacity: usize,
    n_sample: usize,
    votes: Vec<f64>,
    correct: FixedBitSet,
    error_count: usize,
    raw_rates: Vec<f64>,
    smoothed_rates: Vec<f64>,
    window: VecDeque<f64>,
    previous_smoothed: f64,
}


impl OutOfBagStopping {
    /// Construct a tracker with the default smoothing window.
    pub fn new() -> Self {
        Self::with_window(DEFAULT_WINDOW_CAPACITY)
    }


    /// Construct a tracker with the given smoothing-window
    /// capacity.
    pub fn with_window(window_capacity: usize) -> Self {
        assert!(
            window_capacity > 0,
            "The smoothing window must hold at least one rate."
        );
        Self {
            window_capacity,
            n_sample: 0,
            votes: Vec::new(),
            correct: FixedBitSet::new(),
            error_count: 0,
            raw_rates: Vec::new(),
            smoothed_rates: Vec::new(),
            window: VecDeque::new(),
            previous_smoothed: f64::INFINITY,
        }
    }


    /// Reset the tracker for a training sample of `n_sample`
    /// examples.
    /// With no votes yet, every example counts as wrong.
    pub fn start(&mut self, n_sample: usize) {
        self.n_sample = n_sample;
        self.votes = vec![0f64; n_sample];
        self.correct = FixedBitSet::with_capacity(n_sample);
        self.error_count = n_sample;
        self.raw_rates.clear();
        self.smoothed_rates.clear();
        self.window.clear();
        self.previous_smoothed = f64::INFINITY;
    }


    /// Returns `true` if the accumulated out-of-bag vote
    /// classifies example `index` correctly.
    pub fn is_correct(&self, index: usize) -> bool {
        self.correct.contains(index)
    }


    /// A read-only view of the per-example correctness flags.
    pub fn correct(&self) -> &FixedBitSet {
        &self.correct
    }


    /// The raw out-of-bag error rate after each step so far.
    pub fn raw_rates(&self) -> &[f64] {
        &self.raw_rates
    }


    /// The smoothed out-of-bag error rate after each step so far.
    pub fn smoothed_rates(&self) -> &[f64] {
        &self.smoothed_rates
    }


    /// Account for one new ensemble member.
    ///
    /// `in_bag` flags the examples the member was trained on;
    /// `member_votes[i]` is the member's weighted vote on
    /// example `i`, and `targets` holds the `±1.0` labels.
    ///
    /// Returns `ControlFlow::Break(keep)` when the smoothed
    /// rate fails to improve, where `keep` is the ensemble
    /// length to roll back to.
    pub fn step_end(
        &mut self,
        in_bag: &FixedBitSet,
        member_votes: &[f64],
        targets: &[f64],
    ) -> ControlFlow<usize>
    {
        for i in 0..self.n_sample {
            if in_bag.contains(i) {
                continue;
            }
            self.votes[i] += member_votes[i];

            let now_correct = self.votes[i] * targets[i] > 0.0;
            if now_correct != self.correct.contains(i) {
                if now_correct {
                    self.error_count -= 1;
                } else {
                    self.error_count += 1;
                }
                self.correct.set(i, now_correct);
            }
        }

        let raw = self.error_count as f64 / self.n_sample as f64;
        self.raw_rates.push(raw);

        if self.window.len() == self.window_capacity {
            self.window.pop_front();
        }
        self.window.push_back(raw);
        let smoothed = self.window.iter().sum::<f64>()
            / self.window.len() as f64;
        self.smoothed_rates.push(smoothed);

        let stalled = smoothed >= self.previous_smoothed;
        self.previous_smoothed = smoothed;

        if stalled {
            ControlFlow::Break(self.rollback_length())
        } else {
            ControlFlow::Continue(())
        }
    }


    /// The ensemble length whose raw rate within the smoothing
    /// window was lowest.
    /// Ties resolve to the most recent length, so rolling back
    /// discards as few members as possible.
    fn rollback_length(&self) -> usize {
        let start = self.raw_rates.len() - self.window.len();
        let mut best = start;
        for (i, &rate) in self.raw_rates.iter()
            .enumerate()
            .skip(start)
        {
            if rate <= self.raw_rates[best] {
                best = i;
            }
        }
        best + 1
    }


    /// Release the per-example buffers once training is over.
    /// The recorded rate histories stay available.
    pub fn finish(&mut self) {
        self.votes = Vec::new();
        self.window = VecDeque::new();
    }
}


impl Default for OutOfBagStopping {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    fn all_out_of_bag(n: usize) -> FixedBitSet {
        FixedBitSet::with_capacity(n)
    }


    #[test]
    fn counts_initial_votes() {
        let n = 20;
        let mut tracker = OutOfBagStopping::new();
        tracker.start(n);

        // First member gets half the sample right.
        let mut votes = vec![1f64; n];
        votes[10..].iter_mut().for_each(|v| *v = -1.0);
        let targets = vec![1f64; n];

        let flow = tracker.step_end(
            &all_out_of_bag(n), &votes, &targets,
        );
        assert_eq!(flow, ControlFlow::Continue(()));
        assert_eq!(tracker.raw_rates(), &[0.5]);
        assert!(tracker.is_correct(0));
        assert!(!tracker.is_correct(10));
    }


    #[test]
    fn in_bag_examples_are_skipped() {
        let n = 4;
        let mut tracker = OutOfBagStopping::new();
        tracker.start(n);

        let mut in_bag = FixedBitSet::with_capacity(n);
        in_bag.insert(0);
        in_bag.insert(1);

        let votes = vec![1f64; n];
        let targets = vec![1f64; n];
        let _ = tracker.step_end(&in_bag, &votes, &targets);

        // The in-bag half never received a vote.
        assert!(!tracker.is_correct(0));
        assert!(tracker.is_correct(2));
        assert_eq!(tracker.raw_rates(), &[0.5]);
    }


    #[test]
    fn stops_and_rolls_back_to_lowest_raw_rate() {
        let n = 20;
        let mut tracker = OutOfBagStopping::new();
        tracker.start(n);

        let targets = vec![1f64; n];
        let oob = all_out_of_bag(n);

        // Raw rates 0.5, 0.4, 0.3, 0.35, 0.4.
        // Smoothed:  0.5, 0.45, 0.4, 0.3875, 0.39 (stalls here).
        let mut votes = vec![1f64; n];
        votes[10..].iter_mut().for_each(|v| *v = -1.0);
        assert_eq!(
            tracker.step_end(&oob, &votes, &targets),
            ControlFlow::Continue(()),
        );

        let mut votes = vec![0f64; n];
        votes[10] = 2.0;
        votes[11] = 2.0;
        assert_eq!(
            tracker.step_end(&oob, &votes, &targets),
            ControlFlow::Continue(()),
        );

        let mut votes = vec![0f64; n];
        votes[12] = 2.0;
        votes[13] = 2.0;
        assert_eq!(
            tracker.step_end(&oob, &votes, &targets),
            ControlFlow::Continue(()),
        );

        let mut votes = vec![0f64; n];
        votes[0] = -2.0;
        assert_eq!(
            tracker.step_end(&oob, &votes, &targets),
            ControlFlow::Continue(()),
        );

        let mut votes = vec![0f64; n];
        votes[1] = -2.0;
        let flow = tracker.step_end(&oob, &votes, &targets);

        // The lowest raw rate (0.3) was reached by the
        // three-member ensemble.
        assert_eq!(flow, ControlFlow::Break(3));
        assert_eq!(
            tracker.raw_rates(),
            &[0.5, 0.4, 0.3, 0.35, 0.4],
        );
    }


    #[test]
    fn ties_prefer_the_most_recent_length() {
        let n = 2;
        let mut tracker = OutOfBagStopping::new();
        tracker.start(n);

        let targets = vec![1f64, 1f64];
        let oob = all_out_of_bag(n);

        // Raw rates 0.5, 0.5: the smoothed rate stalls at once
        // and both lengths tie, so the second wins.
        let flow = tracker.step_end(
            &oob, &[1.0, -1.0], &targets,
        );
        assert_eq!(flow, ControlFlow::Continue(()));

        let flow = tracker.step_end(
            &oob, &[0.0, 0.0], &targets,
        );
        assert_eq!(flow, ControlFlow::Break(2));
    }
}
