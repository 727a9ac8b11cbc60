use crate::ensemble::EnsembleLearner;
use crate::hypothesis::WeightedMajority;
use crate::sample::Sample;
use crate::weak_learner::WeakLearner;

use std::fs::File;
use std::io::prelude::*;
use std::path::Path;
use std::time::Instant;

const HEADER: &str = "TrainLoss,TestLoss,Time\n";


/// Implementing this trait allows [`Logger`] to snapshot an
/// ensemble learner's state between iterations.
pub trait CurrentEnsemble<H> {
    /// Returns the combined hypothesis at the current state.
    fn current_ensemble(&self) -> WeightedMajority<H>;
}


/// Struct `Logger` provides a generic function that
/// logs train/test loss and cumulative running time
/// for each iteration of an ensemble learner.
pub struct Logger<'a, B, W, G> {
    learner: B,
    weak_learner: W,
    loss_func: G,
    train: &'a Sample,
    test: &'a Sample,
}


impl<'a, B, W, G> Logger<'a, B, W, G> {
    /// Create a new instance of `Logger`.
    pub fn new(
        learner: B,
        weak_learner: W,
        loss_func: G,
        train: &'a Sample,
        test: &'a Sample,
    ) -> Self
    {
        Self { learner, weak_learner, loss_func, train, test }
    }
}

impl<H, B, W, G> Logger<'_, B, W, G>
    where B: EnsembleLearner<H> + CurrentEnsemble<H>,
          W: WeakLearner<Hypothesis = H>,
          G: Fn(&Sample, &WeightedMajority<H>) -> f64,
{
    /// Run the learner with logging.
    /// This method is almost the same as [`EnsembleLearner::run`]
    /// but measures running time per iteration and appends one
    /// CSV line per ensemble member to `filename`.
    pub fn run<P: AsRef<Path>>(&mut self, filename: P)
        -> std::io::Result<Option<WeightedMajority<H>>>
    {
        let mut file = File::create(filename)?;
        file.write_all(HEADER.as_bytes())?;

        if !self.learner.preprocess(&self.weak_learner) {
            return Ok(None);
        }

        // Cumulative time, in milliseconds.
        let mut time_acc = 0;
        let mut io_result = Ok(());

        let _ = (1..).try_for_each(|iteration| {
            if self.learner.stop_requested() {
                return std::ops::ControlFlow::Break(iteration);
            }

            let now = Instant::now();
            let flow = self.learner.step(
                &self.weak_learner, iteration,
            );
            time_acc += now.elapsed().as_millis();

            let ensemble = self.learner.current_ensemble();
            let train = (self.loss_func)(self.train, &ensemble);
            let test = (self.loss_func)(self.test, &ensemble);

            let line = format!("{train},{test},{time_acc}\n");
            if let Err(e) = file.write_all(line.as_bytes()) {
                io_result = Err(e);
                return std::ops::ControlFlow::Break(iteration);
            }

            flow
        });
        io_result?;

        let f = self.learner.postprocess(&self.weak_learner);
        Ok(Some(f))
    }
}
