//! The generic contract shared by the iterative algorithms
//! in this crate: set up transient state, repeat a unit of work
//! until convergence or cancellation, then clean up.
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};


/// A cooperative cancellation handle.
/// Cloning yields a handle to the same flag,
/// so another thread may request a stop while
/// an algorithm is running.
/// The flag is only checked between steps;
/// a long-running step is never interrupted mid-body.
#[derive(Debug, Clone, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
}


impl StopFlag {
    /// Construct a new, unset flag.
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicBool::new(false)) }
    }


    /// Request the owning algorithm to stop
    /// at its next checkpoint.
    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }


    /// Returns `true` if a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}


/// An iterative algorithm that can yield a usable result
/// after any number of completed steps.
///
/// [`AnytimeAlgorithm::run`] drives the standard control loop:
/// initialization, repeated steps bounded by
/// [`AnytimeAlgorithm::max_iterations`] and the optional
/// [`StopFlag`], then cleanup.
/// An algorithm that cannot initialize (e.g., empty input)
/// yields `None` instead of panicking;
/// callers must check the result.
pub trait AnytimeAlgorithm {
    /// The result type of this algorithm.
    type Output;


    /// Sets up the transient state from the input data.
    /// Returns `false` to abort immediately with no result.
    fn initialize(&mut self) -> bool;


    /// Performs one unit of work.
    /// Returns `ControlFlow::Break(())` once converged.
    fn step(&mut self) -> ControlFlow<()>;


    /// Extracts the current result.
    /// Called once after the step loop ends.
    fn output(&mut self) -> Self::Output;


    /// Releases the transient state.
    /// Always called exactly once per [`AnytimeAlgorithm::run`],
    /// even when initialization fails.
    fn cleanup(&mut self) {}


    /// The maximum number of steps [`AnytimeAlgorithm::run`]
    /// performs.
    fn max_iterations(&self) -> usize;


    /// The cancellation handle checked between steps, if any.
    fn stop_flag(&self) -> Option<&StopFlag> {
        None
    }


    /// Runs the algorithm to completion.
    fn run(&mut self) -> Option<Self::Output> {
        if !self.initialize() {
            self.cleanup();
            return None;
        }

        for _ in 0..self.max_iterations() {
            let stopped = self.stop_flag()
                .is_some_and(|flag| flag.is_requested());
            if stopped {
                break;
            }

            if let ControlFlow::Break(()) = self.step() {
                break;
            }
        }

        let output = self.output();
        self.cleanup();
        Some(output)
    }
}
