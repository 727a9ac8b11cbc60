//! Provides the `WeakLearner` trait.
use crate::Sample;


/// An algorithm that produces a single hypothesis
/// from a weighted training sample.
/// The ensemble learners in this crate repeatedly call
/// [`WeakLearner::produce`] with different distributions
/// over the examples.
pub trait WeakLearner {
    /// The type of the hypothesis this learner produces.
    type Hypothesis;


    /// Returns the name of this weak learner.
    fn name(&self) -> &str;


    /// Returns some information useful for logging,
    /// as pairs of a name and its value.
    fn info(&self) -> Option<Vec<(&str, String)>> {
        None
    }


    /// Produces a hypothesis for the distribution `dist`
    /// over the examples in `sample`.
    fn produce(&self, sample: &Sample, dist: &[f64]) -> Self::Hypothesis;
}
