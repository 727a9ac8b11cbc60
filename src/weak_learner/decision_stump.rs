//! Defines the decision stump weak learner.
mod stump_algorithm;
mod stump_classifier;

pub use stump_algorithm::DecisionStump;
pub use stump_classifier::StumpClassifier;
