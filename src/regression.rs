//! Parametric models fit by the minimizers in this crate.
/// Binary logistic regression.
pub mod logistic;

pub use logistic::{LinearClassifier, LogisticRegression};
