//! Ensemble learners that grow a weighted-majority classifier
//! one member at a time.
/// Defines the learner trait and its driver loop.
pub mod core;

/// Out-of-bag error tracking and early stopping.
pub mod out_of_bag;

/// Bootstrap-aggregating (bagging).
pub mod bagging;

/// Importance voting, which focuses the resampling on
/// hard examples.
pub mod ivoting;


pub use self::core::EnsembleLearner;
pub use self::out_of_bag::OutOfBagStopping;
pub use self::bagging::Bagging;
pub use self::ivoting::IVoting;
