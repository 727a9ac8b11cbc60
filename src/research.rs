//! Utilities for experiments:
//! train/test splitting and per-iteration logging of
//! ensemble learners.
/// Generates train/test pairs for cross validation.
pub mod cross_validation;

/// Runs an ensemble learner with per-iteration logging.
pub mod logger;

/// Loss functions (e.g., zero-one loss, squared loss).
pub mod loss_functions;


pub use cross_validation::CrossValidation;
pub use logger::{CurrentEnsemble, Logger};
pub use loss_functions::{
    absolute_loss,
    squared_loss,
    zero_one_loss,
};
