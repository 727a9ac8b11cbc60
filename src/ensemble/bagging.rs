//! Bootstrap aggregating.
mod bagging_algorithm;

pub use bagging_algorithm::Bagging;
