//! Importance voting.
mod ivoting_algorithm;

pub use ivoting_algorithm::IVoting;
