#![warn(missing_docs)]

//!
//! A crate that provides resampling-based ensemble learners
//! and the nonlinear function minimizers behind them.
//!
//! The two halves share one iteration contract,
//! [`AnytimeAlgorithm`](crate::anytime::AnytimeAlgorithm):
//! every algorithm in this crate can be interrupted after any
//! completed step and still yield a usable result.
//!
//! - Ensemble learners
//!     `Bagging` trains each member on a uniform bootstrap bag;
//!     `IVoting` biases the bags toward the examples the
//!     current ensemble still gets wrong.
//!     Both can stop early once the smoothed out-of-bag error
//!     stops improving, rolling the ensemble back to its best
//!     length.
//!
//! - Function minimizers
//!     Derivative-based (Fletcher) and derivative-free (Brent)
//!     line searches, BFGS/DFP quasi-Newton methods,
//!     Powell's direction-set method,
//!     a conjugate-gradient linear solver,
//!     and Gauss-Newton / Fletcher-Xu nonlinear least squares.
//!     `LogisticRegression` connects the two halves:
//!     a linear model fit by the quasi-Newton minimizer.

pub mod anytime;
pub mod sample;
pub mod hypothesis;
pub mod weak_learner;
pub mod ensemble;
pub mod optimizer;
pub mod regression;
pub mod research;

mod common;

/// Exports the standard learners, minimizers, and traits.
pub mod prelude;


pub use anytime::{AnytimeAlgorithm, StopFlag};

pub use sample::{Feature, Sample, SampleReader};

pub use hypothesis::{Classifier, Regressor, WeightedMajority};

pub use weak_learner::{
    DecisionStump,
    StumpClassifier,
    WeakLearner,
};

pub use ensemble::{
    Bagging,
    EnsembleLearner,
    IVoting,
    OutOfBagStopping,
};

pub use optimizer::{
    BrentLineSearch,
    ConjugateGradient,
    DirectionSetMinimizer,
    FletcherLineSearch,
    GaussNewton,
    HessianUpdate,
    QuasiNewton,
};

pub use regression::{LinearClassifier, LogisticRegression};

pub use research::{CrossValidation, Logger};
