//! Exports the standard learners, minimizers, and traits.
//!
pub use crate::anytime::{
    // The shared iteration contract
    AnytimeAlgorithm,
    StopFlag,
};


pub use crate::ensemble::{
    // Ensemble learner trait
    EnsembleLearner,


    // Resampling learners ----------------------
    Bagging,
    IVoting,

    OutOfBagStopping,
};


pub use crate::weak_learner::{
    // Weak learner trait
    WeakLearner,


    // Decision stump
    DecisionStump,
    StumpClassifier,
};


pub use crate::optimizer::{
    // Multivariate minimizers ------------------
    QuasiNewton,
    HessianUpdate,
    DirectionSetMinimizer,
    GaussNewton,


    // Line searches
    FletcherLineSearch,
    BrentLineSearch,


    // Linear solver
    ConjugateGradient,

    Minimum,
};


pub use crate::regression::{
    LinearClassifier,
    LogisticRegression,
};


pub use crate::hypothesis::{
    Classifier,
    Regressor,
    WeightedMajority,
};


pub use crate::sample::{
    Feature,
    Sample,
    SampleReader,
};
