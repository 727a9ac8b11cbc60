//! Defines the hypothesis produced by [`DecisionStump`].
//!
//! [`DecisionStump`]: super::DecisionStump
use serde::{Serialize, Deserialize};

use crate::{Classifier, Sample};


/// A single-feature threshold classifier.
/// Predicts `sign` for the examples whose `feature` value
/// exceeds `threshold`, and `-sign` for the others.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StumpClassifier {
    pub(super) feature: usize,
    pub(super) threshold: f64,
    pub(super) sign: f64,
}


impl StumpClassifier {
    /// The feature index this stump splits on.
    pub fn feature(&self) -> usize {
        self.feature
    }


    /// The threshold this stump splits at.
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}


impl Classifier for StumpClassifier {
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        let x = sample.features()[self.feature][row];
        if x > self.threshold { self.sign } else { -self.sign }
    }
}
