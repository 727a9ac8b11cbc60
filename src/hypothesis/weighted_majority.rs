use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;

use std::fs;
use std::io;
use std::path::Path;

use crate::{
    common::utils,
    Classifier,
    Regressor,
    Sample,
};


/// A weighted ensemble of hypotheses.
/// This is the struct that the ensemble learners in this crate return.
/// You can read/write this struct by `Serde` trait.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WeightedMajority<H> {
    /// Weights on each hypothesis in `self.hypotheses`.
    pub weights: Vec<f64>,
    /// Set of hypotheses.
    pub hypotheses: Vec<H>,
}


impl<H: Clone> WeightedMajority<H> {
    /// Construct a new `WeightedMajority` from the given slices.
    /// Hypotheses with non-positive weight are dropped and
    /// the remaining weights are normalized.
    #[inline]
    pub fn from_slices(weights: &[f64], hypotheses: &[H]) -> Self {
        let mut new_weights = Vec::with_capacity(weights.len());
        let mut new_hypotheses = Vec::with_capacity(hypotheses.len());

        weights.iter()
            .copied()
            .zip(hypotheses)
            .for_each(|(w, h)| {
                if w > 0.0 {
                    new_weights.push(w);
                    new_hypotheses.push(h.clone());
                }
            });
        utils::normalize(&mut new_weights[..]);

        Self { weights: new_weights, hypotheses: new_hypotheses, }
    }
}


impl<H> WeightedMajority<H> {
    /// Append a pair `(weight, hypothesis)` to
    /// the current combined hypothesis.
    #[inline]
    pub fn push(&mut self, weight: f64, hypothesis: H) {
        self.weights.push(weight);
        self.hypotheses.push(hypothesis);
    }


    /// Keep the first `len` members and drop the rest.
    /// The out-of-bag stopping rule uses this method to roll the
    /// ensemble back to its best observed state.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.weights.truncate(len);
        self.hypotheses.truncate(len);
    }


    /// Number of members in this ensemble.
    #[inline]
    pub fn len(&self) -> usize {
        self.hypotheses.len()
    }


    /// Returns `true` if this ensemble has no member.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hypotheses.is_empty()
    }


    /// Normalize `self.weights` so that `‖w‖₁ = 1`.
    #[inline]
    pub fn normalize(&mut self) {
        utils::normalize(&mut self.weights);
    }


    /// Decompose the combined hypothesis
    /// into the two vectors `Vec<f64>` and `Vec<H>`.
    #[inline]
    pub fn decompose(self) -> (Vec<f64>, Vec<H>) {
        (self.weights, self.hypotheses)
    }
}


impl<H: Serialize> WeightedMajority<H> {
    /// Write this combined hypothesis to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }
}


impl<H: DeserializeOwned> WeightedMajority<H> {
    /// Read a combined hypothesis from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}


impl<H> Classifier for WeightedMajority<H>
    where H: Classifier,
{
    fn confidence(&self, sample: &Sample, row: usize) -> f64 {
        self.weights.iter()
            .zip(&self.hypotheses[..])
            .map(|(w, h)| *w * h.confidence(sample, row))
            .sum::<f64>()
    }
}


impl<H> Regressor for WeightedMajority<H>
    where H: Regressor,
{
    fn predict(&self, sample: &Sample, row: usize) -> f64 {
        self.weights.iter()
            .zip(&self.hypotheses[..])
            .map(|(w, h)| *w * h.predict(sample, row))
            .sum::<f64>()
    }
}
