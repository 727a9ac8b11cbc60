use polars::prelude::*;
use std::ops::Index;
use std::slice::Iter;


/// Dense representation of a single feature column.
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature name
    pub(super) name: String,
    /// Feature values, one per example.
    pub(super) values: Vec<f64>,
}


impl Feature {
    /// Construct an empty feature of the given name.
    pub fn new<T: ToString>(name: T) -> Self {
        let name = name.to_string();
        let values = Vec::new();
        Self { name, values, }
    }


    /// Get the feature name.
    pub fn name(&self) -> &str {
        &self.name
    }


    /// Returns an iterator over the feature values.
    pub fn iter(&self) -> Iter<'_, f64> {
        self.values.iter()
    }


    /// Convert `polars::Series` into `Feature`.
    pub fn from_series(series: &Series) -> Self {
        let name = series.name().to_string();

        let values = series.f64()
            .expect("The series is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .expect("The series contains a null value");

        Self { name, values, }
    }


    /// Append an example to this feature.
    pub fn append(&mut self, x: f64) {
        self.values.push(x);
    }


    /// Number of examples in this feature.
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// Returns `true` if this feature has no example.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }


    pub(super) fn into_target(self) -> Vec<f64> {
        self.values
    }


    /// Keep only the examples at the given indices,
    /// in the given order.
    pub(super) fn subsample(&self, indices: &[usize]) -> Self {
        let name = self.name.clone();
        let values = indices.iter()
            .map(|&i| self.values[i])
            .collect();
        Self { name, values, }
    }
}


impl Index<usize> for Feature {
    type Output = f64;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.values[idx]
    }
}
