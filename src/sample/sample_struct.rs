use std::path::Path;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::collections::HashMap;
use std::ops::Index;

use polars::prelude::*;

use super::feature_struct::Feature;


/// Struct `Sample` holds a batch sample in dense format.
/// One can construct it from a CSV file or a `polars::DataFrame`.
#[derive(Debug, Clone)]
pub struct Sample {
    pub(super) name_to_index: HashMap<String, usize>,
    pub(super) features: Vec<Feature>,
    pub(super) target: Vec<f64>,
    pub(super) n_sample: usize,
    pub(super) n_feature: usize,
}


impl Sample {
    /// Convert `polars::DataFrame` and `polars::Series` into `Sample`.
    /// This method takes the ownership for the given pair
    /// `data` and `target`.
    pub fn from_dataframe(data: DataFrame, target: Series)
        -> io::Result<Self>
    {
        let (n_sample, n_feature) = data.shape();
        let target = target.f64()
            .expect("The target is not a dtype f64")
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .expect("The target contains a null value");

        let features = data.get_columns()
            .iter()
            .map(Feature::from_series)
            .collect::<Vec<_>>();

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };
        Ok(sample)
    }


    /// Read a CSV format file into `Sample`.
    /// Note that the returned sample has no target feature;
    /// call [`Sample::set_target`] to choose one.
    pub fn from_csv<P>(file: P, mut has_header: bool) -> io::Result<Self>
        where P: AsRef<Path>,
    {
        // Open the given `file`.
        let file = File::open(file)?;
        let lines = BufReader::new(file).lines();

        let mut features: Vec<Feature> = Vec::new();
        let mut n_sample = 0_usize;

        // For each line of the file
        for line in lines {
            let line = line?;
            if line.trim().is_empty() { continue; }

            if has_header && features.is_empty() {
                features = line.split(',')
                    .map(|name| Feature::new(name.trim()))
                    .collect::<Vec<_>>();
                continue;
            }

            let xs = line.split(',')
                .map(|x| x.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| io::Error::new(
                    io::ErrorKind::InvalidData, e
                ))?;

            // If the header does not exist,
            // construct a dummy header.
            if !has_header && features.is_empty() {
                features = (1..=xs.len()).map(|i| {
                        let name = format!("Feat. [{i}]");
                        Feature::new(name)
                    })
                    .collect::<Vec<_>>();
                has_header = true;
            }

            for (feat, x) in features.iter_mut().zip(xs) {
                feat.append(x);
            }
            n_sample += 1;
        }

        let n_feature = features.len();
        let target = Vec::with_capacity(0);

        let name_to_index = features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        let sample = Self {
            name_to_index, features, target, n_sample, n_feature,
        };

        Ok(sample)
    }


    /// Returns the target values as a slice of type `f64`.
    pub fn target(&self) -> &[f64] {
        &self.target[..]
    }


    /// Returns a slice of type `Feature`.
    pub fn features(&self) -> &[Feature] {
        &self.features[..]
    }


    /// Set the feature of name `target` to `self.target`.
    /// The old value assigned to `self.target` will be dropped.
    pub fn set_target<S: AsRef<str>>(mut self, target: S) -> Self {
        let target = target.as_ref();
        let pos = self.features.iter()
            .position(|feat| feat.name() == target)
            .expect("The target feature does not exist");

        let target = self.features.remove(pos).into_target();
        self.target = target;
        self.n_feature -= 1;

        self.name_to_index = self.features.iter()
            .enumerate()
            .map(|(i, f)| (f.name().to_string(), i))
            .collect::<HashMap<_, _>>();

        self
    }


    /// Returns the pair of the number of examples and
    /// the number of features.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_sample, self.n_feature)
    }


    /// Returns the `row`-th example as a dense vector.
    pub fn row(&self, row: usize) -> Vec<f64> {
        self.features.iter()
            .map(|feat| feat[row])
            .collect()
    }


    /// Construct a new sample that consists of
    /// the examples at the given indices, in the given order.
    pub fn subsample(&self, indices: &[usize]) -> Self {
        let features = self.features.iter()
            .map(|feat| feat.subsample(indices))
            .collect::<Vec<_>>();
        let target = indices.iter()
            .map(|&i| self.target[i])
            .collect::<Vec<_>>();

        Self {
            name_to_index: self.name_to_index.clone(),
            features,
            target,
            n_sample: indices.len(),
            n_feature: self.n_feature,
        }
    }


    /// Panics if some target value is not `±1`.
    /// The classification learners in this crate assume
    /// binary labels.
    pub fn is_valid_binary_instance(&self) {
        assert_eq!(
            self.n_sample,
            self.target.len(),
            "The sample has no target feature. \
             Call `Sample::set_target` first.",
        );
        let ok = self.target.iter()
            .all(|y| *y == 1f64 || *y == -1f64);
        assert!(ok, "The target values must be +1.0 or -1.0");
    }
}


impl<S: AsRef<str>> Index<S> for Sample {
    type Output = Feature;

    fn index(&self, name: S) -> &Self::Output {
        let name = name.as_ref();
        let k = *self.name_to_index.get(name)
            .expect("The feature does not exist");
        &self.features[k]
    }
}


#[cfg(test)]
mod tests {
    use super::*;


    #[test]
    fn from_dataframe_keeps_shape_and_names() {
        let data = DataFrame::new(vec![
            Series::new("x", vec![0.0f64, 1.0, 2.0]),
            Series::new("y", vec![5.0f64, 4.0, 3.0]),
        ]).unwrap();
        let target = Series::new("class", vec![1.0f64, -1.0, 1.0]);

        let sample = Sample::from_dataframe(data, target).unwrap();
        assert_eq!(sample.shape(), (3, 2));
        assert_eq!(sample.target(), &[1.0, -1.0, 1.0]);
        assert_eq!(sample["y"][2], 3.0);
        sample.is_valid_binary_instance();
    }


    #[test]
    fn subsample_reorders_examples() {
        let data = DataFrame::new(vec![
            Series::new("x", vec![0.0f64, 1.0, 2.0]),
        ]).unwrap();
        let target = Series::new("class", vec![1.0f64, -1.0, 1.0]);
        let sample = Sample::from_dataframe(data, target).unwrap();

        let sub = sample.subsample(&[2, 0]);
        assert_eq!(sub.shape(), (2, 1));
        assert_eq!(sub.row(0), vec![2.0]);
        assert_eq!(sub.target(), &[1.0, 1.0]);
    }
}
