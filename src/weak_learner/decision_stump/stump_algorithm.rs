//! Provides the weighted decision stump learner.
use rayon::prelude::*;

use std::fmt;

use crate::{Sample, WeakLearner};
use crate::common::checker;

use super::StumpClassifier;


/// The decision stump weak learner.
/// For a given distribution over the examples,
/// [`DecisionStump::produce`] returns the threshold classifier
/// with the smallest weighted training error,
/// searching every feature and every split point.
///
/// # Example
/// ```no_run
/// use minilearn::prelude::*;
///
/// let sample = SampleReader::new()
///     .file("/path/to/csv/file.csv")
///     .has_header(true)
///     .target_feature("class")
///     .read()
///     .unwrap();
///
/// let n_sample = sample.shape().0;
/// let dist = vec![1.0 / n_sample as f64; n_sample];
///
/// let wl = DecisionStump::init(&sample);
/// let h = wl.produce(&sample, &dist);
/// ```
pub struct DecisionStump {
    n_feature: usize,
}


impl DecisionStump {
    /// Initialize the `DecisionStump` weak learner.
    pub fn init(sample: &Sample) -> Self {
        checker::check_sample(sample);
        let n_feature = sample.shape().1;
        Self { n_feature }
    }


    /// Returns the pair of the best stump for feature `j`
    /// and its weighted error.
    fn best_stump_at(
        &self,
        sample: &Sample,
        dist: &[f64],
        j: usize,
    ) -> (StumpClassifier, f64)
    {
        let target = sample.target();
        let feature = &sample.features()[j];

        let mut order = (0..dist.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b|
            feature[a].partial_cmp(&feature[b]).unwrap()
        );

        // Weighted error of the stump `x > threshold => +1`
        // with the threshold below every example.
        let mut error = order.iter()
            .map(|&i| if target[i] > 0.0 { 0.0 } else { dist[i] })
            .sum::<f64>();

        let mut best_error = error.min(1.0 - error);
        let mut best_threshold = feature[order[0]] - 1.0;
        let mut best_sign = if error <= 1.0 - error { 1.0 } else { -1.0 };

        let mut k = 0;
        while k < order.len() {
            let v = feature[order[k]];

            // Move the threshold past every example of value `v`.
            // The prediction for them flips from `+sign` to `-sign`.
            while k < order.len() && feature[order[k]] == v {
                let i = order[k];
                if target[i] > 0.0 {
                    error += dist[i];
                } else {
                    error -= dist[i];
                }
                k += 1;
            }

            let threshold = if k < order.len() {
                (v + feature[order[k]]) / 2.0
            } else {
                v + 1.0
            };

            let (e, sign) = if error <= 1.0 - error {
                (error, 1.0)
            } else {
                (1.0 - error, -1.0)
            };
            if e < best_error {
                best_error = e;
                best_threshold = threshold;
                best_sign = sign;
            }
        }

        let h = StumpClassifier {
            feature: j,
            threshold: best_threshold,
            sign: best_sign,
        };
        (h, best_error)
    }
}


impl WeakLearner for DecisionStump {
    type Hypothesis = StumpClassifier;


    fn name(&self) -> &str {
        "Decision Stump"
    }


    fn info(&self) -> Option<Vec<(&str, String)>> {
        let info = Vec::from([
            ("# of features", format!("{}", self.n_feature)),
        ]);
        Some(info)
    }


    fn produce(&self, sample: &Sample, dist: &[f64]) -> Self::Hypothesis {
        sample.is_valid_binary_instance();
        assert_eq!(sample.shape().0, dist.len());

        (0..self.n_feature).into_par_iter()
            .map(|j| self.best_stump_at(sample, dist, j))
            .min_by(|(_, e1), (_, e2)| e1.partial_cmp(e2).unwrap())
            .map(|(h, _)| h)
            .expect("The sample has no feature")
    }
}


impl fmt::Display for DecisionStump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "----------\n\
             # Weak Learner: {}\n\
             - # of features: {}\n\
             ----------",
            self.name(),
            self.n_feature,
        )
    }
}
