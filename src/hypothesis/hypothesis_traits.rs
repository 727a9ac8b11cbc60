use crate::Sample;


/// A trait that defines the behavior of a classifier.
/// You only need to implement the `confidence` method.
pub trait Classifier {
    /// Computes the confidence of the `row`-th example of `sample`.
    /// This crate assumes that
    /// `Classifier::confidence` returns a value in `[-1.0, 1.0]`.
    fn confidence(&self, sample: &Sample, row: usize) -> f64;


    /// Predicts the label of the `row`-th example of `sample`.
    fn predict(&self, sample: &Sample, row: usize) -> i64 {
        let conf = self.confidence(sample, row);
        if conf >= 0.0 { 1 } else { -1 }
    }


    /// Computes the confidence of every example in `sample`.
    fn confidence_all(&self, sample: &Sample) -> Vec<f64> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.confidence(sample, row))
            .collect::<Vec<_>>()
    }


    /// Predicts the labels of every example in `sample`.
    fn predict_all(&self, sample: &Sample) -> Vec<i64> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(sample, row))
            .collect::<Vec<_>>()
    }
}


/// A trait that defines the behavior of a regressor.
/// You only need to implement the `predict` method.
pub trait Regressor {
    /// Predicts the target value of the `row`-th example of `sample`.
    fn predict(&self, sample: &Sample, row: usize) -> f64;


    /// Predicts the target values of every example in `sample`.
    fn predict_all(&self, sample: &Sample) -> Vec<f64> {
        let n_sample = sample.shape().0;
        (0..n_sample).map(|row| self.predict(sample, row))
            .collect::<Vec<_>>()
    }
}
