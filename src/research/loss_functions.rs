use crate::hypothesis::Classifier;
use crate::sample::Sample;


/// Zero-one loss of a classifier over a sample.
pub fn zero_one_loss<H>(sample: &Sample, f: &H) -> f64
    where H: Classifier,
{
    let n_sample = sample.shape().0;
    if n_sample == 0 {
        return 0.0;
    }

    let target = sample.target();
    f.predict_all(sample)
        .into_iter()
        .zip(target)
        .map(|(hx, &y)| if hx as f64 * y > 0.0 { 0.0 } else { 1.0 })
        .sum::<f64>()
        / n_sample as f64
}


/// Squared loss
pub fn squared_loss(true_label: f64, prediction: f64) -> f64 {
    (true_label - prediction).powi(2)
}


/// Absolute loss
pub fn absolute_loss(true_label: f64, prediction: f64) -> f64 {
    (true_label - prediction).abs()
}
