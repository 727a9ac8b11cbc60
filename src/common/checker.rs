//! This file defines some functions that check pre-conditions,
//! e.g., parameter ranges and the shape of the training sample.

use crate::Sample;


/// Check whether the training sample is valid or not.
#[inline(always)]
pub(crate) fn check_sample(sample: &Sample) {
    let (n_sample, n_feature) = sample.shape();

    assert!(n_sample > 0, "The sample has no example");
    assert!(n_feature > 0, "The sample has no feature");
}


/// Check whether the given tolerance is a positive finite number.
#[inline(always)]
pub(crate) fn check_tolerance(tolerance: f64) {
    assert!(
        tolerance > 0f64 && tolerance.is_finite(),
        "The tolerance parameter must be positive, got {tolerance}",
    );
}


/// Check the Wolfe condition parameters:
/// `0 < slope_condition < curvature_condition < 1`.
#[inline(always)]
pub(crate) fn check_wolfe_parameters(
    slope_condition: f64,
    curvature_condition: f64,
)
{
    assert!(
        (0f64..1f64).contains(&slope_condition)
            && slope_condition > 0f64,
        "The slope condition must be in (0, 1), got {slope_condition}",
    );
    assert!(
        (0f64..1f64).contains(&curvature_condition)
            && curvature_condition > 0f64,
        "The curvature condition must be in (0, 1), \
         got {curvature_condition}",
    );
    assert!(
        slope_condition < curvature_condition,
        "The slope condition ({slope_condition}) must be \
         strictly smaller than the curvature condition \
         ({curvature_condition})",
    );
}


/// Check that the given ratio is in `(0, 1]`.
#[inline(always)]
pub(crate) fn check_sampling_ratio(ratio: f64) {
    assert!(
        ratio > 0f64 && ratio <= 1f64,
        "The sampling ratio must be in (0, 1], got {ratio}",
    );
}


/// Check that the given probability is in `[0, 1]`.
#[inline(always)]
pub(crate) fn check_probability(p: f64) {
    assert!(
        (0f64..=1f64).contains(&p),
        "The probability parameter must be in [0, 1], got {p}",
    );
}
