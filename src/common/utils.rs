//! This file provides some common numeric functions
//! such as inner products and dense matrix-vector products.
use rayon::prelude::*;


/// Returns the standard inner product of two slices.
#[inline(always)]
pub(crate) fn inner_product(v1: &[f64], v2: &[f64]) -> f64 {
    v1.iter()
        .zip(v2)
        .map(|(a, b)| a * b)
        .sum::<f64>()
}


/// Returns the Euclidean norm of the given slice.
#[inline(always)]
pub(crate) fn norm(v: &[f64]) -> f64 {
    inner_product(v, v).sqrt()
}


/// Normalizes the given slice so that its entries sum to one.
/// A slice whose sum is zero is left untouched to avoid
/// propagating NaN.
#[inline(always)]
pub(crate) fn normalize(v: &mut [f64]) {
    let z = v.iter().map(|x| x.abs()).sum::<f64>();
    if z == 0f64 { return; }

    v.iter_mut()
        .for_each(|x| { *x /= z; });
}


/// Returns `x + s * d` as a new vector.
#[inline(always)]
pub(crate) fn add_scaled(x: &[f64], s: f64, d: &[f64]) -> Vec<f64> {
    x.iter()
        .zip(d)
        .map(|(a, b)| a + s * b)
        .collect()
}


/// Returns `a - b` as a new vector.
#[inline(always)]
pub(crate) fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(x, y)| x - y)
        .collect()
}


/// Returns `s * v` as a new vector.
#[inline(always)]
pub(crate) fn scale(s: f64, v: &[f64]) -> Vec<f64> {
    v.iter()
        .map(|x| s * x)
        .collect()
}


/// Constructs the `dim`-dimensional identity matrix,
/// scaled by `s`.
#[inline(always)]
pub(crate) fn scaled_identity(dim: usize, s: f64) -> Vec<Vec<f64>> {
    (0..dim).map(|i| {
            let mut row = vec![0f64; dim];
            row[i] = s;
            row
        })
        .collect()
}


/// Returns the matrix-vector product `m * v`
/// for a dense row-major matrix.
#[inline(always)]
pub(crate) fn matrix_vector_product(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.par_iter()
        .map(|row| inner_product(row, v))
        .collect()
}


/// Adds `c * a * b^T` to the dense matrix `m` in place.
#[inline(always)]
pub(crate) fn rank_one_update(
    m: &mut [Vec<f64>],
    c: f64,
    a: &[f64],
    b: &[f64],
)
{
    m.iter_mut()
        .zip(a)
        .for_each(|(row, ai)| {
            row.iter_mut()
                .zip(b)
                .for_each(|(mij, bj)| { *mij += c * ai * bj; });
        });
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_vector() {
        let m = vec![
            vec![1f64, 2f64],
            vec![3f64, 4f64],
        ];
        let v = vec![1f64, -1f64];
        assert_eq!(matrix_vector_product(&m, &v), vec![-1f64, -1f64]);
    }

    #[test]
    fn rank_one() {
        let mut m = scaled_identity(2, 1f64);
        rank_one_update(&mut m, 2f64, &[1f64, 0f64], &[0f64, 1f64]);
        assert_eq!(m[0][1], 2f64);
        assert_eq!(m[1][0], 0f64);
    }

    #[test]
    fn normalize_zero_sum_is_noop() {
        let mut v = vec![0f64, 0f64];
        normalize(&mut v);
        assert_eq!(v, vec![0f64, 0f64]);
    }
}
