//! Sum of squared differences.
use super::{CostFunction, Score};
use ndarray::{ArrayView3, Zip};

/// Sum of squared intensity differences. Zero for identical inputs, grows
/// with misalignment.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SumOfSquaredDifferences;

impl CostFunction for SumOfSquaredDifferences {
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score {
        Score::Scalar(ssd(reference, moving))
    }
}

/// `Σ (a - b)²` over all voxels.
pub fn ssd(a: ArrayView3<f64>, b: ArrayView3<f64>) -> f64 {
    Zip::from(&a).and(&b).fold(0., |acc, &x, &y| {
        let d = x - y;
        acc + d * d
    })
}

#[cfg(test)]
mod tests {
    use super::ssd;
    use ndarray::Array3;

    #[test]
    fn identical_is_zero() {
        let a = Array3::from_shape_fn((3, 3, 3), |(i, j, k)| (i + 2 * j + 3 * k) as f64);
        assert_eq!(ssd(a.view(), a.view()), 0.);
    }

    #[test]
    fn sums_squares() {
        let a = Array3::from_elem((2, 2, 2), 1.);
        let mut b = Array3::from_elem((2, 2, 2), 1.);
        b[[0, 0, 0]] = 3.;
        b[[1, 1, 1]] = 0.;
        assert_eq!(ssd(a.view(), b.view()), 5.);
    }
}
