//! Correlation-based measures.
use super::{CostFunction, Score};
use ndarray::{Array1, ArrayBase, ArrayView3, Data, Dimension, Zip};

/// Pearson product-moment correlation of the voxel intensities.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct CrossCorrelation;

impl CostFunction for CrossCorrelation {
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score {
        Score::Scalar(cc(reference, moving))
    }
}

/// Spearman correlation, i.e. the Pearson correlation of the intensity
/// ranks. Insensitive to any monotonic intensity mapping between the two
/// volumes.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct RankCrossCorrelation;

impl CostFunction for RankCrossCorrelation {
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score {
        Score::Scalar(spearman(reference, moving))
    }
}

/// Pearson correlation coefficient. `NaN` if either input has zero
/// variance or holds a non-finite value.
pub fn cc(a: ArrayView3<f64>, b: ArrayView3<f64>) -> f64 {
    pearson(&a, &b)
}

/// Spearman rank correlation coefficient. Tied values receive the average
/// of the ranks they span. `NaN` if either input holds a `NaN` value or
/// has a constant rank.
pub fn spearman(a: ArrayView3<f64>, b: ArrayView3<f64>) -> f64 {
    if a.iter().chain(b.iter()).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let ra = ranks(a.iter().copied());
    let rb = ranks(b.iter().copied());
    pearson(&ra, &rb)
}

fn pearson<S, T, D>(a: &ArrayBase<S, D>, b: &ArrayBase<T, D>) -> f64
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
    D: Dimension,
{
    let n = a.len();
    if n == 0 || a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return f64::NAN;
    }
    let ma = a.sum() / n as f64;
    let mb = b.sum() / n as f64;
    let (mut sab, mut saa, mut sbb) = (0., 0., 0.);
    Zip::from(a).and(b).for_each(|&x, &y| {
        let (dx, dy) = (x - ma, y - mb);
        sab += dx * dy;
        saa += dx * dx;
        sbb += dy * dy;
    });
    if !(saa > 0. && sbb > 0.) {
        return f64::NAN;
    }
    let r = sab / (saa.sqrt() * sbb.sqrt());
    if r.is_nan() {
        return r;
    }
    r.max(-1.).min(1.)
}

/// Fractional ranks (starting at 1) of the given values, in input order.
fn ranks<I>(values: I) -> Array1<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut indexed: Vec<(usize, f64)> = values.into_iter().enumerate().collect();
    indexed.sort_by(|x, y| x.1.total_cmp(&y.1));

    let mut out = Array1::zeros(indexed.len());
    let mut start = 0;
    while start < indexed.len() {
        let mut end = start + 1;
        while end < indexed.len() && indexed[end].1 == indexed[start].1 {
            end += 1;
        }
        // ranks start..end (0-based) share their mean, shifted to 1-based
        let rank = (start + end + 1) as f64 / 2.;
        for &(idx, _) in &indexed[start..end] {
            out[idx] = rank;
        }
        start = end;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{cc, ranks, spearman};
    use approx::assert_abs_diff_eq;
    use ndarray::{arr1, Array3};

    fn ramp() -> Array3<f64> {
        Array3::from_shape_fn((3, 3, 3), |(i, j, k)| (i * 9 + j * 3 + k) as f64)
    }

    #[test]
    fn identical_correlates_fully() {
        let a = ramp();
        assert_abs_diff_eq!(cc(a.view(), a.view()), 1., epsilon = 1e-12);
        assert_abs_diff_eq!(spearman(a.view(), a.view()), 1., epsilon = 1e-12);
    }

    #[test]
    fn constant_is_nan() {
        let a = ramp();
        let b = Array3::from_elem((3, 3, 3), 4.);
        assert!(cc(a.view(), b.view()).is_nan());
        assert!(spearman(b.view(), a.view()).is_nan());
    }

    #[test]
    fn nan_voxel_is_nan() {
        let a = ramp().mapv(|v| v + 1.);
        let mut b = a.clone();
        b[[1, 1, 1]] = f64::NAN;
        assert!(cc(a.view(), b.view()).is_nan());
        assert!(cc(b.view(), a.view()).is_nan());
        assert!(spearman(a.view(), b.view()).is_nan());
        assert!(spearman(b.view(), a.view()).is_nan());
    }

    #[test]
    fn infinite_voxel_is_nan() {
        let a = ramp();
        let mut b = a.clone();
        b[[2, 0, 1]] = f64::INFINITY;
        assert!(cc(a.view(), b.view()).is_nan());
        b[[2, 0, 1]] = f64::NEG_INFINITY;
        assert!(cc(b.view(), a.view()).is_nan());
    }

    #[test]
    fn spearman_ignores_monotonic_mapping() {
        let a = ramp();
        let b = a.mapv(|v| (v * 0.3).exp());
        assert!(cc(a.view(), b.view()) < 0.99);
        assert_abs_diff_eq!(spearman(a.view(), b.view()), 1., epsilon = 1e-12);
    }

    #[test]
    fn tied_ranks_are_averaged() {
        let r = ranks(vec![10., 20., 10., 5.]);
        assert_eq!(r, arr1(&[2.5, 4., 2.5, 1.]));
    }

    #[test]
    fn known_pearson() {
        let mut a = Array3::zeros((1, 1, 4));
        let mut b = Array3::zeros((1, 1, 4));
        for (k, (x, y)) in [(1., 2.), (2., 1.), (3., 4.), (4., 3.)].iter().enumerate() {
            a[[0, 0, k]] = *x;
            b[[0, 0, k]] = *y;
        }
        assert_abs_diff_eq!(cc(a.view(), b.view()), 0.6, epsilon = 1e-12);
    }
}
