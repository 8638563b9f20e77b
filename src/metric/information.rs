//! Information-theoretic measures, built on a joint intensity histogram.
//!
//! Intensities of each volume are binned independently over their own
//! `[min, max]` range into a fixed number of equally wide bins, the last
//! bin being closed on the right. A constant volume has its range widened
//! to `[v - 0.5, v + 0.5]`, so that all of its voxels fall into one bin.
//! `NaN` voxels are left out of the histogram. Entropies are in nats.
use super::{CostFunction, Score, DEFAULT_BINS};
use ndarray::{Array2, ArrayView3, Axis, Zip};

/// The result of a mutual information evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutualInformation {
    /// Mutual information, `H(A) + H(B) - H(A,B)`.
    pub value: f64,
    /// Joint histogram counts, indexed by `[reference bin, moving bin]`.
    pub joint_histogram: Array2<f64>,
    /// Marginal entropies `[H(A), H(B)]`.
    pub marginal_entropies: [f64; 2],
    /// Joint entropy `H(A,B)`.
    pub joint_entropy: f64,
}

/// Mutual information cost function.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MutualInformationCost {
    bins: usize,
}

impl MutualInformationCost {
    /// Create the cost function with the given number of bins per axis
    /// (at least one bin is always used).
    pub fn new(bins: usize) -> Self {
        MutualInformationCost { bins: bins.max(1) }
    }
}

impl Default for MutualInformationCost {
    fn default() -> Self {
        MutualInformationCost::new(DEFAULT_BINS)
    }
}

impl CostFunction for MutualInformationCost {
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score {
        Score::MutualInformation(mi(reference, moving, self.bins))
    }
}

/// Normalized mutual information, `(H(A) + H(B)) / H(A,B)`, ranging from
/// 1 (independent) to 2 (identical).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NormalizedMutualInformation {
    bins: usize,
}

impl NormalizedMutualInformation {
    /// Create the cost function with the given number of bins per axis
    /// (at least one bin is always used).
    pub fn new(bins: usize) -> Self {
        NormalizedMutualInformation { bins: bins.max(1) }
    }
}

impl Default for NormalizedMutualInformation {
    fn default() -> Self {
        NormalizedMutualInformation::new(DEFAULT_BINS)
    }
}

impl CostFunction for NormalizedMutualInformation {
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score {
        Score::Scalar(nmi(reference, moving, self.bins))
    }
}

/// Compute the mutual information between two volumes, along with the
/// intermediate histogram and entropies. The value is `NaN` when no voxel
/// pair could be binned.
pub fn mi(a: ArrayView3<f64>, b: ArrayView3<f64>, bins: usize) -> MutualInformation {
    let joint_histogram = joint_histogram(a, b, bins);
    let total = joint_histogram.sum();
    if total == 0. {
        return MutualInformation {
            value: f64::NAN,
            joint_histogram,
            marginal_entropies: [f64::NAN; 2],
            joint_entropy: f64::NAN,
        };
    }
    let ha = entropy(joint_histogram.sum_axis(Axis(1)).iter(), total);
    let hb = entropy(joint_histogram.sum_axis(Axis(0)).iter(), total);
    let hab = entropy(joint_histogram.iter(), total);
    MutualInformation {
        value: ha + hb - hab,
        joint_histogram,
        marginal_entropies: [ha, hb],
        joint_entropy: hab,
    }
}

/// Compute the normalized mutual information between two volumes. `NaN`
/// if the joint entropy is zero.
pub fn nmi(a: ArrayView3<f64>, b: ArrayView3<f64>, bins: usize) -> f64 {
    let info = mi(a, b, bins);
    if info.joint_entropy == 0. {
        return f64::NAN;
    }
    (info.marginal_entropies[0] + info.marginal_entropies[1]) / info.joint_entropy
}

/// Build the `bins × bins` joint histogram of two equally shaped volumes.
pub fn joint_histogram(a: ArrayView3<f64>, b: ArrayView3<f64>, bins: usize) -> Array2<f64> {
    let bins = bins.max(1);
    let mut hist = Array2::zeros((bins, bins));
    let (ra, rb) = match (BinRange::of(&a, bins), BinRange::of(&b, bins)) {
        (Some(ra), Some(rb)) => (ra, rb),
        _ => return hist,
    };
    Zip::from(&a).and(&b).for_each(|&x, &y| {
        if x.is_nan() || y.is_nan() {
            return;
        }
        hist[[ra.bin(x), rb.bin(y)]] += 1.;
    });
    hist
}

#[derive(Debug, Copy, Clone)]
struct BinRange {
    lo: f64,
    width: f64,
    bins: usize,
}

impl BinRange {
    fn of(v: &ArrayView3<f64>, bins: usize) -> Option<Self> {
        let (lo, hi) = v
            .iter()
            .filter(|x| !x.is_nan())
            .fold(None, |acc: Option<(f64, f64)>, &x| match acc {
                None => Some((x, x)),
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
            })?;
        let (lo, hi) = if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) };
        Some(BinRange {
            lo,
            width: (hi - lo) / bins as f64,
            bins,
        })
    }

    fn bin(&self, x: f64) -> usize {
        let idx = ((x - self.lo) / self.width).floor();
        if idx <= 0. {
            0
        } else {
            (idx as usize).min(self.bins - 1)
        }
    }
}

fn entropy<'a, I>(counts: I, total: f64) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    -counts
        .into_iter()
        .filter(|&&c| c > 0.)
        .map(|&c| {
            let p = c / total;
            p * p.ln()
        })
        .sum::<f64>()
}
