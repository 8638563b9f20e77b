//! This module defines the similarity measures ("cost functions") that can
//! be evaluated between a reference and a moving volume, or between two
//! corresponding windows of them.
//!
//! The measure to use is selected through [`Metric`], a closed set of
//! identifiers which can be parsed from the usual short names:
//!
//! | name  | measure                                   |
//! |-------|-------------------------------------------|
//! | `ssd` | sum of squared differences                |
//! | `cc`  | cross-correlation (Pearson)               |
//! | `ncc` | rank cross-correlation (Spearman)         |
//! | `mi`  | mutual information                        |
//! | `nmi` | normalized mutual information             |
//!
//! All measures are total functions: inputs for which a measure is not
//! defined (such as a constant block under correlation) produce `NaN`
//! rather than an error.
//!
//! [`Metric`]: ./enum.Metric.html

pub mod correlation;
pub mod information;
pub mod ssd;

pub use self::correlation::{CrossCorrelation, RankCrossCorrelation};
pub use self::information::{
    MutualInformation, MutualInformationCost, NormalizedMutualInformation,
};
pub use self::ssd::SumOfSquaredDifferences;

use crate::error::CostError;
use ndarray::ArrayView3;
use std::fmt;
use std::str::FromStr;

/// Default number of intensity bins per axis of the joint histogram.
pub const DEFAULT_BINS: usize = 32;

/// The outcome of evaluating a cost function.
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    /// A plain scalar score.
    Scalar(f64),
    /// Mutual information, along with the histogram and entropies it was
    /// derived from.
    MutualInformation(MutualInformation),
}

impl Score {
    /// The scalar part of the score.
    pub fn value(&self) -> f64 {
        match self {
            Score::Scalar(v) => *v,
            Score::MutualInformation(mi) => mi.value,
        }
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Score::Scalar(value)
    }
}

/// A similarity measure between two equally shaped volumes.
pub trait CostFunction {
    /// Evaluate the measure. Both views must have the same shape.
    fn evaluate(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Score;
}

/// Identifier of one of the supported similarity measures.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Sum of squared differences
    Ssd,
    /// Cross-correlation
    Cc,
    /// Rank (Spearman) cross-correlation
    RankCc,
    /// Mutual information
    Mi,
    /// Normalized mutual information
    Nmi,
}

impl Metric {
    /// All supported metrics.
    pub const ALL: [Metric; 5] = [Metric::Ssd, Metric::Cc, Metric::RankCc, Metric::Mi, Metric::Nmi];

    /// The short name of the metric, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Metric::Ssd => "ssd",
            Metric::Cc => "cc",
            Metric::RankCc => "ncc",
            Metric::Mi => "mi",
            Metric::Nmi => "nmi",
        }
    }

    /// Evaluate the metric, using `bins` intensity bins for the
    /// histogram-based measures.
    pub fn evaluate(
        self,
        reference: ArrayView3<f64>,
        moving: ArrayView3<f64>,
        bins: usize,
    ) -> Score {
        match self {
            Metric::Ssd => SumOfSquaredDifferences.evaluate(reference, moving),
            Metric::Cc => CrossCorrelation.evaluate(reference, moving),
            Metric::RankCc => RankCrossCorrelation.evaluate(reference, moving),
            Metric::Mi => MutualInformationCost::new(bins).evaluate(reference, moving),
            Metric::Nmi => NormalizedMutualInformation::new(bins).evaluate(reference, moving),
        }
    }

    /// Reduce a score to the value accumulated by the local (windowed)
    /// measurement. Rank correlation contributes its magnitude only.
    pub fn local_value(self, score: &Score) -> f64 {
        match self {
            Metric::RankCc => score.value().abs(),
            _ => score.value(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = CostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Metric::ALL
            .iter()
            .copied()
            .find(|m| m.name() == name)
            .ok_or_else(|| CostError::UnknownMetric(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Metric, Score, DEFAULT_BINS};
    use crate::error::CostError;
    use approx::assert_abs_diff_eq;
    use ndarray::Array3;

    #[test]
    fn parse_names() {
        assert_eq!("ssd".parse::<Metric>().unwrap(), Metric::Ssd);
        assert_eq!("cc".parse::<Metric>().unwrap(), Metric::Cc);
        assert_eq!("ncc".parse::<Metric>().unwrap(), Metric::RankCc);
        assert_eq!(" MI ".parse::<Metric>().unwrap(), Metric::Mi);
        assert_eq!("nmi".parse::<Metric>().unwrap(), Metric::Nmi);
        for m in Metric::ALL.iter() {
            assert_eq!(m.to_string().parse::<Metric>().unwrap(), *m);
        }
    }

    #[test]
    fn unknown_name() {
        match "mse".parse::<Metric>() {
            Err(CostError::UnknownMetric(name)) => assert_eq!(name, "mse"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn rank_correlation_is_absolute_locally() {
        let a = Array3::from_shape_fn((2, 2, 2), |(i, j, k)| (i * 4 + j * 2 + k) as f64);
        let b = a.mapv(|v| -v);
        let score = Metric::RankCc.evaluate(a.view(), b.view(), DEFAULT_BINS);
        assert_abs_diff_eq!(score.value(), -1., epsilon = 1e-12);
        assert_abs_diff_eq!(Metric::RankCc.local_value(&score), 1., epsilon = 1e-12);
        let cc = Metric::Cc.evaluate(a.view(), b.view(), DEFAULT_BINS);
        assert_abs_diff_eq!(Metric::Cc.local_value(&cc), -1., epsilon = 1e-12);
    }

    #[test]
    fn mutual_information_keeps_histogram() {
        let a = Array3::from_shape_fn((2, 2, 2), |(i, _, _)| i as f64);
        match Metric::Mi.evaluate(a.view(), a.view(), 4) {
            Score::MutualInformation(mi) => {
                assert_eq!(mi.joint_histogram.dim(), (4, 4));
                assert_abs_diff_eq!(mi.value, 2f64.ln(), epsilon = 1e-12);
            }
            other => panic!("unexpected score {:?}", other),
        }
    }
}
