//! Accumulation of per-window scores.
use crate::error::{CostError, Result};

/// Append-only sequence of per-window scores gathered during a scan.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CostVector {
    values: Vec<f64>,
}

impl CostVector {
    /// Create an empty cost vector.
    pub fn new() -> Self {
        CostVector::default()
    }

    /// Append a score.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// Number of scores, including `NaN` entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no score was gathered.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of scores which are not `NaN`. Infinite scores are counted,
    /// as they take part in the mean.
    pub fn non_nan_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }

    /// The gathered scores, in insertion order.
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Arithmetic mean of the scores, ignoring `NaN` entries.
    ///
    /// # Errors
    ///
    /// - `CostError::EmptyCostVector` if there is no score left to average.
    pub fn nan_mean(&self) -> Result<f64> {
        let (sum, n) = self
            .values
            .iter()
            .filter(|v| !v.is_nan())
            .fold((0., 0usize), |(sum, n), &v| (sum + v, n + 1));
        if n == 0 {
            return Err(CostError::EmptyCostVector);
        }
        Ok(sum / n as f64)
    }
}

impl Extend<f64> for CostVector {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl From<Vec<f64>> for CostVector {
    fn from(values: Vec<f64>) -> Self {
        CostVector { values }
    }
}
