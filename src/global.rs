//! Global similarity: a similarity measure evaluated once over the two
//! whole volumes.
use crate::error::{CostError, Result};
use crate::metric::{Metric, Score, DEFAULT_BINS};
use crate::volume::Volume;
use ndarray::ArrayView3;

/// Evaluate `metric` over the two whole volumes, keeping the full score
/// (including the histogram of mutual information).
///
/// # Errors
///
/// - `CostError::ShapeMismatch` if the volumes differ in shape.
pub fn global_score(
    reference: ArrayView3<f64>,
    moving: ArrayView3<f64>,
    metric: Metric,
    bins: usize,
) -> Result<Score> {
    if reference.shape() != moving.shape() {
        return Err(CostError::ShapeMismatch {
            reference: reference.shape().to_vec(),
            moving: moving.shape().to_vec(),
        });
    }
    let score = metric.evaluate(reference, moving, bins);
    tracing::info!(metric = %metric, value = score.value(), "global similarity computed");
    Ok(score)
}

/// Compute the global similarity between two volumes. Unlike the local
/// measurement, the rank correlation keeps its sign here.
pub fn compute_global_similarity(
    reference: &Volume,
    moving: &Volume,
    metric: Metric,
) -> Result<f64> {
    global_score(reference.view(), moving.view(), metric, DEFAULT_BINS).map(|s| s.value())
}
