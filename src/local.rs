//! Local similarity: the average of a similarity measure evaluated over
//! every volume-of-interest window of a volume pair.
//!
//! Windows in which either volume is entirely zero (background) are
//! skipped. The remaining window scores are gathered into a
//! [`CostVector`], whose `NaN`-ignoring mean is the local similarity.
//!
//! The scan is split into slabs along the first axis. Slabs can be scored
//! on the `rayon` thread pool; their scores are concatenated in slab
//! order, so the outcome does not depend on whether the scan ran in
//! parallel.
//!
//! [`CostVector`]: ../stats/struct.CostVector.html
use crate::error::{CostError, Result};
use crate::metric::{Metric, DEFAULT_BINS};
use crate::progress::{NoProgress, ProgressSink};
use crate::stats::CostVector;
use crate::volume::Volume;
use crate::window::{is_background, VoiGrid};
use ndarray::ArrayView3;
use rayon::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Configurable local similarity measurement.
#[derive(Clone)]
pub struct LocalSimilarity<'p> {
    metric: Metric,
    voi_size: usize,
    bins: usize,
    parallel: bool,
    progress: &'p dyn ProgressSink,
}

impl fmt::Debug for LocalSimilarity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LocalSimilarity")
            .field("metric", &self.metric)
            .field("voi_size", &self.voi_size)
            .field("bins", &self.bins)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl LocalSimilarity<'static> {
    /// Measure `metric` over windows of `voi_size³` voxels, in parallel and
    /// without progress reporting.
    pub fn new(metric: Metric, voi_size: usize) -> Self {
        LocalSimilarity {
            metric,
            voi_size,
            bins: DEFAULT_BINS,
            parallel: true,
            progress: &NoProgress,
        }
    }
}

impl<'p> LocalSimilarity<'p> {
    /// Set the number of histogram bins of the information-based metrics.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Whether to score slabs on the `rayon` thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Report scan progress to the given sink.
    pub fn with_progress<'q>(self, progress: &'q dyn ProgressSink) -> LocalSimilarity<'q> {
        LocalSimilarity {
            metric: self.metric,
            voi_size: self.voi_size,
            bins: self.bins,
            parallel: self.parallel,
            progress,
        }
    }

    /// The metric being measured.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Score every non-background window of the volume pair.
    ///
    /// # Errors
    ///
    /// - `CostError::ShapeMismatch` if the volumes differ in shape.
    /// - `CostError::InvalidVoiSize` if the VOI size is zero.
    pub fn cost_vector(
        &self,
        reference: ArrayView3<f64>,
        moving: ArrayView3<f64>,
    ) -> Result<CostVector> {
        if reference.shape() != moving.shape() {
            return Err(CostError::ShapeMismatch {
                reference: reference.shape().to_vec(),
                moving: moving.shape().to_vec(),
            });
        }
        let grid = VoiGrid::new(reference.shape(), self.voi_size)?;
        let total = grid.len() as u64;
        let slab_len = (grid.range(1).len() * grid.range(2).len()) as u64;
        let tracker = SlabProgress::new(self.progress, total);

        let score_slab = |i: usize| -> Vec<f64> {
            let scores: Vec<f64> = grid
                .slab_origins(i)
                .filter_map(|origin| {
                    self.score_window(grid.window(&reference, origin), grid.window(&moving, origin))
                })
                .collect();
            tracker.advance(slab_len);
            scores
        };

        let slabs: Vec<Vec<f64>> = if self.parallel {
            grid.range(0).into_par_iter().map(score_slab).collect()
        } else {
            grid.range(0).map(score_slab).collect()
        };
        tracker.finish();

        let mut costs = CostVector::new();
        for slab in slabs {
            costs.extend(slab);
        }
        tracing::debug!(
            metric = %self.metric,
            windows = total,
            scored = costs.len(),
            "local scan finished"
        );
        Ok(costs)
    }

    /// Compute the local similarity of the volume pair.
    ///
    /// # Errors
    ///
    /// As in [`cost_vector`](#method.cost_vector), plus
    /// `CostError::EmptyCostVector` if no window produced a score other
    /// than `NaN`.
    pub fn compute(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Result<f64> {
        let value = self.cost_vector(reference, moving)?.nan_mean()?;
        tracing::info!(metric = %self.metric, value, "local similarity computed");
        Ok(value)
    }

    fn score_window(&self, reference: ArrayView3<f64>, moving: ArrayView3<f64>) -> Option<f64> {
        if is_background(&reference) || is_background(&moving) {
            return None;
        }
        let score = self.metric.evaluate(reference, moving, self.bins);
        Some(self.metric.local_value(&score))
    }
}

/// Shared completion counter of a scan.
///
/// Workers never wait on the sink: a worker finding another one reporting
/// leaves its count for the next report. Reports are strictly increasing,
/// and `finish` sends the final `(total, total)` if no worker did.
struct SlabProgress<'p> {
    sink: &'p dyn ProgressSink,
    total: u64,
    done: AtomicU64,
    reported: Mutex<Option<u64>>,
}

impl<'p> SlabProgress<'p> {
    fn new(sink: &'p dyn ProgressSink, total: u64) -> Self {
        SlabProgress {
            sink,
            total,
            done: AtomicU64::new(0),
            reported: Mutex::new(None),
        }
    }

    fn advance(&self, windows: u64) {
        let _ = self.done.fetch_add(windows, Ordering::AcqRel);
        if let Ok(mut reported) = self.reported.try_lock() {
            self.report(&mut reported);
        }
    }

    fn finish(&self) {
        let mut reported = match self.reported.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.report(&mut reported);
    }

    fn report(&self, reported: &mut Option<u64>) {
        let done = self.done.load(Ordering::Acquire);
        if reported.map_or(true, |last| done > last) {
            *reported = Some(done);
            self.sink.update(done, self.total);
        }
    }
}

/// Compute the local similarity between two volumes with the default
/// settings of [`LocalSimilarity`](struct.LocalSimilarity.html).
pub fn compute_local_similarity(
    reference: &Volume,
    moving: &Volume,
    metric: Metric,
    voi_size: usize,
) -> Result<f64> {
    LocalSimilarity::new(metric, voi_size).compute(reference.view(), moving.view())
}
