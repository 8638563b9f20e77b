//! Registration checks: the comparison of a moving volume against either
//! the standard template or another reference volume.
//!
//! Both entry points load the volumes, verify that their shapes agree, and
//! then run the global and/or local measurements requested in
//! [`CheckOptions`]. The result is a [`Comparison`], holding at most one
//! value per measurement.
//!
//! Only [`check_against_template`] honours the masking flag, using the
//! template's brain mask. [`check_against_reference`] has no mask to apply
//! and ignores the flag.
//!
//! [`CheckOptions`]: ./struct.CheckOptions.html
//! [`Comparison`]: ./struct.Comparison.html
//! [`check_against_template`]: ./fn.check_against_template.html
//! [`check_against_reference`]: ./fn.check_against_reference.html
use crate::error::{CostError, Result};
use crate::global::global_score;
use crate::local::LocalSimilarity;
use crate::metric::{Metric, DEFAULT_BINS};
use crate::progress::{NoProgress, ProgressSink};
use crate::volume::{apply_mask, load_volume, template_paths, Volume};
use std::fmt;
use std::path::Path;

/// Default edge length of the local measurement windows.
pub const DEFAULT_VOI_SIZE: usize = 3;

/// Options of a registration check.
///
/// # Example
///
/// ```
/// use regcost::{CheckOptions, Metric};
///
/// let options = CheckOptions::new(Metric::Nmi)
///     .with_voi_size(5)
///     .with_masking(true)
///     .with_global(false);
/// assert!(options.local());
/// ```
#[derive(Clone)]
pub struct CheckOptions<'p> {
    metric: Metric,
    voi_size: usize,
    masking: bool,
    global: bool,
    local: bool,
    bins: usize,
    parallel: bool,
    progress: &'p dyn ProgressSink,
}

impl fmt::Debug for CheckOptions<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("CheckOptions")
            .field("metric", &self.metric)
            .field("voi_size", &self.voi_size)
            .field("masking", &self.masking)
            .field("global", &self.global)
            .field("local", &self.local)
            .field("bins", &self.bins)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl CheckOptions<'static> {
    /// Options measuring `metric` both globally and locally, with
    /// windows of [`DEFAULT_VOI_SIZE`](constant.DEFAULT_VOI_SIZE.html)
    /// voxels and no masking.
    pub fn new(metric: Metric) -> Self {
        CheckOptions {
            metric,
            voi_size: DEFAULT_VOI_SIZE,
            masking: false,
            global: true,
            local: true,
            bins: DEFAULT_BINS,
            parallel: true,
            progress: &NoProgress,
        }
    }
}

impl<'p> CheckOptions<'p> {
    /// Set the edge length of the local measurement windows.
    pub fn with_voi_size(mut self, voi_size: usize) -> Self {
        self.voi_size = voi_size;
        self
    }

    /// Whether to restrict the template check to the brain mask.
    pub fn with_masking(mut self, masking: bool) -> Self {
        self.masking = masking;
        self
    }

    /// Whether to compute the global similarity.
    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    /// Whether to compute the local similarity.
    pub fn with_local(mut self, local: bool) -> Self {
        self.local = local;
        self
    }

    /// Set the number of histogram bins of the information-based metrics.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Whether the local scan may run on the `rayon` thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Report local scan progress to the given sink.
    pub fn with_progress<'q>(self, progress: &'q dyn ProgressSink) -> CheckOptions<'q> {
        CheckOptions {
            metric: self.metric,
            voi_size: self.voi_size,
            masking: self.masking,
            global: self.global,
            local: self.local,
            bins: self.bins,
            parallel: self.parallel,
            progress,
        }
    }

    /// The metric to measure.
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// The edge length of the local measurement windows.
    pub fn voi_size(&self) -> usize {
        self.voi_size
    }

    /// Whether masking was requested.
    pub fn masking(&self) -> bool {
        self.masking
    }

    /// Whether the global similarity is requested.
    pub fn global(&self) -> bool {
        self.global
    }

    /// Whether the local similarity is requested.
    pub fn local(&self) -> bool {
        self.local
    }
}

/// Outcome of a registration check.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Comparison {
    /// The global similarity, if requested.
    pub global_cost: Vec<f64>,
    /// The local similarity, if requested.
    pub local_cost: Vec<f64>,
    /// Whether the comparison was abandoned because the volumes differ in
    /// shape.
    pub shape_mismatch: bool,
}

impl Comparison {
    /// Split into the `(global, local)` pair of result lists.
    pub fn into_pair(self) -> (Vec<f64>, Vec<f64>) {
        (self.global_cost, self.local_cost)
    }
}

/// Compare two volumes already in memory, optionally multiplying both by
/// `mask` first.
///
/// A shape mismatch between the two volumes is not an error: it produces a
/// comparison with no values and `shape_mismatch` set.
///
/// # Errors
///
/// - `CostError::ShapeMismatch` if the mask does not fit the reference.
/// - `CostError::InvalidVoiSize` and `CostError::EmptyCostVector` from the
///   local measurement.
pub fn compare_volumes(
    reference: Volume,
    moving: Volume,
    mask: Option<&Volume>,
    options: &CheckOptions,
) -> Result<Comparison> {
    let (reference, moving) = match mask {
        Some(mask) if moving.shape() == reference.shape() => {
            (apply_mask(&reference, mask)?, apply_mask(&moving, mask)?)
        }
        Some(mask) => (apply_mask(&reference, mask)?, moving),
        None => (reference, moving),
    };

    let mut comparison = Comparison::default();
    if reference.shape() != moving.shape() {
        tracing::warn!(
            reference = ?reference.shape(),
            moving = ?moving.shape(),
            "image shape mismatch"
        );
        comparison.shape_mismatch = true;
        return Ok(comparison);
    }

    if options.local {
        let local = LocalSimilarity::new(options.metric, options.voi_size)
            .with_bins(options.bins)
            .with_parallel(options.parallel)
            .with_progress(options.progress);
        comparison
            .local_cost
            .push(local.compute(reference.view(), moving.view())?);
    } else {
        tracing::info!("local similarity measure is not requested");
    }

    if options.global {
        let score = global_score(reference.view(), moving.view(), options.metric, options.bins)?;
        comparison.global_cost.push(score.value());
    } else {
        tracing::info!("global similarity measure is not requested");
    }

    Ok(comparison)
}

/// Check the registration of `moving_path` to the standard template found
/// in `template_dir`.
///
/// The template and its brain mask are loaded from the fixed file names
/// [`TEMPLATE_FILE_NAME`] and [`TEMPLATE_MASK_FILE_NAME`]. With masking
/// enabled, both the template and the moving volume are multiplied by the
/// mask before measuring.
///
/// # Errors
///
/// - Any error from loading the three volumes.
/// - The errors of [`compare_volumes`](fn.compare_volumes.html).
///
/// [`TEMPLATE_FILE_NAME`]: ../volume/constant.TEMPLATE_FILE_NAME.html
/// [`TEMPLATE_MASK_FILE_NAME`]: ../volume/constant.TEMPLATE_MASK_FILE_NAME.html
pub fn check_against_template<P, Q>(
    template_dir: P,
    moving_path: Q,
    options: &CheckOptions,
) -> Result<Comparison>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let (template_path, mask_path) = template_paths(template_dir);
    let reference = load_volume(&template_path)?;
    let mask = load_volume(&mask_path)?;
    let moving = load_volume(moving_path.as_ref())?;
    tracing::info!(
        reference = %template_path.display(),
        moving = %moving_path.as_ref().display(),
        metric = %options.metric,
        masking = options.masking,
        "checking registration to template"
    );

    let mask = if options.masking { Some(&mask) } else { None };
    compare_volumes(reference, moving, mask, options)
}

/// Check the co-registration of `moving_path` to the volume at
/// `reference_path` (e.g. a T2-weighted image to its T1-weighted
/// counterpart).
///
/// No brain mask is available on this path, so the masking flag of
/// `options` has no effect.
///
/// # Errors
///
/// - Any error from loading the two volumes.
/// - The errors of [`compare_volumes`](fn.compare_volumes.html).
pub fn check_against_reference<P, Q>(
    reference_path: P,
    moving_path: Q,
    options: &CheckOptions,
) -> Result<Comparison>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let reference = load_volume(reference_path.as_ref())?;
    let moving = load_volume(moving_path.as_ref())?;
    tracing::info!(
        reference = %reference_path.as_ref().display(),
        moving = %moving_path.as_ref().display(),
        metric = %options.metric,
        "checking co-registration"
    );
    if options.masking {
        tracing::debug!("masking is not available for co-registration checks, ignoring");
    }
    compare_volumes(reference, moving, None, options)
}

/// Parse a metric name, for callers holding the identifier as text.
///
/// # Errors
///
/// - `CostError::UnknownMetric` if the name is not recognised.
pub fn parse_metric(name: &str) -> Result<Metric> {
    name.parse::<Metric>().map_err(|e| match e {
        CostError::UnknownMetric(name) => {
            tracing::error!(name = %name, "cost function is not defined");
            CostError::UnknownMetric(name)
        }
        e => e,
    })
}
