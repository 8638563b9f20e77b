//! Registration quality checks for 3-D neuroimaging volumes.
//!
//! After a volume has been registered to a template (or co-registered to
//! another volume of the same subject), this crate measures how well the
//! two line up by evaluating a similarity measure between their voxel
//! intensities, either over the whole volumes (global similarity) or as
//! the average over small cubic windows scanned across them (local
//! similarity).
//!
//! # Example
//!
//! ```no_run
//! use regcost::{check_against_template, CheckOptions, Metric};
//! # use regcost::error::Result;
//!
//! # fn run() -> Result<()> {
//! let options = CheckOptions::new("nmi".parse::<Metric>()?)
//!     .with_voi_size(3)
//!     .with_masking(true);
//! let (global, local) =
//!     check_against_template("/usr/share/fsl/data/standard", "sub-01_T1w_mni.nii.gz", &options)?
//!         .into_pair();
//! println!("global: {:?}, local: {:?}", global, local);
//! # Ok(())
//! # }
//! ```
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use]
extern crate quick_error;

pub mod check;
pub mod error;
pub mod global;
pub mod local;
pub mod metric;
pub mod progress;
pub mod stats;
pub mod volume;
pub mod window;

pub use crate::check::{
    check_against_reference, check_against_template, compare_volumes, CheckOptions, Comparison,
};
pub use crate::error::{CostError, Result};
pub use crate::global::compute_global_similarity;
pub use crate::local::{compute_local_similarity, LocalSimilarity};
pub use crate::metric::{CostFunction, Metric, Score};
pub use crate::progress::{BarProgress, NoProgress, ProgressSink};
pub use crate::stats::CostVector;
pub use crate::volume::{load_volume, Volume};
pub use crate::window::VoiGrid;
