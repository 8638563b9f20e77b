//! Types for error handling go here.
use nifti::NiftiError;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all errors emitted by this library.
    #[derive(Debug)]
    pub enum CostError {
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
        /// The file could not be decoded as a NIfTI volume.
        Nifti(err: NiftiError) {
            from()
            source(err)
            display("could not decode NIfTI file: {}", err)
        }
        /// The volume file does not exist.
        MissingFile(path: PathBuf) {
            display("no such volume file: {}", path.display())
        }
        /// The volume does not have exactly three (non-singleton) dimensions.
        NotThreeDimensional(shape: Vec<usize>) {
            display("expected a 3-D volume, found shape {:?}", shape)
        }
        /// The two volumes (or a volume and its mask) do not have the same shape.
        ShapeMismatch { reference: Vec<usize>, moving: Vec<usize> } {
            display("image shape mismatch: {:?} vs {:?}", reference, moving)
        }
        /// The metric identifier is not one of `ssd`, `cc`, `ncc`, `mi` or `nmi`.
        UnknownMetric(name: String) {
            display("cost function `{}` is not defined", name)
        }
        /// The volume of interest must span at least one voxel.
        InvalidVoiSize(size: usize) {
            display("invalid volume of interest size {}", size)
        }
        /// Every window was skipped or scored NaN, so there is nothing to average.
        EmptyCostVector {
            display("no finite local cost values to average")
        }
    }
}

/// Alias type for results originating from this crate.
pub type Result<T> = ::std::result::Result<T, CostError>;
