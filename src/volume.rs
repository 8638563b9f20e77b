//! This module defines the voxel volume type compared by this crate, as
//! well as the functions for reading volumes from NIfTI files and for
//! restricting them to a brain mask.
//!
//! Volumes are read through the `nifti` crate and converted into an
//! `ndarray` of `f64`, with the affine intensity scaling of the file
//! (`scl_slope` and `scl_inter`) already applied.

use crate::error::{CostError, Result};
use ndarray::{Array3, ArrayD, Ix3};
use nifti::{IntoNdArray, NiftiError, NiftiObject, ReaderOptions};
use std::io;
use std::path::{Path, PathBuf};

/// A dense 3-D volume of voxel intensities.
pub type Volume = Array3<f64>;

/// File name of the whole-brain template inside a template directory.
pub const TEMPLATE_FILE_NAME: &str = "MNI152_T1_1mm.nii.gz";

/// File name of the template's brain mask inside a template directory.
pub const TEMPLATE_MASK_FILE_NAME: &str = "MNI152_T1_1mm_brain_mask.nii.gz";

/// Obtain the paths to the standard template and its brain mask, in this
/// order, within the given directory.
pub fn template_paths<P: AsRef<Path>>(template_dir: P) -> (PathBuf, PathBuf) {
    let dir = template_dir.as_ref();
    (
        dir.join(TEMPLATE_FILE_NAME),
        dir.join(TEMPLATE_MASK_FILE_NAME),
    )
}

/// Read a 3-D volume from a NIfTI file (".nii" or ".nii.gz").
///
/// # Errors
///
/// - `CostError::MissingFile` if there is no file at `path`.
/// - `CostError::Nifti` if the file cannot be decoded.
/// - `CostError::NotThreeDimensional` if the volume does not have exactly
///   three axes once trailing singleton axes are dropped.
pub fn load_volume<P: AsRef<Path>>(path: P) -> Result<Volume> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CostError::MissingFile(path.to_path_buf()));
    }
    let obj = ReaderOptions::new().read_file(path).map_err(|e| match e {
        NiftiError::Io(ref io_e) if io_e.kind() == io::ErrorKind::NotFound => {
            CostError::MissingFile(path.to_path_buf())
        }
        e => CostError::Nifti(e),
    })?;
    let data = obj.into_volume().into_ndarray::<f64>()?;
    let volume = into_volume(data)?;
    tracing::debug!(path = %path.display(), shape = ?volume.shape(), "loaded volume");
    Ok(volume)
}

/// Convert an array of arbitrary rank into a 3-D volume, dropping any
/// trailing axes of length 1 (e.g. a single-frame 4-D series).
pub fn into_volume(data: ArrayD<f64>) -> Result<Volume> {
    let mut data = data;
    while data.ndim() > 3 && data.shape()[data.ndim() - 1] == 1 {
        let last = data.ndim() - 1;
        data = data.index_axis_move(ndarray::Axis(last), 0);
    }
    let shape = data.shape().to_vec();
    data.into_dimensionality::<Ix3>()
        .map_err(|_| CostError::NotThreeDimensional(shape))
}

/// Multiply a volume by a mask of the same shape, voxel by voxel.
///
/// # Errors
///
/// - `CostError::ShapeMismatch` if the mask does not have the volume's shape.
pub fn apply_mask(volume: &Volume, mask: &Volume) -> Result<Volume> {
    if volume.shape() != mask.shape() {
        return Err(CostError::ShapeMismatch {
            reference: volume.shape().to_vec(),
            moving: mask.shape().to_vec(),
        });
    }
    Ok(volume * mask)
}

#[cfg(test)]
mod tests {
    use super::{apply_mask, into_volume, template_paths};
    use crate::error::CostError;
    use ndarray::{Array, Array3, IxDyn};
    use std::path::Path;

    #[test]
    fn template_pair() {
        let (reference, mask) = template_paths("/opt/fsl/data/standard");
        assert_eq!(
            reference,
            Path::new("/opt/fsl/data/standard/MNI152_T1_1mm.nii.gz")
        );
        assert_eq!(
            mask,
            Path::new("/opt/fsl/data/standard/MNI152_T1_1mm_brain_mask.nii.gz")
        );
    }

    #[test]
    fn squeeze_trailing_singletons() {
        let data = Array::<f64, _>::zeros(IxDyn(&[4, 5, 6, 1]));
        let volume = into_volume(data).unwrap();
        assert_eq!(volume.shape(), &[4, 5, 6]);
    }

    #[test]
    fn reject_non_3d() {
        let data = Array::<f64, _>::zeros(IxDyn(&[4, 5]));
        match into_volume(data) {
            Err(CostError::NotThreeDimensional(shape)) => assert_eq!(shape, vec![4, 5]),
            other => panic!("unexpected result {:?}", other),
        }

        let data = Array::<f64, _>::zeros(IxDyn(&[4, 5, 6, 2]));
        assert!(matches!(
            into_volume(data),
            Err(CostError::NotThreeDimensional(_))
        ));
    }

    #[test]
    fn mask_zeroes_voxels() {
        let volume = Array3::from_elem((2, 2, 2), 3.);
        let mut mask = Array3::from_elem((2, 2, 2), 1.);
        mask[[0, 0, 0]] = 0.;
        let masked = apply_mask(&volume, &mask).unwrap();
        assert_eq!(masked[[0, 0, 0]], 0.);
        assert_eq!(masked[[1, 1, 1]], 3.);
        assert_eq!(masked.sum(), 21.);
    }

    #[test]
    fn mask_shape_mismatch() {
        let volume = Array3::<f64>::zeros((2, 2, 2));
        let mask = Array3::<f64>::zeros((2, 2, 3));
        match apply_mask(&volume, &mask) {
            Err(CostError::ShapeMismatch { reference, moving }) => {
                assert_eq!(reference, vec![2, 2, 2]);
                assert_eq!(moving, vec![2, 2, 3]);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
