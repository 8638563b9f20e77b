#![allow(dead_code)]

use ndarray::{Array3, ArrayD};
use nifti::writer::WriterOptions;
use std::path::{Path, PathBuf};

/// A volume with enough texture that no 3x3x3 window is constant.
pub fn textured(shape: (usize, usize, usize)) -> Array3<f64> {
    Array3::from_shape_fn(shape, |(i, j, k)| {
        10. + ((i * 7 + j * 3 + k * 5) % 11) as f64
    })
}

/// A slightly misaligned copy of `textured`, shifted by one voxel along
/// the first axis.
pub fn shifted(shape: (usize, usize, usize)) -> Array3<f64> {
    Array3::from_shape_fn(shape, |(i, j, k)| {
        10. + (((i + 1) * 7 + j * 3 + k * 5) % 11) as f64
    })
}

/// Write a volume into a NIfTI file inside `dir`, returning its path.
pub fn write_volume(dir: &Path, name: &str, data: &Array3<f64>) -> PathBuf {
    write_array(dir, name, &data.clone().into_dyn())
}

/// Write an array of any rank into a NIfTI file inside `dir`.
pub fn write_array(dir: &Path, name: &str, data: &ArrayD<f64>) -> PathBuf {
    let path = dir.join(name);
    WriterOptions::new(&path)
        .write_nifti(data)
        .expect("could not write test volume");
    path
}
