//! Grid of volume-of-interest (VOI) windows scanned by the local
//! similarity measurement.
//!
//! A window is a cubic block of `voi_size³` voxels identified by its
//! origin, the voxel with the lowest coordinates. Origins run over
//! `0..extent - voi_size` on every axis, so that no window crosses the
//! volume boundary. Note that the upper bound is exclusive: the last
//! origin that would still fit (`extent - voi_size`) is never visited.
use crate::error::{CostError, Result};
use ndarray::{s, ArrayBase, ArrayView3, Data, Ix3};
use std::ops::Range;

/// Origin of a window, in voxel index coordinates.
pub type Origin = [usize; 3];

/// The set of window origins for a given volume shape and VOI size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiGrid {
    ranges: [Range<usize>; 3],
    voi_size: usize,
}

impl VoiGrid {
    /// Create the window grid of a volume with the given shape.
    ///
    /// A VOI size at least as large as one of the extents is not an error,
    /// it merely produces an empty grid.
    ///
    /// # Errors
    ///
    /// - `CostError::InvalidVoiSize` if `voi_size` is zero.
    pub fn new(shape: &[usize], voi_size: usize) -> Result<Self> {
        if voi_size == 0 {
            return Err(CostError::InvalidVoiSize(voi_size));
        }
        if shape.len() != 3 {
            return Err(CostError::NotThreeDimensional(shape.to_vec()));
        }
        let range = |extent: usize| 0..extent.saturating_sub(voi_size);
        Ok(VoiGrid {
            ranges: [range(shape[0]), range(shape[1]), range(shape[2])],
            voi_size,
        })
    }

    /// The edge length of each window.
    pub fn voi_size(&self) -> usize {
        self.voi_size
    }

    /// The range of origins along the given axis.
    pub fn range(&self, axis: usize) -> Range<usize> {
        self.ranges[axis].clone()
    }

    /// Total number of windows in the grid.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|r| r.len()).product()
    }

    /// Whether the grid contains no windows at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over all origins in row-major order.
    pub fn origins(&self) -> impl Iterator<Item = Origin> + '_ {
        self.range(0).flat_map(move |i| self.slab_origins(i))
    }

    /// Iterate over the origins whose first coordinate is `i`.
    pub fn slab_origins(&self, i: usize) -> impl Iterator<Item = Origin> + '_ {
        let (ry, rz) = (self.range(1), self.range(2));
        ry.flat_map(move |j| rz.clone().map(move |k| [i, j, k]))
    }

    /// Obtain a view of the window at `origin`, without copying.
    ///
    /// # Panic
    ///
    /// Panics if the window does not fit in `volume`.
    pub fn window<'a, S>(
        &self,
        volume: &'a ArrayBase<S, Ix3>,
        origin: Origin,
    ) -> ArrayView3<'a, f64>
    where
        S: Data<Elem = f64>,
    {
        let [i, j, k] = origin;
        let n = self.voi_size;
        volume.slice(s![i..i + n, j..j + n, k..k + n])
    }
}

/// Whether every voxel of the window is zero.
pub fn is_background(window: &ArrayView3<f64>) -> bool {
    window.iter().all(|&v| v == 0.)
}

#[cfg(test)]
mod tests {
    use super::{is_background, VoiGrid};
    use crate::error::CostError;
    use ndarray::Array3;

    #[test]
    fn grid_is_one_short_on_each_axis() {
        let grid = VoiGrid::new(&[5, 6, 7], 3).unwrap();
        assert_eq!(grid.range(0), 0..2);
        assert_eq!(grid.range(1), 0..3);
        assert_eq!(grid.range(2), 0..4);
        assert_eq!(grid.len(), 24);
        assert_eq!(grid.origins().count(), 24);
        assert!(grid.origins().all(|[i, j, k]| i < 2 && j < 3 && k < 4));
    }

    #[test]
    fn origins_in_row_major_order() {
        let grid = VoiGrid::new(&[3, 3, 4], 1).unwrap();
        let origins: Vec<_> = grid.origins().take(4).collect();
        assert_eq!(origins, vec![[0, 0, 0], [0, 0, 1], [0, 0, 2], [0, 1, 0]]);
    }

    #[test]
    fn oversized_voi_gives_empty_grid() {
        let grid = VoiGrid::new(&[4, 4, 4], 4).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.origins().count(), 0);

        let grid = VoiGrid::new(&[4, 4, 4], 9).unwrap();
        assert!(grid.is_empty());
    }

    #[test]
    fn zero_voi_is_rejected() {
        assert!(matches!(
            VoiGrid::new(&[4, 4, 4], 0),
            Err(CostError::InvalidVoiSize(0))
        ));
    }

    #[test]
    fn window_view() {
        let volume = Array3::from_shape_fn((4, 4, 4), |(i, j, k)| (i * 16 + j * 4 + k) as f64);
        let grid = VoiGrid::new(volume.shape(), 2).unwrap();
        let w = grid.window(&volume, [1, 2, 0]);
        assert_eq!(w.shape(), &[2, 2, 2]);
        assert_eq!(w[[0, 0, 0]], volume[[1, 2, 0]]);
        assert_eq!(w[[1, 1, 1]], volume[[2, 3, 1]]);
    }

    #[test]
    fn background() {
        let mut volume = Array3::<f64>::zeros((3, 3, 3));
        let grid = VoiGrid::new(volume.shape(), 2).unwrap();
        assert!(is_background(&grid.window(&volume, [0, 0, 0])));
        volume[[1, 1, 1]] = -0.5;
        assert!(!is_background(&grid.window(&volume, [0, 0, 0])));
    }
}
