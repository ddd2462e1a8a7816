//! Owned 2D grid in row-major layout, one row per zenith bin.
//!
//! `Grid<f64>` carries intensities (charge, window sums, first-hit times) and
//! `Grid<u32>` carries region labels; `0` means "no signal" / "no region" in
//! both. Dimensions are fixed at construction.
use crate::error::{Error, Result};
use crate::grid::traits::GridView;

#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    /// Number of zenith bins (rows)
    pub zenith: usize,
    /// Number of azimuth bins (columns)
    pub azimuth: usize,
    /// Backing storage, `zenith * azimuth` cells
    pub data: Vec<T>,
}

/// Intensity grid.
pub type ScalarGrid = Grid<f64>;
/// Region label map, `0` for background.
pub type LabelGrid = Grid<u32>;

impl<T: Copy + Default> Grid<T> {
    /// Construct a zero-initialized grid of size `zenith × azimuth`.
    pub fn new(zenith: usize, azimuth: usize) -> Self {
        Self {
            zenith,
            azimuth,
            data: vec![T::default(); zenith * azimuth],
        }
    }

    /// Wrap an existing buffer, checking its length.
    pub fn from_vec(zenith: usize, azimuth: usize, data: Vec<T>) -> Result<Self> {
        if data.len() != zenith * azimuth {
            return Err(Error::DimensionMismatch {
                expected: (zenith, azimuth),
                actual: (data.len() / azimuth.max(1), azimuth),
            });
        }
        Ok(Self {
            zenith,
            azimuth,
            data,
        })
    }

    /// A grid of the same shape filled with the default value.
    pub fn zeros_like<U>(other: &Grid<U>) -> Self {
        Self::new(other.zenith, other.azimuth)
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    /// Convert (zenith, azimuth) to a linear index into `data`.
    pub fn idx(&self, z: usize, a: usize) -> usize {
        z * self.azimuth + a
    }
    #[inline]
    pub fn get(&self, z: usize, a: usize) -> T {
        self.data[self.idx(z, a)]
    }
    #[inline]
    pub fn set(&mut self, z: usize, a: usize, v: T) {
        let i = self.idx(z, a);
        self.data[i] = v;
    }

    /// Signed lookup, `None` outside the grid.
    #[inline]
    pub fn get_checked(&self, z: isize, a: isize) -> Option<T> {
        if z < 0 || a < 0 || z as usize >= self.zenith || a as usize >= self.azimuth {
            None
        } else {
            Some(self.get(z as usize, a as usize))
        }
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.zenith, self.azimuth)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Fails with [`Error::EmptyGrid`] for grids without cells.
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyGrid)
        } else {
            Ok(())
        }
    }

    /// Fails unless `other` has the same dimensions.
    pub fn ensure_same_dims<U: Copy>(&self, other: &Grid<U>) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(Error::DimensionMismatch {
                expected: self.dims(),
                actual: other.dims(),
            });
        }
        Ok(())
    }

    pub fn fill(&mut self, v: T) {
        self.data.iter_mut().for_each(|c| *c = v);
    }
}

impl ScalarGrid {
    /// Largest cell value, `0.0` for an empty grid.
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0f64, f64::max)
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }
}

impl LabelGrid {
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

impl<T: Copy> GridView for Grid<T> {
    type Cell = T;

    #[inline]
    fn zenith_bins(&self) -> usize {
        self.zenith
    }
    #[inline]
    fn azimuth_bins(&self) -> usize {
        self.azimuth
    }
    #[inline]
    fn row(&self, z: usize) -> &[T] {
        let start = z * self.azimuth;
        &self.data[start..start + self.azimuth]
    }
}

impl<T: Copy> Grid<T> {
    #[inline]
    pub fn row_mut(&mut self, z: usize) -> &mut [T] {
        let start = z * self.azimuth;
        let end = start + self.azimuth;
        &mut self.data[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Grid::<f64>::from_vec(3, 4, vec![0.0; 11]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
    }

    #[test]
    fn checked_access_is_none_outside() {
        let mut g = ScalarGrid::new(2, 3);
        g.set(1, 2, 5.0);
        assert_eq!(g.get_checked(1, 2), Some(5.0));
        assert_eq!(g.get_checked(-1, 0), None);
        assert_eq!(g.get_checked(2, 0), None);
        assert_eq!(g.max_value(), 5.0);
        assert_eq!(g.count_nonzero(), 1);
    }

    #[test]
    fn same_dims_check_spans_element_types() {
        let scalar = ScalarGrid::new(4, 6);
        assert!(scalar.ensure_same_dims(&LabelGrid::new(4, 6)).is_ok());
        let err = scalar.ensure_same_dims(&LabelGrid::new(4, 5)).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: (4, 6),
                actual: (4, 5)
            }
        ));
    }
}
