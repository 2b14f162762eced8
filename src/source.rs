//! The contract between raster decoders and the grid population step.

use crate::{
    grid::Grid,
    result::{GridError, GridResult},
};
use glam::{IVec2, UVec2};
use ndarray::Array2;

/// A two dimensional source of samples, indexable by integer position.
///
/// The population step calls [`RasterSource::sample`] exactly once per
/// position of the grid and only with positions inside of the extent.
pub trait RasterSource {
    type Sample;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn sample(&self, position: IVec2) -> Self::Sample;

    fn dimension(&self) -> UVec2 {
        UVec2::new(self.width(), self.height())
    }
}

impl<S: Clone> RasterSource for Array2<S> {
    type Sample = S;

    fn width(&self) -> u32 {
        self.ncols() as u32
    }

    fn height(&self) -> u32 {
        self.nrows() as u32
    }

    fn sample(&self, position: IVec2) -> S {
        self[[position.y as usize, position.x as usize]].clone()
    }
}

impl<R: RasterSource + ?Sized> RasterSource for &R {
    type Sample = R::Sample;

    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn sample(&self, position: IVec2) -> Self::Sample {
        (**self).sample(position)
    }
}

impl<T: Copy> Grid<T> {
    /// Copies the samples of the source into the cells of the grid.
    ///
    /// The extent of the source has to match the extent of the grid.
    pub fn populate<R: RasterSource>(
        &self,
        source: R,
        mut f: impl FnMut(&mut T, R::Sample),
    ) -> GridResult<()> {
        check_extent(self.dimension(), source.dimension())?;

        for (cell, position) in self {
            let mut value = cell.get();
            f(&mut value, source.sample(position));
            cell.set(value);
        }

        Ok(())
    }
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid sized to the source and populates it.
    pub fn from_source<R: RasterSource>(
        source: R,
        f: impl FnMut(&mut T, R::Sample),
    ) -> GridResult<Self> {
        let grid = Self::new(source.dimension())?;
        grid.populate(source, f)?;

        Ok(grid)
    }
}

pub(crate) fn check_extent(grid: UVec2, source: UVec2) -> GridResult<()> {
    if grid != source {
        return Err(GridError::ExtentMismatch {
            grid,
            source_dimension: source,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn array_source() {
        let source = array![[1.0_f32, 2.0, 3.0], [4.0, 5.0, 6.0]];

        assert_eq!(source.dimension(), UVec2::new(3, 2));
        assert_eq!(source.sample(IVec2::new(2, 0)), 3.0);
        assert_eq!(source.sample(IVec2::new(0, 1)), 4.0);
    }

    #[test]
    fn populate_scales_samples() {
        let source = array![[0.0_f32, 0.5], [1.0, 0.25]];
        let grid = Grid::<f32>::from_source(&source, |height, sample| *height = 80.0 * sample)
            .unwrap();

        assert_eq!(grid.dimension(), UVec2::new(2, 2));
        assert_eq!(grid.read(IVec2::new(1, 0)).unwrap(), 40.0);
        assert_eq!(grid.read(IVec2::new(0, 1)).unwrap(), 80.0);
        assert_eq!(grid.to_array(), source.mapv(|sample| 80.0 * sample));
    }

    #[test]
    fn populate_rejects_mismatched_extent() {
        let grid = Grid::<u8>::new(UVec2::new(2, 2)).unwrap();
        let source = array![[1_u8, 2, 3]];

        assert_eq!(
            grid.populate(&source, |cell, sample| *cell = sample),
            Err(GridError::ExtentMismatch {
                grid: UVec2::new(2, 2),
                source_dimension: UVec2::new(3, 1)
            })
        );
        assert!(grid.iter().all(|(cell, _)| cell.get() == 0));
    }
}
