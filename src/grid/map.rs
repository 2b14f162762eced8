use crate::{
    grid::{
        index::{Index, Positions},
        pool::{Buffer, Pool},
    },
    result::{GridError, GridResult},
};
use glam::{IVec2, UVec2};
use ndarray::Array2;
use std::{cell::Cell, fmt, iter::FusedIterator, slice};
use tracing::trace;

/// A rectangular, bounds checked container of cells over pooled storage.
///
/// Cells are accessed through [`Cell`]s, which act as mutable access tokens.
/// This allows reading a grid (e.g. the heights of neighbouring cells),
/// while writing to the cell currently visited by an iteration.
pub struct Grid<T> {
    index: Index,
    buffer: Buffer<T>,
}

impl<T: Copy + Default> Grid<T> {
    /// Creates a grid of default cells over a private pool sized to the area.
    pub fn new(dimension: UVec2) -> GridResult<Self> {
        let index = Index::new(dimension);
        let buffer = Pool::new(index.area()).request(index.area())?;

        Ok(Self { index, buffer })
    }

    /// Creates a grid of default cells over a buffer requested from the pool.
    pub fn from_pool(pool: &mut Pool<T>, dimension: UVec2) -> GridResult<Self> {
        let index = Index::new(dimension);
        let buffer = pool.request(index.area())?;

        Ok(Self { index, buffer })
    }

    /// Resets every cell to its default value.
    pub fn zero(&self) {
        self.fill(T::default());
    }

    /// Exports the cells as an array of shape `(height, width)`.
    pub fn to_array(&self) -> Array2<T> {
        let shape = (self.index.height() as usize, self.index.width() as usize);
        let cells = self.cells();

        Array2::from_shape_fn(shape, |(y, x)| cells[y * shape.1 + x].get())
    }
}

impl<T: Copy> Grid<T> {
    /// Creates a grid over an externally obtained buffer.
    pub fn with_buffer(buffer: Buffer<T>, dimension: UVec2) -> GridResult<Self> {
        let index = Index::new(dimension);
        check_capacity(&index, &buffer)?;

        Ok(Self { index, buffer })
    }

    /// Rebinds the grid to an externally obtained buffer.
    /// The previous buffer view is released.
    pub fn bind(&mut self, buffer: Buffer<T>, dimension: UVec2) -> GridResult<()> {
        let index = Index::new(dimension);
        check_capacity(&index, &buffer)?;

        trace!(
            "Bound grid {dimension} to buffer {} ({} cells).",
            buffer.key(),
            buffer.len()
        );

        self.index = index;
        self.buffer = buffer;

        Ok(())
    }

    #[inline]
    pub fn index(&self) -> &Index {
        &self.index
    }

    #[inline]
    pub fn dimension(&self) -> UVec2 {
        self.index.dimension()
    }

    #[inline]
    pub fn area(&self) -> usize {
        self.index.area()
    }

    /// The buffer view backing the grid.
    /// Share it to alias the storage with another grid.
    #[inline]
    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// Consumes the grid and returns its buffer view, e.g. to release it to its pool.
    pub fn into_buffer(self) -> Buffer<T> {
        self.buffer
    }

    /// Whether the position lies outside of the grid.
    #[inline]
    pub fn oob(&self, position: IVec2) -> bool {
        !self.index.contains(position)
    }

    /// Returns the access token of the cell at the position.
    pub fn get(&self, position: IVec2) -> GridResult<&Cell<T>> {
        let offset = self.index.index(position)?;
        Ok(&self.cells()[offset])
    }

    /// Returns the access token of a position known to lie inside of the grid.
    ///
    /// # Panics
    /// Panics if the position is outside of the extent.
    #[inline]
    pub(crate) fn at(&self, position: IVec2) -> &Cell<T> {
        debug_assert!(self.index.contains(position));
        &self.cells()[self.index.flat(position)]
    }

    /// Returns a copy of the cell at the position.
    pub fn read(&self, position: IVec2) -> GridResult<T> {
        self.get(position).map(Cell::get)
    }

    pub fn set(&self, position: IVec2, value: T) -> GridResult<()> {
        self.get(position).map(|cell| cell.set(value))
    }

    /// Modifies the cell at the position in place.
    pub fn update(&self, position: IVec2, f: impl FnOnce(&mut T)) -> GridResult<()> {
        let cell = self.get(position)?;
        let mut value = cell.get();
        f(&mut value);
        cell.set(value);

        Ok(())
    }

    pub fn fill(&self, value: T) {
        self.cells().iter().for_each(|cell| cell.set(value));
    }

    /// Iterates over all cells and their positions in row-major order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            cells: self.cells().iter(),
            positions: self.index.iter(),
        }
    }

    /// The cells covered by the extent, the buffer may be larger.
    #[inline]
    fn cells(&self) -> &[Cell<T>] {
        &self.buffer.cells()[..self.index.area()]
    }
}

fn check_capacity<T>(index: &Index, buffer: &Buffer<T>) -> GridResult<()> {
    if buffer.len() < index.area() {
        return Err(GridError::DimensionMismatch {
            required: index.area(),
            available: buffer.len(),
        });
    }

    Ok(())
}

impl<T: Copy + fmt::Debug> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("dimension", &self.dimension())
            .field("buffer", &self.buffer)
            .finish()
    }
}

impl<'a, T: Copy> IntoIterator for &'a Grid<T> {
    type Item = (&'a Cell<T>, IVec2);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iteration over the cells of a [`Grid`] paired with their positions.
///
/// The traversal is finite and does not own the cells.
/// Restart it by calling [`Grid::iter`] again.
#[derive(Clone)]
pub struct Iter<'a, T> {
    cells: slice::Iter<'a, Cell<T>>,
    positions: Positions,
}

impl<T: Copy + fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("cells", &self.cells)
            .field("positions", &self.positions)
            .finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a Cell<T>, IVec2);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some((self.cells.next()?, self.positions.next()?))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.positions.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
