use crate::result::{GridError, GridResult};
use glam::{IVec2, UVec2};
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

/// Maps between two dimensional positions and flat row-major offsets of a rectangular extent.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    dimension: UVec2,
}

impl Index {
    pub fn new(dimension: UVec2) -> Self {
        Self { dimension }
    }

    #[inline]
    pub fn dimension(&self) -> UVec2 {
        self.dimension
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.dimension.x
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.dimension.y
    }

    /// The number of cells covered by the extent.
    #[inline]
    pub fn area(&self) -> usize {
        self.dimension.x as usize * self.dimension.y as usize
    }

    /// Whether the position lies inside the extent.
    /// All other bounds checks of the crate are based on this one.
    #[inline]
    pub fn contains(&self, position: IVec2) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.dimension.x
            && (position.y as u32) < self.dimension.y
    }

    /// Returns the flat offset of the position.
    pub fn index(&self, position: IVec2) -> GridResult<usize> {
        if !self.contains(position) {
            return Err(GridError::OutOfRange {
                position,
                dimension: self.dimension,
            });
        }

        Ok(self.flat(position))
    }

    /// Returns the position of the flat offset. Inverse of [`Index::index`].
    pub fn coord(&self, offset: usize) -> GridResult<IVec2> {
        if offset >= self.area() {
            return Err(GridError::OffsetOutOfRange {
                offset,
                dimension: self.dimension,
            });
        }

        let width = self.dimension.x as usize;

        Ok(IVec2::new((offset % width) as i32, (offset / width) as i32))
    }

    /// Iterates over every position of the extent in row-major order.
    pub fn iter(&self) -> Positions {
        Positions {
            width: self.dimension.x,
            position: IVec2::ZERO,
            remaining: self.area(),
        }
    }

    #[inline]
    pub(crate) fn flat(&self, position: IVec2) -> usize {
        position.y as usize * self.dimension.x as usize + position.x as usize
    }
}

impl IntoIterator for Index {
    type Item = IVec2;
    type IntoIter = Positions;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major sequence of all valid positions of an [`Index`].
#[derive(Clone, Debug)]
pub struct Positions {
    width: u32,
    position: IVec2,
    remaining: usize,
}

impl Iterator for Positions {
    type Item = IVec2;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let position = self.position;
        self.remaining -= 1;

        self.position.x += 1;
        if self.position.x as u32 == self.width {
            self.position.x = 0;
            self.position.y += 1;
        }

        Some(position)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Positions {}

impl FusedIterator for Positions {}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    #[test]
    fn index_round_trip() {
        let index = Index::new(UVec2::new(7, 5));

        for (y, x) in iproduct!(0..5, 0..7) {
            let position = IVec2::new(x, y);
            let offset = index.index(position).unwrap();

            assert_eq!(offset, (y * 7 + x) as usize);
            assert_eq!(index.coord(offset).unwrap(), position);
        }
    }

    #[test]
    fn out_of_range() {
        let index = Index::new(UVec2::new(3, 2));

        for position in [
            IVec2::new(-1, 0),
            IVec2::new(0, -1),
            IVec2::new(3, 0),
            IVec2::new(0, 2),
            IVec2::new(i32::MIN, i32::MAX),
        ] {
            assert!(!index.contains(position));
            assert_eq!(
                index.index(position),
                Err(GridError::OutOfRange {
                    position,
                    dimension: UVec2::new(3, 2)
                })
            );
        }

        assert!(index.coord(6).unwrap_err().is_out_of_range());
        assert_eq!(index.coord(5).unwrap(), IVec2::new(2, 1));
    }

    #[test]
    fn empty_extent() {
        let index = Index::new(UVec2::new(0, 4));

        assert_eq!(index.area(), 0);
        assert!(!index.contains(IVec2::ZERO));
        assert!(index.coord(0).is_err());
        assert_eq!(index.iter().count(), 0);
    }

    #[test]
    fn iteration_is_row_major() {
        let index = Index::new(UVec2::new(3, 2));
        let positions: Vec<IVec2> = index.iter().collect();

        assert_eq!(index.iter().len(), 6);
        assert_eq!(
            positions,
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, 0),
                IVec2::new(2, 0),
                IVec2::new(0, 1),
                IVec2::new(1, 1),
                IVec2::new(2, 1),
            ]
        );

        // restartable
        assert_eq!(index.iter().collect::<Vec<_>>(), positions);
    }
}
