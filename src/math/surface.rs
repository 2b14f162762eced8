//! Surface normal estimation from height samples.
//!
//! Normals are derived from finite differences of the four neighbouring heights,
//! `n ∝ (-∂h/∂x, 1, -∂h/∂y)`.
//! Neighbours outside of the extent are substituted by the center sample,
//! so the estimation is total over the whole grid and never fails.

use crate::{grid::Grid, result::GridResult};
use bitflags::bitflags;
use glam::{IVec2, Vec2, Vec3};

/// Exposes the height of a grid cell.
pub trait Height {
    fn height(&self) -> f32;
}

impl Height for f32 {
    fn height(&self) -> f32 {
        *self
    }
}

/// A bounded field of height samples.
pub trait HeightField {
    /// Whether the position lies outside of the field.
    fn oob(&self, position: IVec2) -> bool;

    /// The height at a position inside of the field.
    ///
    /// Callers guard the position with [`HeightField::oob`] first,
    /// implementations may panic for positions outside of the field.
    fn height(&self, position: IVec2) -> f32;
}

impl<T: Copy + Height> HeightField for Grid<T> {
    fn oob(&self, position: IVec2) -> bool {
        Grid::oob(self, position)
    }

    fn height(&self, position: IVec2) -> f32 {
        Height::height(&self.at(position).get())
    }
}

bitflags! {
    /// The direct neighbours of a position, that lie inside of a field.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Neighbours: u8 {
        const LEFT  = 1 << 0;
        const RIGHT = 1 << 1;
        const UP    = 1 << 2;
        const DOWN  = 1 << 3;
    }
}

impl Neighbours {
    const OFFSETS: [(Neighbours, IVec2); 4] = [
        (Neighbours::LEFT, IVec2::NEG_X),
        (Neighbours::RIGHT, IVec2::X),
        (Neighbours::UP, IVec2::NEG_Y),
        (Neighbours::DOWN, IVec2::Y),
    ];

    pub fn of<F: HeightField + ?Sized>(field: &F, position: IVec2) -> Self {
        Self::OFFSETS
            .iter()
            .filter(|(_, offset)| !field.oob(position + *offset))
            .fold(Neighbours::empty(), |neighbours, (flag, _)| {
                neighbours | *flag
            })
    }

    /// The number of samples spanned by the neighbours along the x and y axes.
    fn span(self) -> Vec2 {
        let count = |a: Neighbours, b: Neighbours| {
            (self.contains(a) as u32 + self.contains(b) as u32) as f32
        };

        Vec2::new(
            count(Neighbours::LEFT, Neighbours::RIGHT),
            count(Neighbours::UP, Neighbours::DOWN),
        )
    }
}

/// Estimates the height gradient `(∂h/∂x, ∂h/∂y)` at the position.
///
/// Missing neighbours are replaced by the center height and the difference is
/// divided by the number of real samples on each axis.
/// An axis without any neighbour is flat.
pub fn gradient<F: HeightField + ?Sized>(field: &F, position: IVec2) -> Vec2 {
    if field.oob(position) {
        return Vec2::ZERO;
    }

    let center = field.height(position);
    let neighbours = Neighbours::of(field, position);

    let sample = |flag: Neighbours, offset: IVec2| {
        if neighbours.contains(flag) {
            field.height(position + offset)
        } else {
            center
        }
    };

    let difference = Vec2::new(
        sample(Neighbours::RIGHT, IVec2::X) - sample(Neighbours::LEFT, IVec2::NEG_X),
        sample(Neighbours::DOWN, IVec2::Y) - sample(Neighbours::UP, IVec2::NEG_Y),
    );
    let span = neighbours.span();

    Vec2::select(span.cmpgt(Vec2::ZERO), difference / span, Vec2::ZERO)
}

/// Estimates the outward surface normal at the position.
///
/// The y axis points up. Degenerate gradients result in [`Vec3::Y`].
pub fn normal<F: HeightField + ?Sized>(field: &F, position: IVec2) -> Vec3 {
    let gradient = gradient(field, position);

    Vec3::new(-gradient.x, 1.0, -gradient.y)
        .try_normalize()
        .unwrap_or(Vec3::Y)
}

/// Computes the normal field of the grid.
pub fn normals<T: Copy + Height>(grid: &Grid<T>) -> GridResult<Grid<Vec3>> {
    let normals = Grid::new(grid.dimension())?;

    for (cell, position) in &normals {
        cell.set(normal(grid, position));
    }

    Ok(normals)
}

/// Estimates the normal of every cell and writes it back into the cell.
///
/// The height field has to be fully populated beforehand.
pub fn estimate_normals<T: Copy + Height>(grid: &Grid<T>, write: impl FnMut(&mut T, Vec3)) {
    estimate_normals_with_progress(grid, write, |_| {});
}

/// Like [`estimate_normals`], but reports the completed fraction of rows
/// before each row and once more with `1.0` at the end.
pub fn estimate_normals_with_progress<T: Copy + Height>(
    grid: &Grid<T>,
    mut write: impl FnMut(&mut T, Vec3),
    mut progress: impl FnMut(f64),
) {
    let rows = grid.dimension().y.max(1) as f64;

    for (cell, position) in grid {
        if position.x == 0 {
            progress(position.y as f64 / rows);
        }

        let normal = normal(grid, position);
        let mut value = cell.get();
        write(&mut value, normal);
        cell.set(value);
    }

    progress(1.0);
}
