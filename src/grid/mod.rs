//! This module contains the storage layer of the terrain data:
//! the [`Index`](index::Index), the [`Pool`](pool::Pool) and the [`Grid`](map::Grid).
//!
//! # Explanation
//! Each [`Grid`](map::Grid) covers a rectangular extent described by its
//! [`Index`](index::Index), which maps positions to flat row-major offsets and
//! answers all bounds queries.
//! The cells of a grid live in a [`Buffer`](pool::Buffer) served by a
//! [`Pool`](pool::Pool).
//! Multiple grids may alias the same buffer, by explicitly sharing its view.
//! The memory stays alive as long as any view is bound to it.
//!
//! Accessing a position outside of the extent is an error, it is never clamped.
//! Consumers that sample near the boundary guard their reads with
//! [`Grid::oob`](map::Grid::oob).

pub mod index;
pub mod map;
pub mod pool;

pub use index::{Index, Positions};
pub use map::{Grid, Iter};
pub use pool::{Buffer, Pool};
