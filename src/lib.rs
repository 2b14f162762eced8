//! This crate provides the storage and processing core for raster terrain data.
//! Elevation and auxiliary imagery is loaded into uniform in-memory grids,
//! from which per cell surface attributes, like normals, are derived for
//! downstream visualization.
//!
//! # Background
//! Every terrain tool has to answer two questions:
//!
//! ## How to store and access the terrain data?
//! Each terrain has different kinds of data associated with it.
//! For example a simple one might only need heights, while another also stores
//! discharge or soil compositions.
//! All of them are stored in a [`Grid`](grid::Grid), a rectangular container that is
//! generic over its cell type and bounds checks every access.
//! The cells live in buffers served by a [`Pool`](grid::Pool), which can be shared
//! between multiple grids without copying.
//! See the [`grid`] module for more information.
//!
//! ## How to derive surface attributes?
//! Once the heights are populated from a [`RasterSource`](source::RasterSource),
//! the [`surface`](math::surface) estimator computes a normal for every cell
//! from the heights of its neighbours.
//! Cells at the boundary substitute missing neighbours with their own height,
//! so the estimation never fails.
//!
//! Rendering the resulting data is left to the consumers of the grid.

pub mod config;
pub mod formats;
pub mod grid;
pub mod math;
pub mod matrix;
pub mod result;
pub mod source;

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        config::{AttachmentConfig, AttachmentLabel, TerrainConfig},
        formats::{PngRaster, TiffRaster},
        grid::{Buffer, Grid, Index, Pool},
        math::{
            estimate_normals, estimate_normals_with_progress, normal, normals, Height, HeightField,
        },
        matrix::Binary,
        result::{GridError, GridResult},
        source::RasterSource,
    };
}
