//! Raster adapters, that expose decoded images as [`RasterSource`](crate::source::RasterSource)s.
//!
//! The decoding itself is done by the `tiff` and `image` crates.

pub mod png;
pub mod tiff;

pub use self::{png::PngRaster, tiff::TiffRaster};
