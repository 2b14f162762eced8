use glam::{IVec2, UVec2};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("position {position} is outside of the grid extent {dimension}")]
    OutOfRange { position: IVec2, dimension: UVec2 },
    #[error("offset {offset} is outside of the grid extent {dimension}")]
    OffsetOutOfRange { offset: usize, dimension: UVec2 },
    #[error("buffer holds {available} cells, but the grid requires {required}")]
    DimensionMismatch { required: usize, available: usize },
    #[error("pool can not serve {requested} cells, only {available} are available")]
    AllocationFailure { requested: usize, available: usize },
    #[error("raster source extent {source_dimension} does not match the grid extent {grid}")]
    ExtentMismatch {
        grid: UVec2,
        source_dimension: UVec2,
    },
}

impl GridError {
    /// Whether the error was caused by an access outside of the grid extent.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            GridError::OutOfRange { .. } | GridError::OffsetOutOfRange { .. }
        )
    }
}

pub type GridResult<T> = Result<T, GridError>;
