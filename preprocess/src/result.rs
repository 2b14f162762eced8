use soil_terrain::result::GridError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("grid error")]
    Grid(#[from] GridError),
    #[error("failed to load raster")]
    Raster(#[source] anyhow::Error),
    #[error("failed to save terrain config")]
    Config(#[source] anyhow::Error),
    #[error("the terrain directory {} already contains data, pass --overwrite to replace it", .0.display())]
    TerrainExists(PathBuf),
    #[error("IO error")]
    Io(#[from] std::io::Error),
}

pub type PreprocessResult<T> = Result<T, PreprocessError>;
