use crate::{
    cli::Cli,
    result::{PreprocessError, PreprocessResult},
};
use soil_terrain::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(crate) const CONFIG_FILE: &str = "config.tc.ron";

/// The decoded source rasters of a terrain.
pub struct PreprocessDataset {
    pub(crate) height: TiffRaster,
    pub(crate) discharge: Option<TiffRaster>,
    pub(crate) normal: Option<PngRaster>,
}

impl PreprocessDataset {
    pub fn load(
        height_path: &Path,
        discharge_path: Option<&Path>,
        normal_path: Option<&Path>,
    ) -> PreprocessResult<Self> {
        let height = TiffRaster::load_file(height_path).map_err(PreprocessError::Raster)?;

        let discharge = discharge_path
            .map(TiffRaster::load_file)
            .transpose()
            .map_err(PreprocessError::Raster)?;

        let normal = normal_path
            .map(PngRaster::load_file)
            .transpose()
            .map_err(PreprocessError::Raster)?;

        let dataset = Self {
            height,
            discharge,
            normal,
        };
        dataset.check_extents()?;

        Ok(dataset)
    }

    pub fn dimension(&self) -> glam::UVec2 {
        self.height.dimension()
    }

    fn check_extents(&self) -> PreprocessResult<()> {
        let grid = self.dimension();

        let extents = [
            self.discharge.as_ref().map(RasterSource::dimension),
            self.normal.as_ref().map(RasterSource::dimension),
        ];

        match extents.into_iter().flatten().find(|&extent| extent != grid) {
            Some(source_dimension) => Err(GridError::ExtentMismatch {
                grid,
                source_dimension,
            }
            .into()),
            None => Ok(()),
        }
    }
}

pub struct PreprocessContext {
    pub(crate) terrain_path: PathBuf,
    pub(crate) height_scale: f32,
    pub(crate) capacity: usize,
    pub(crate) overwrite: bool,
}

impl PreprocessContext {
    pub fn from_cli(args: Cli) -> PreprocessResult<(PreprocessDataset, Self)> {
        let Cli {
            height_path,
            terrain_path,
            discharge,
            normal,
            height_scale,
            capacity,
            overwrite,
            log_level: _,
        } = args;

        let dataset = PreprocessDataset::load(&height_path, discharge.as_deref(), normal.as_deref())?;
        let capacity = capacity.unwrap_or_else(|| Index::new(dataset.dimension()).area());

        Ok((
            dataset,
            Self {
                terrain_path,
                height_scale,
                capacity,
                overwrite,
            },
        ))
    }

    pub(crate) fn config_path(&self) -> PathBuf {
        self.terrain_path.join(CONFIG_FILE)
    }

    /// Makes sure the terrain directory exists and may be written to.
    pub(crate) fn prepare_directory(&self) -> PreprocessResult<()> {
        if self.config_path().exists() && !self.overwrite {
            return Err(PreprocessError::TerrainExists(self.terrain_path.clone()));
        }

        fs::create_dir_all(&self.terrain_path)?;

        Ok(())
    }
}
