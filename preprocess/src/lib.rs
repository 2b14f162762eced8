mod cli;
mod dataset;
mod result;

use crate::{
    cli::{PreprocessBar, ProgressCallback},
    dataset::{PreprocessContext, PreprocessDataset},
    result::{PreprocessError, PreprocessResult},
};
use bytemuck::cast_slice;
use glam::{Vec3, Vec4, Vec4Swizzles};
use itertools::Itertools;
use soil_terrain::prelude::*;
use std::{fs, time::Instant};
use tracing::info;

pub mod prelude {
    pub use crate::{
        cli::Cli,
        dataset::{PreprocessContext, PreprocessDataset},
        preprocess,
        result::{PreprocessError, PreprocessResult},
        TerrainCell,
    };
}

const HEIGHT_FILE: &str = "height.bin";
const DISCHARGE_FILE: &str = "discharge.bin";
const NORMAL_FILE: &str = "normal.bin";

/// The cell stored by the preprocessing grid.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TerrainCell {
    pub height: f32,
    pub discharge: f32,
    pub normal: Vec3,
}

impl Height for TerrainCell {
    fn height(&self) -> f32 {
        self.height
    }
}

/// Converts a color of a normal map to a unit normal.
fn decode_normal(color: Vec4) -> Vec3 {
    (color.xyz() * 2.0 - 1.0).try_normalize().unwrap_or(Vec3::Y)
}

fn fill(
    grid: &Grid<TerrainCell>,
    dataset: &PreprocessDataset,
    context: &PreprocessContext,
    progress_callback: &ProgressCallback,
) -> PreprocessResult<()> {
    let height_scale = context.height_scale;

    grid.populate(&dataset.height, |cell, sample| {
        cell.height = height_scale * sample
    })?;
    progress_callback(1.0 / 3.0);

    if let Some(discharge) = &dataset.discharge {
        grid.populate(discharge, |cell, sample| cell.discharge = sample)?;
    }
    progress_callback(2.0 / 3.0);

    if let Some(normal) = &dataset.normal {
        grid.populate(normal, |cell, sample| cell.normal = decode_normal(sample))?;
    }
    progress_callback(1.0);

    Ok(())
}

fn save_floats(
    context: &PreprocessContext,
    file: &str,
    values: &[f32],
) -> PreprocessResult<()> {
    let bytes = values.iter().flat_map(|value| value.to_le_bytes()).collect_vec();
    fs::write(context.terrain_path.join(file), bytes)?;

    Ok(())
}

fn save(
    grid: &Grid<TerrainCell>,
    dataset: &PreprocessDataset,
    context: &PreprocessContext,
    progress_callback: &ProgressCallback,
) -> PreprocessResult<TerrainConfig> {
    let cells = grid.iter().map(|(cell, _)| cell.get()).collect_vec();

    let heights = cells.iter().map(|cell| cell.height).collect_vec();
    save_floats(context, HEIGHT_FILE, &heights)?;
    progress_callback(1.0 / 3.0);

    let normals = cells.iter().map(|cell| cell.normal).collect_vec();
    save_floats(context, NORMAL_FILE, cast_slice(normals.as_slice()))?;
    progress_callback(2.0 / 3.0);

    if dataset.discharge.is_some() {
        let discharges = cells.iter().map(|cell| cell.discharge).collect_vec();
        save_floats(context, DISCHARGE_FILE, &discharges)?;
    }

    let config = save_terrain_config(grid, &heights, dataset, context)?;
    progress_callback(1.0);

    Ok(config)
}

fn save_terrain_config(
    grid: &Grid<TerrainCell>,
    heights: &[f32],
    dataset: &PreprocessDataset,
    context: &PreprocessContext,
) -> PreprocessResult<TerrainConfig> {
    let file_path = context.config_path();

    let mut config = if file_path.exists() {
        TerrainConfig::load_file(&file_path).map_err(PreprocessError::Config)?
    } else {
        TerrainConfig::default()
    };

    let (min_height, max_height) = heights
        .iter()
        .copied()
        .minmax_by(f32::total_cmp)
        .into_option()
        .unwrap_or_default();

    config.dimension = grid.dimension();
    config.height_scale = context.height_scale;
    config.min_height = min_height;
    config.max_height = max_height;
    config.add_attachment(AttachmentLabel::Height, HEIGHT_FILE);
    config.add_attachment(AttachmentLabel::Normal, NORMAL_FILE);

    if dataset.discharge.is_some() {
        config.add_attachment(AttachmentLabel::Discharge, DISCHARGE_FILE);
    } else if let Some(stale) = config.remove_attachment(AttachmentLabel::Discharge) {
        let stale_path = context.terrain_path.join(stale.file);

        if stale_path.exists() {
            fs::remove_file(stale_path)?;
        }
    }

    config
        .save_file(&file_path)
        .map_err(PreprocessError::Config)?;

    Ok(config)
}

/// Fills a pooled grid from the dataset, derives its normals and writes the terrain.
///
/// The stages run strictly one after another,
/// the normals are only estimated once every height is in place.
pub fn preprocess(
    dataset: &PreprocessDataset,
    context: &PreprocessContext,
) -> PreprocessResult<TerrainConfig> {
    context.prepare_directory()?;

    let start_preprocessing = Instant::now();

    let mut pool = Pool::<TerrainCell>::new(context.capacity);
    let grid = Grid::from_pool(&mut pool, dataset.dimension())?;

    let progress_bar = PreprocessBar::new("Filling".to_string());
    fill(&grid, dataset, context, progress_bar.callback())?;
    progress_bar.finish();

    if dataset.normal.is_none() {
        let progress_bar = PreprocessBar::new("Estimating".to_string());
        estimate_normals_with_progress(
            &grid,
            |cell, normal| cell.normal = normal,
            progress_bar.callback(),
        );
        progress_bar.finish();
    }

    let progress_bar = PreprocessBar::new("Saving".to_string());
    let config = save(&grid, dataset, context, progress_bar.callback())?;
    progress_bar.finish();

    pool.release(grid.into_buffer());

    info!("Preprocessing took: {:?}", start_preprocessing.elapsed());

    Ok(config)
}
