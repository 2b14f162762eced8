use glam::{IVec2, UVec2, Vec3};
use soil_terrain::prelude::*;
use std::io::Cursor;
use tiff::encoder::{colortype, TiffEncoder};

#[derive(Copy, Clone, Debug, Default)]
struct Cell {
    height: f32,
    soil: Binary,
    normal: Vec3,
}

impl Height for Cell {
    fn height(&self) -> f32 {
        self.height
    }
}

fn slope_tiff() -> Vec<u8> {
    let heights: Vec<f32> = (0..3)
        .flat_map(|y| (0..3).map(move |x| (x + y) as f32))
        .collect();

    let mut encoded = Cursor::new(Vec::new());
    TiffEncoder::new(&mut encoded)
        .unwrap()
        .write_image::<colortype::Gray32Float>(3, 3, &heights)
        .unwrap();
    encoded.into_inner()
}

#[test]
fn height_raster_to_normals() {
    let height = TiffRaster::decode(&slope_tiff()).unwrap();

    let mut pool = Pool::<Cell>::new(9);
    let grid = Grid::from_pool(&mut pool, height.dimension()).unwrap();

    grid.populate(&height, |cell, sample| cell.height = sample)
        .unwrap();
    estimate_normals(&grid, |cell, normal| cell.normal = normal);

    let expected = Vec3::new(-1.0, 1.0, -1.0).normalize();

    for (cell, position) in &grid {
        let cell = cell.get();
        assert_eq!(cell.height, (position.x + position.y) as f32);
        assert!(cell.normal.abs_diff_eq(expected, 1e-6));
    }
}

#[test]
fn pool_serves_grids_in_sequence() {
    let mut pool = Pool::<Cell>::new(16);
    let dimension = UVec2::new(4, 4);

    let first = Grid::from_pool(&mut pool, dimension).unwrap();
    first.update(IVec2::new(1, 2), |cell| cell.soil = Binary::from(0.5))
        .unwrap();

    let alias = Grid::with_buffer(first.buffer().share(), dimension).unwrap();
    assert_eq!(alias.read(IVec2::new(1, 2)).unwrap().soil.mixture, 0.5);

    // the buffer is still bound, so a second grid does not fit
    drop(first);
    assert!(matches!(
        Grid::from_pool(&mut pool, dimension),
        Err(GridError::AllocationFailure { .. })
    ));

    // once the last view is gone the buffer is reused and reset
    drop(alias);
    let second = Grid::from_pool(&mut pool, dimension).unwrap();
    assert_eq!(second.read(IVec2::new(1, 2)).unwrap().soil, Binary::default());
    assert_eq!(pool.allocated(), 16);
}

#[test]
fn accesses_outside_of_the_grid_fail() {
    let grid = Grid::<Cell>::new(UVec2::new(3, 2)).unwrap();

    for position in [IVec2::new(3, 0), IVec2::new(0, 2), IVec2::new(-1, -1)] {
        assert!(grid.oob(position));
        assert!(grid.get(position).unwrap_err().is_out_of_range());
        // the estimator stays total
        assert_eq!(normal(&grid, position), Vec3::Y);
    }
}
