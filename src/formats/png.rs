use crate::source::RasterSource;
use anyhow::{Context, Result};
use glam::{IVec2, Vec4};
use image::{ImageReader, Rgba32FImage};
use std::{io::Cursor, path::Path};
use tracing::info;

/// A color raster decoded through the `image` crate (PNG and friends).
///
/// Samples are RGBA vectors with every channel in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct PngRaster {
    image: Rgba32FImage,
}

impl PngRaster {
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        let mut reader = ImageReader::new(Cursor::new(encoded)).with_guessed_format()?;
        reader.no_limits();

        Ok(Self {
            image: reader.decode()?.into_rgba32f(),
        })
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        reader.no_limits();

        let image = reader
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?
            .into_rgba32f();

        info!(
            "Loaded image raster {} ({}x{}).",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self { image })
    }
}

impl RasterSource for PngRaster {
    type Sample = Vec4;

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn sample(&self, position: IVec2) -> Vec4 {
        Vec4::from_array(self.image.get_pixel(position.x as u32, position.y as u32).0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};

    fn encode(image: &RgbaImage) -> Vec<u8> {
        let mut encoded = Cursor::new(Vec::new());
        image.write_to(&mut encoded, ImageFormat::Png).unwrap();
        encoded.into_inner()
    }

    #[test]
    fn decode_normalized_colors() {
        let mut image = RgbaImage::new(2, 3);
        image.put_pixel(1, 2, Rgba([255, 0, 255, 255]));
        image.put_pixel(0, 1, Rgba([0, 255, 0, 0]));

        let raster = PngRaster::decode(&encode(&image)).unwrap();

        assert_eq!(raster.dimension(), glam::UVec2::new(2, 3));
        assert_eq!(raster.sample(IVec2::new(1, 2)), Vec4::new(1.0, 0.0, 1.0, 1.0));
        assert_eq!(raster.sample(IVec2::new(0, 1)), Vec4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(raster.sample(IVec2::new(0, 0)), Vec4::ZERO);
    }

    #[test]
    fn load_from_file() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("normal.png");

        let image = RgbaImage::from_pixel(4, 4, Rgba([128, 255, 128, 255]));
        image.save(&path).unwrap();

        let raster = PngRaster::load_file(&path).unwrap();
        let sample = raster.sample(IVec2::new(3, 3));

        assert!((sample.y - 1.0).abs() < 1e-6);
        assert!((sample.x - 128.0 / 255.0).abs() < 1e-6);
    }
}
