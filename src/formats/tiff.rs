use crate::source::RasterSource;
use anyhow::{anyhow, Context, Result};
use glam::IVec2;
use std::{
    fs,
    io::{Cursor, Read, Seek},
    path::Path,
};
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tracing::info;

/// A single channel raster decoded from a TIFF image.
///
/// Integer and floating point samples are converted to `f32` without normalization.
/// Of multi channel images only the first channel is kept.
#[derive(Clone, Debug)]
pub struct TiffRaster {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl TiffRaster {
    pub fn decode(encoded: &[u8]) -> Result<Self> {
        Self::read(Cursor::new(encoded))
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let encoded =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let raster =
            Self::decode(&encoded).with_context(|| format!("failed to decode {}", path.display()))?;

        info!(
            "Loaded TIFF raster {} ({}x{}).",
            path.display(),
            raster.width,
            raster.height
        );

        Ok(raster)
    }

    fn read<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut decoder = Decoder::new(reader)?.with_limits(Limits::unlimited());

        let (width, height) = decoder.dimensions()?;

        let samples: Vec<f32> = match decoder.read_image()? {
            DecodingResult::U8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::F32(data) => data,
            DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I8(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I16(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
            DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        };

        let area = width as usize * height as usize;

        if area == 0 || samples.len() < area || samples.len() % area != 0 {
            return Err(anyhow!(
                "TIFF holds {} samples, which do not cover {width}x{height} pixels",
                samples.len()
            ));
        }

        let channel_count = samples.len() / area;
        let data = samples.into_iter().step_by(channel_count).collect();

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// The decoded samples in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

impl RasterSource for TiffRaster {
    type Sample = f32;

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sample(&self, position: IVec2) -> f32 {
        self.data[position.y as usize * self.width as usize + position.x as usize]
    }
}
