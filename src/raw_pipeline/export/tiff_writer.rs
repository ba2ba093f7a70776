use std::io::Write;

use tiff::encoder::colortype::{Gray8, Gray16, RGB8, RGB16, RGBA8, RGBA16};
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder};
use tracing::debug;

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::export::types::{ExportConfig, TiffCompression};
use crate::raw_pipeline::export::writer::{FrameWriter, PixelView, emit};

pub struct TiffFrameWriter {
    config: ExportConfig,
}

impl TiffFrameWriter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }
}

impl Default for TiffFrameWriter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

fn encode_error(e: tiff::TiffError) -> RawError {
    RawError::ExportError(e.to_string())
}

impl FrameWriter for TiffFrameWriter {
    fn write_pixels(&self, pixels: PixelView<'_>, output: &mut dyn Write) -> Result<()> {
        debug!(
            "Encoding TIFF image: {}x{}x{} at {} bits",
            pixels.width, pixels.height, pixels.colors, pixels.bits
        );

        let mut buffer = Vec::new();

        let compression = match self.config.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::Deflate => Compression::Deflate(DeflateLevel::Balanced),
        };

        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(encode_error)?
            .with_compression(compression);

        if let Some(predictor_val) = self.config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        let (w, h) = (pixels.width, pixels.height);
        let written = match (pixels.colors, pixels.bits) {
            (1, 8) => encoder.write_image::<Gray8>(w, h, pixels.data),
            (3, 8) => encoder.write_image::<RGB8>(w, h, pixels.data),
            (4, 8) => encoder.write_image::<RGBA8>(w, h, pixels.data),
            (1, 16) => encoder.write_image::<Gray16>(w, h, &pixels.samples_u16()),
            (3, 16) => encoder.write_image::<RGB16>(w, h, &pixels.samples_u16()),
            (4, 16) => encoder.write_image::<RGBA16>(w, h, &pixels.samples_u16()),
            (colors, bits) => {
                return Err(RawError::ExportError(format!(
                    "TIFF export does not support {} channels at {} bits",
                    colors, bits
                )));
            }
        };
        written.map_err(encode_error)?;

        emit(output, &buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
