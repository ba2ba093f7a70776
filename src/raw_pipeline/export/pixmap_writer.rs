use std::io::Write;

use tracing::debug;

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::export::writer::{FrameWriter, PixelView, emit};

/// Binary netpbm: `P5` for gray, `P6` for RGB, big-endian 16-bit samples.
pub struct PixmapWriter;

impl FrameWriter for PixmapWriter {
    fn write_pixels(&self, pixels: PixelView<'_>, output: &mut dyn Write) -> Result<()> {
        let magic = match pixels.colors {
            1 => "P5",
            3 => "P6",
            other => {
                return Err(RawError::ExportError(format!(
                    "pixmap holds 1 or 3 channels, frame has {}",
                    other
                )));
            }
        };
        let maxval: u32 = match pixels.bits {
            8 => 255,
            16 => 65535,
            other => {
                return Err(RawError::ExportError(format!(
                    "pixmap cannot store {}-bit samples",
                    other
                )));
            }
        };

        debug!(
            "Encoding {} image: {}x{}",
            magic, pixels.width, pixels.height
        );
        let mut buffer = format!("{}\n{} {}\n{}\n", magic, pixels.width, pixels.height, maxval)
            .into_bytes();
        buffer.reserve(pixels.data.len());

        if pixels.bits == 16 {
            for sample in pixels.samples_u16() {
                buffer.extend_from_slice(&sample.to_be_bytes());
            }
        } else {
            buffer.extend_from_slice(pixels.data);
        }

        emit(output, &buffer)?;
        Ok(())
    }
}
