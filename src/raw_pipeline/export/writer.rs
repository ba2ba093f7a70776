use std::io::Write;

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::frame::Frame;

/// Pixel dimensions and samples of anything that can be encoded.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    pub width: u32,
    pub height: u32,
    pub colors: u16,
    pub bits: u16,
    /// Row-major, channel-interleaved, native byte order for 16-bit samples.
    pub data: &'a [u8],
}

impl<'a> From<&'a Frame> for PixelView<'a> {
    fn from(frame: &'a Frame) -> Self {
        Self {
            width: frame.width(),
            height: frame.height(),
            colors: frame.colors(),
            bits: frame.bits(),
            data: frame.data(),
        }
    }
}

impl PixelView<'_> {
    pub fn samples_u16(&self) -> Vec<u16> {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Hand encoded bytes to the sink. A failing sink is an export failure.
pub(crate) fn emit(output: &mut dyn Write, bytes: &[u8]) -> Result<()> {
    output
        .write_all(bytes)
        .map_err(|e| RawError::ExportError(format!("write failed: {}", e)))
}

pub trait FrameWriter {
    fn write_pixels(&self, pixels: PixelView<'_>, output: &mut dyn Write) -> Result<()>;

    fn write_frame(&self, frame: &Frame, output: &mut dyn Write) -> Result<()> {
        self.write_pixels(PixelView::from(frame), output)
    }
}
