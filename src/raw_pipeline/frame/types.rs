use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::engine::ImageKind;
use crate::raw_pipeline::frame::metadata::FrameMetadata;

/// Byte length of a row-major, channel-interleaved buffer.
pub fn expected_len(width: u32, height: u32, colors: u16, bits: u16) -> usize {
    width as usize * height as usize * colors as usize * bits as usize / 8
}

/// A fully processed image, owned and independent of the session that made it.
///
/// Samples are row-major and channel-interleaved. 16-bit samples are stored
/// in native byte order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    colors: u16,
    bits: u16,
    data: Vec<u8>,
    metadata: FrameMetadata,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        colors: u16,
        bits: u16,
        data: Vec<u8>,
        metadata: FrameMetadata,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RawError::ProcessError(format!(
                "empty frame {}x{}",
                width, height
            )));
        }
        if !matches!(colors, 1..=4) {
            return Err(RawError::ProcessError(format!(
                "unsupported channel count {}",
                colors
            )));
        }
        if bits != 8 && bits != 16 {
            return Err(RawError::ProcessError(format!(
                "unsupported bit depth {}",
                bits
            )));
        }
        let expected = expected_len(width, height, colors, bits);
        if data.len() != expected {
            return Err(RawError::ProcessError(format!(
                "frame buffer holds {} bytes, {}x{}x{} at {} bits needs {}",
                data.len(),
                width,
                height,
                colors,
                bits,
                expected
            )));
        }

        Ok(Self {
            width,
            height,
            colors,
            bits,
            data,
            metadata,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn colors(&self) -> u16 {
        self.colors
    }

    pub fn bits(&self) -> u16 {
        self.bits
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn metadata(&self) -> &FrameMetadata {
        &self.metadata
    }

    pub fn samples_per_row(&self) -> usize {
        self.width as usize * self.colors as usize
    }

    /// Decode 16-bit samples. `None` for 8-bit frames.
    pub fn samples_u16(&self) -> Option<Vec<u16>> {
        if self.bits != 16 {
            return None;
        }
        Some(
            self.data
                .chunks_exact(2)
                .map(|pair| u16::from_ne_bytes([pair[0], pair[1]]))
                .collect(),
        )
    }
}

/// The embedded preview image, kept in the encoding the file carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub kind: ImageKind,
    pub width: u16,
    pub height: u16,
    pub colors: u16,
    pub bits: u16,
    pub data: Vec<u8>,
}

impl Thumbnail {
    pub fn is_jpeg(&self) -> bool {
        self.kind == ImageKind::Jpeg
    }
}
