//! Types exchanged with the decode engine.

use thiserror::Error;

use crate::raw_pipeline::layout::{CompiledLayout, RecordKind, RecordView};

/// Engine return codes.
pub mod status {
    pub const SUCCESS: i32 = 0;
    pub const UNSPECIFIED_ERROR: i32 = -1;
    pub const FILE_UNSUPPORTED: i32 = -2;
    pub const REQUEST_FOR_NONEXISTENT_IMAGE: i32 = -3;
    pub const OUT_OF_ORDER_CALL: i32 = -4;
    pub const NO_THUMBNAIL: i32 = -5;
    pub const UNSUPPORTED_THUMBNAIL: i32 = -6;
    pub const INPUT_CLOSED: i32 = -7;
    pub const UNSUFFICIENT_MEMORY: i32 = -100007;
    pub const DATA_ERROR: i32 = -100008;
    pub const IO_ERROR: i32 = -100009;
    pub const CANCELLED_BY_CALLBACK: i32 = -100010;
    pub const BAD_CROP: i32 = -100011;
}

/// Text for a return code when the engine cannot describe it itself.
pub fn describe(code: i32) -> String {
    match code {
        status::SUCCESS => "No error".to_string(),
        status::UNSPECIFIED_ERROR => "Unspecified error".to_string(),
        status::FILE_UNSUPPORTED => "Unsupported file format or not RAW file".to_string(),
        status::REQUEST_FOR_NONEXISTENT_IMAGE => "Request for nonexisting image number".to_string(),
        status::OUT_OF_ORDER_CALL => "Out of order call of libraw function".to_string(),
        status::NO_THUMBNAIL => "No thumbnail in file".to_string(),
        status::UNSUPPORTED_THUMBNAIL => "Unsupported thumbnail format".to_string(),
        status::INPUT_CLOSED => "No input stream, or input stream closed".to_string(),
        status::UNSUFFICIENT_MEMORY => "Unsufficient memory".to_string(),
        status::DATA_ERROR => "Corrupted data or unexpected EOF".to_string(),
        status::IO_ERROR => "Input/output error".to_string(),
        status::CANCELLED_BY_CALLBACK => "Cancelled by user callback".to_string(),
        status::BAD_CROP => "Bad crop box".to_string(),
        errno if errno > 0 => std::io::Error::from_raw_os_error(errno).to_string(),
        other => format!("Unknown error code {}", other),
    }
}

/// A non-success return from an engine entry point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct EngineFailure {
    pub code: i32,
    pub message: String,
}

impl EngineFailure {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn from_code(code: i32) -> Self {
        Self::new(code, describe(code))
    }

    pub fn is_missing_thumbnail(&self) -> bool {
        matches!(self.code, status::NO_THUMBNAIL | status::UNSUPPORTED_THUMBNAIL)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineFailure>;

/// Encoding of a memory image produced by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Compressed JPEG bytes, to be passed on verbatim.
    Jpeg,
    /// Row-major, channel-interleaved samples.
    Bitmap,
}

impl ImageKind {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(ImageKind::Jpeg),
            2 => Some(ImageKind::Bitmap),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ImageKind::Jpeg => 1,
            ImageKind::Bitmap => 2,
        }
    }
}

/// An owned copy of a `libraw_processed_image_t`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImage {
    pub kind: ImageKind,
    pub width: u16,
    pub height: u16,
    pub colors: u16,
    pub bits: u16,
    pub data: Vec<u8>,
}

/// Header fields of an engine-owned processed image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessedHeader {
    pub kind: ImageKind,
    pub width: u16,
    pub height: u16,
    pub colors: u16,
    pub bits: u16,
    pub data_size: usize,
    pub data_offset: usize,
}

impl ProcessedHeader {
    pub fn parse(layout: &CompiledLayout, header: &[u8]) -> EngineResult<Self> {
        let malformed = |e: crate::raw_pipeline::common::error::RawError| {
            EngineFailure::new(status::UNSPECIFIED_ERROR, format!("processed image header: {}", e))
        };

        let view = RecordView::new(layout, RecordKind::ProcessedImage, header).map_err(malformed)?;
        let code: u32 = view.read("type").map_err(malformed)?;
        let kind = ImageKind::from_code(code).ok_or_else(|| {
            EngineFailure::new(status::UNSPECIFIED_ERROR, format!("unknown image type {}", code))
        })?;

        Ok(Self {
            kind,
            width: view.read("width").map_err(malformed)?,
            height: view.read("height").map_err(malformed)?,
            colors: view.read("colors").map_err(malformed)?,
            bits: view.read("bits").map_err(malformed)?,
            data_size: view.read::<u32>("data_size").map_err(malformed)? as usize,
            data_offset: layout
                .locate(RecordKind::ProcessedImage, "data")
                .map_err(malformed)?
                .offset,
        })
    }

    pub fn block_len(&self) -> usize {
        self.data_offset + self.data_size
    }
}

impl ProcessedImage {
    /// Copy header and payload out of a complete processed image block.
    pub fn copy_from_block(layout: &CompiledLayout, block: &[u8]) -> EngineResult<Self> {
        let header = ProcessedHeader::parse(layout, block)?;
        let data = block
            .get(header.data_offset..header.block_len())
            .ok_or_else(|| {
                EngineFailure::new(
                    status::DATA_ERROR,
                    format!(
                        "processed image claims {} bytes, block has {}",
                        header.data_size,
                        block.len().saturating_sub(header.data_offset)
                    ),
                )
            })?
            .to_vec();

        Ok(Self {
            kind: header.kind,
            width: header.width,
            height: header.height,
            colors: header.colors,
            bits: header.bits,
            data,
        })
    }
}
