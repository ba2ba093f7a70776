//! Export formats and writer configuration

use std::path::Path;

use crate::raw_pipeline::common::error::{RawError, Result};

/// Output container for a processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExportFormat {
    /// Binary PPM (3 channels) or PGM (1 channel).
    #[default]
    Pixmap,
    /// TIFF.
    TaggedImage,
}

impl ExportFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "ppm" | "pgm" | "pnm" => Ok(ExportFormat::Pixmap),
            "tif" | "tiff" => Ok(ExportFormat::TaggedImage),
            _ => Err(RawError::ExportError(format!(
                "cannot infer an export format from {}",
                path.display()
            ))),
        }
    }

    /// Extension for a frame with `colors` channels.
    pub fn extension(&self, colors: u16) -> &'static str {
        match self {
            ExportFormat::Pixmap if colors == 1 => "pgm",
            ExportFormat::Pixmap => "ppm",
            ExportFormat::TaggedImage => "tiff",
        }
    }
}

/// TIFF compression methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiffCompression {
    #[default]
    None,
    Lzw,
    /// Deflate at the balanced level.
    Deflate,
}

/// Writer settings shared by every export path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportConfig {
    pub compression: TiffCompression,
    /// 2 enables horizontal differencing for compressed TIFFs.
    pub predictor: Option<u16>,
}

impl ExportConfig {
    pub fn with_compression(mut self, compression: TiffCompression) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_predictor(mut self, predictor: Option<u16>) -> Self {
        self.predictor = predictor;
        self
    }
}
