//! Exporters
//!
//! Turn frames and thumbnails into bytes or files. Frames are encoded as
//! PPM/PGM or TIFF; JPEG thumbnails are passed through untouched.

mod pixmap_writer;
mod tiff_writer;
mod types;
mod writer;


use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{info, instrument};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::frame::{Frame, Thumbnail};

pub use pixmap_writer::PixmapWriter;
pub use tiff_writer::TiffFrameWriter;
pub use types::{ExportConfig, ExportFormat, TiffCompression};
pub use writer::{FrameWriter, PixelView};

pub fn writer_for(format: ExportFormat, config: &ExportConfig) -> Box<dyn FrameWriter> {
    match format {
        ExportFormat::Pixmap => Box::new(PixmapWriter),
        ExportFormat::TaggedImage => Box::new(TiffFrameWriter::new(config.clone())),
    }
}

/// The frame's samples exactly as held, `width * height * colors * bits / 8` bytes.
pub fn export_to_buffer(frame: &Frame) -> Vec<u8> {
    frame.data().to_vec()
}

/// Encode a frame into an in-memory file of the given format.
pub fn encode(frame: &Frame, format: ExportFormat, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    writer_for(format, config).write_frame(frame, &mut buffer)?;
    Ok(buffer)
}

#[instrument(skip(frame, config), fields(path = %path.display()))]
pub fn export_to_file(
    frame: &Frame,
    path: &Path,
    format: ExportFormat,
    config: &ExportConfig,
) -> Result<()> {
    let mut output = create(path)?;
    writer_for(format, config).write_frame(frame, &mut output)?;
    output
        .flush()
        .map_err(|e| RawError::ExportError(format!("{}: {}", path.display(), e)))?;

    info!(
        "Wrote {}x{} {:?} to {}",
        frame.width(),
        frame.height(),
        format,
        path.display()
    );
    Ok(())
}

/// JPEG previews verbatim, bitmap previews as PPM/PGM.
pub fn thumbnail_to_buffer(thumbnail: &Thumbnail) -> Result<Vec<u8>> {
    if thumbnail.is_jpeg() {
        return Ok(thumbnail.data.clone());
    }

    let pixels = PixelView {
        width: thumbnail.width as u32,
        height: thumbnail.height as u32,
        colors: thumbnail.colors,
        bits: thumbnail.bits,
        data: &thumbnail.data,
    };
    let expected = crate::raw_pipeline::frame::expected_len(
        pixels.width,
        pixels.height,
        pixels.colors,
        pixels.bits,
    );
    if pixels.data.len() < expected {
        return Err(RawError::ExportError(format!(
            "thumbnail bitmap holds {} bytes, expected {}",
            pixels.data.len(),
            expected
        )));
    }

    let mut buffer = Vec::new();
    PixmapWriter.write_pixels(
        PixelView {
            data: &pixels.data[..expected],
            ..pixels
        },
        &mut buffer,
    )?;
    Ok(buffer)
}

#[instrument(skip(thumbnail), fields(path = %path.display()))]
pub fn write_thumbnail(thumbnail: &Thumbnail, path: &Path) -> Result<()> {
    let bytes = thumbnail_to_buffer(thumbnail)?;
    let mut output = create(path)?;
    output
        .write_all(&bytes)
        .and_then(|_| output.flush())
        .map_err(|e| RawError::ExportError(format!("{}: {}", path.display(), e)))?;

    info!("Wrote {} byte thumbnail to {}", bytes.len(), path.display());
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| RawError::ExportError(format!("{}: {}", path.display(), e)))
}
