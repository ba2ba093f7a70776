use tracing::{debug, instrument};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::engine::{ImageKind, ProcessedImage};
use crate::raw_pipeline::frame::metadata::FrameMetadata;
use crate::raw_pipeline::frame::types::{Frame, Thumbnail};
use crate::raw_pipeline::layout::{CompiledLayout, RecordKind, RecordView};

/// Builds owned snapshots from what the engine hands back.
///
/// `data` is the handle's `libraw_data_t`; the image has already been
/// copied out of engine memory.
pub struct FrameBuilder<'a> {
    layout: &'a CompiledLayout,
}

impl<'a> FrameBuilder<'a> {
    pub fn new(layout: &'a CompiledLayout) -> Self {
        Self { layout }
    }

    pub fn metadata(&self, data: &[u8]) -> Result<FrameMetadata> {
        let view = RecordView::new(self.layout, RecordKind::Data, data)?;
        FrameMetadata::read(&view)
    }

    #[instrument(skip_all, fields(width = image.width, height = image.height, bits = image.bits))]
    pub fn build_frame(&self, data: &[u8], image: ProcessedImage) -> Result<Frame> {
        if image.kind != ImageKind::Bitmap {
            return Err(RawError::ProcessError(format!(
                "engine produced a {:?} image, expected a bitmap",
                image.kind
            )));
        }

        let metadata = self.metadata(data)?;
        let frame = Frame::new(
            image.width as u32,
            image.height as u32,
            image.colors,
            image.bits,
            image.data,
            metadata,
        )?;
        debug!("Built frame of {} bytes", frame.data().len());
        Ok(frame)
    }

    pub fn build_thumbnail(&self, image: ProcessedImage) -> Result<Thumbnail> {
        if image.data.is_empty() {
            return Err(RawError::ThumbnailUnavailable(
                "engine returned an empty thumbnail".to_string(),
            ));
        }
        Ok(Thumbnail {
            kind: image.kind,
            width: image.width,
            height: image.height,
            colors: image.colors,
            bits: image.bits,
            data: image.data,
        })
    }
}
