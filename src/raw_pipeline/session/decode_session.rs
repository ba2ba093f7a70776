use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, info_span, instrument, warn};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::engine::{DecodeEngine, LibRawEngine};
use crate::raw_pipeline::export::{self, ExportConfig, ExportFormat};
use crate::raw_pipeline::frame::{Frame, FrameBuilder, FrameMetadata, Thumbnail};
use crate::raw_pipeline::layout::{RecordKind, RecordViewMut};
use crate::raw_pipeline::session::options::ProcessingOptions;
use crate::raw_pipeline::session::path::engine_path;
use crate::raw_pipeline::session::state::{SessionState, ThumbnailState};
use crate::raw_pipeline::session::timing::{Stage, StageTimings};

/// One raw file's trip through the decode engine.
///
/// The session owns the engine handle for its whole life and releases it
/// exactly once, on [`DecodeSession::close`] or on drop. Stages run on
/// demand: exporting processes, processing unpacks.
pub struct DecodeSession<E: DecodeEngine = LibRawEngine> {
    engine: Arc<E>,
    handle: Option<E::Handle>,
    state: SessionState,
    thumbnail_state: ThumbnailState,
    options: ProcessingOptions,
    processed_with: Option<ProcessingOptions>,
    frame: Option<Arc<Frame>>,
    thumbnail: Option<Arc<Thumbnail>>,
    source: Option<PathBuf>,
    export_config: ExportConfig,
    timings: StageTimings,
}

fn live_handle<'s, H>(
    state: SessionState,
    handle: &'s mut Option<H>,
    operation: &'static str,
) -> Result<&'s mut H> {
    if state == SessionState::Closed {
        return Err(RawError::SessionClosed);
    }
    handle.as_mut().ok_or(RawError::NotOpen(operation))
}

impl<E: DecodeEngine> DecodeSession<E> {
    pub fn new(engine: Arc<E>) -> Self {
        Self {
            engine,
            handle: None,
            state: SessionState::Unopened,
            thumbnail_state: ThumbnailState::NotUnpacked,
            options: ProcessingOptions::default(),
            processed_with: None,
            frame: None,
            thumbnail: None,
            source: None,
            export_config: ExportConfig::default(),
            timings: StageTimings::new(),
        }
    }

    pub fn with_export_config(mut self, config: ExportConfig) -> Self {
        self.export_config = config;
        self
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn thumbnail_state(&self) -> ThumbnailState {
        self.thumbnail_state
    }

    /// Options used by the next implicit processing run.
    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    fn check_live(&self, operation: &'static str) -> Result<()> {
        match self.state {
            SessionState::Closed => Err(RawError::SessionClosed),
            SessionState::Unopened => Err(RawError::NotOpen(operation)),
            _ => Ok(()),
        }
    }

    /// Bind the session to a file. On failure no handle is kept and the
    /// session stays unopened.
    #[instrument(skip_all)]
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        match self.state {
            SessionState::Closed => return Err(RawError::SessionClosed),
            SessionState::Unopened => {}
            _ => {
                return Err(RawError::OpenError(format!(
                    "session already holds {}",
                    self.source
                        .as_deref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_default()
                )));
            }
        }

        info!("Opening {}", path.display());
        let c_path = engine_path(path).map_err(RawError::OpenError)?;
        let started = Instant::now();

        let mut handle = self
            .engine
            .init()
            .map_err(|e| RawError::OpenError(format!("engine init: {}", e)))?;
        if let Err(e) = self.engine.open(&mut handle, &c_path) {
            self.engine.close(handle);
            return Err(RawError::OpenError(format!("{}: {}", path.display(), e)));
        }

        self.timings.record_since(Stage::Open, started);
        self.handle = Some(handle);
        self.source = Some(path.to_path_buf());
        self.state = SessionState::Opened;
        Ok(())
    }

    /// Read sensor data. A no-op once unpacked.
    #[instrument(skip(self))]
    pub fn unpack(&mut self) -> Result<()> {
        self.check_live("unpack")?;
        if self.state >= SessionState::Unpacked {
            debug!("Already unpacked");
            return Ok(());
        }

        let started = Instant::now();
        let handle = live_handle(self.state, &mut self.handle, "unpack")?;
        self.engine
            .unpack(handle)
            .map_err(|e| RawError::UnpackError(e.to_string()))?;
        self.timings.record_since(Stage::Unpack, started);

        self.state = SessionState::Unpacked;
        info!("Unpacked sensor data");
        Ok(())
    }

    /// Extract the embedded preview. Independent of the main pipeline.
    #[instrument(skip(self))]
    pub fn unpack_thumbnail(&mut self) -> Result<()> {
        self.check_live("unpack_thumbnail")?;
        if self.thumbnail_state == ThumbnailState::Unpacked {
            return Ok(());
        }

        let started = Instant::now();
        let handle = live_handle(self.state, &mut self.handle, "unpack_thumbnail")?;
        self.engine.unpack_thumbnail(handle).map_err(|e| {
            if !e.is_missing_thumbnail() {
                warn!("Thumbnail extraction failed: {}", e);
            }
            RawError::ThumbnailUnavailable(e.to_string())
        })?;
        self.timings.record_since(Stage::UnpackThumbnail, started);

        self.thumbnail_state = ThumbnailState::Unpacked;
        Ok(())
    }

    /// Run the processing pipeline with `options`, unpacking first if needed.
    ///
    /// Repeating a run with the same options reuses the existing frame;
    /// different options re-process from the unpacked data.
    #[instrument(skip_all)]
    pub fn process(&mut self, options: &ProcessingOptions) -> Result<()> {
        self.check_live("process")?;
        // A rejected run leaves the current options and frame in place.
        options.validate()?;
        if self.options != *options {
            self.options = options.clone();
        }
        self.ensure_processed()
    }

    fn is_current(&self) -> bool {
        self.state >= SessionState::Processed
            && self.frame.is_some()
            && self.processed_with.as_ref() == Some(&self.options)
    }

    fn ensure_processed(&mut self) -> Result<()> {
        if self.is_current() {
            debug!("Processed frame is current");
            return Ok(());
        }

        self.unpack()?;
        if self.state > SessionState::Unpacked {
            debug!("Options changed, re-processing");
            self.state = SessionState::Unpacked;
        }
        self.frame = None;
        self.processed_with = None;

        let started = Instant::now();
        let frame = {
            let _span = info_span!("process_frame").entered();
            let handle = live_handle(self.state, &mut self.handle, "process")?;
            let engine = &*self.engine;

            let mut data = RecordViewMut::new(engine.layout(), RecordKind::Data, engine.data_mut(handle))?;
            self.options.apply(&mut data)?;

            engine
                .process(handle)
                .map_err(|e| RawError::ProcessError(e.to_string()))?;
            let image = engine
                .make_memory_image(handle)
                .map_err(|e| RawError::ProcessError(e.to_string()))?;
            FrameBuilder::new(engine.layout()).build_frame(engine.data(handle), image)?
        };
        self.timings.record_since(Stage::Process, started);

        info!(
            "Processed {}x{}x{} frame at {} bits",
            frame.width(),
            frame.height(),
            frame.colors(),
            frame.bits()
        );
        self.frame = Some(Arc::new(frame));
        self.processed_with = Some(self.options.clone());
        self.state = SessionState::Processed;
        Ok(())
    }

    fn export_frame(&mut self, operation: &'static str) -> Result<Arc<Frame>> {
        self.check_live(operation)?;
        self.ensure_processed()?;
        let frame = self
            .frame
            .clone()
            .ok_or_else(|| RawError::ProcessError("no frame after processing".to_string()))?;
        self.state = SessionState::Exported;
        Ok(frame)
    }

    /// The processed frame, processing with the current options if needed.
    pub fn frame(&mut self) -> Result<Arc<Frame>> {
        self.export_frame("frame")
    }

    /// Raw samples, `width * height * colors * bits / 8` bytes.
    pub fn to_buffer(&mut self) -> Result<Vec<u8>> {
        let frame = self.export_frame("to_buffer")?;
        Ok(export::export_to_buffer(&frame))
    }

    /// The frame encoded as a PPM/PGM or TIFF file image.
    pub fn encode(&mut self, format: ExportFormat) -> Result<Vec<u8>> {
        let frame = self.export_frame("encode")?;
        export::encode(&frame, format, &self.export_config)
    }

    #[instrument(skip(self, path))]
    pub fn save(&mut self, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
        let frame = self.export_frame("save")?;
        let started = Instant::now();
        export::export_to_file(&frame, path.as_ref(), format, &self.export_config)?;
        self.timings.record_since(Stage::Save, started);
        Ok(())
    }

    /// Let the engine encode and write the processed image itself.
    #[instrument(skip(self, path))]
    pub fn save_native(&mut self, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
        let path = path.as_ref();
        self.export_frame("save_native")?;
        let c_path = engine_path(path).map_err(RawError::ExportError)?;

        let started = Instant::now();
        let handle = live_handle(self.state, &mut self.handle, "save_native")?;
        let engine = &*self.engine;
        {
            let mut data = RecordViewMut::new(engine.layout(), RecordKind::Data, engine.data_mut(handle))?;
            data.write("params.output_tiff", (format == ExportFormat::TaggedImage) as i32)?;
        }
        engine
            .write_image(handle, &c_path)
            .map_err(|e| RawError::ExportError(format!("{}: {}", path.display(), e)))?;
        self.timings.record_since(Stage::SaveNative, started);

        info!("Engine wrote {:?} to {}", format, path.display());
        Ok(())
    }

    /// The embedded preview, extracted on first use.
    pub fn thumbnail(&mut self) -> Result<Arc<Thumbnail>> {
        self.unpack_thumbnail()?;
        if let Some(thumbnail) = &self.thumbnail {
            return Ok(Arc::clone(thumbnail));
        }

        let handle = live_handle(self.state, &mut self.handle, "thumbnail")?;
        let image = self
            .engine
            .make_memory_thumbnail(handle)
            .map_err(|e| RawError::ThumbnailUnavailable(e.to_string()))?;
        let thumbnail = Arc::new(FrameBuilder::new(self.engine.layout()).build_thumbnail(image)?);
        debug!(
            "Thumbnail {}x{} ({} bytes)",
            thumbnail.width,
            thumbnail.height,
            thumbnail.data.len()
        );

        self.thumbnail = Some(Arc::clone(&thumbnail));
        Ok(thumbnail)
    }

    pub fn thumbnail_to_buffer(&mut self) -> Result<Vec<u8>> {
        let thumbnail = self.thumbnail()?;
        export::thumbnail_to_buffer(&thumbnail)
    }

    pub fn save_thumbnail(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let thumbnail = self.thumbnail()?;
        export::write_thumbnail(&thumbnail, path.as_ref())
    }

    pub fn save_thumbnail_native(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.unpack_thumbnail()?;
        let c_path = engine_path(path).map_err(RawError::ExportError)?;
        let handle = live_handle(self.state, &mut self.handle, "save_thumbnail_native")?;
        self.engine
            .write_thumbnail(handle, &c_path)
            .map_err(|e| RawError::ExportError(format!("{}: {}", path.display(), e)))
    }

    /// Capture metadata, available as soon as the file is open.
    pub fn metadata(&self) -> Result<FrameMetadata> {
        self.check_live("metadata")?;
        let handle = self.handle.as_ref().ok_or(RawError::NotOpen("metadata"))?;
        FrameBuilder::new(self.engine.layout()).metadata(self.engine.data(handle))
    }

    /// Release the engine handle. Safe to call any number of times.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Some(handle) = self.handle.take() {
            self.engine.close(handle);
            debug!(
                "Closed {}",
                self.source
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default()
            );
        }
        self.state = SessionState::Closed;
    }
}

impl<E: DecodeEngine> Drop for DecodeSession<E> {
    fn drop(&mut self) {
        self.close();
    }
}
