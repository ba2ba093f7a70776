//! Raw decode pipeline
//!
//! A versioned binding to the LibRaw decode engine: layouts per engine API
//! version, one-time version resolution, a per-file session state machine,
//! owned frames, and exporters.

pub mod common;
pub mod engine;
pub mod export;
pub mod frame;
pub mod layout;
pub mod resolver;
pub mod session;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use tracing::instrument;

pub use common::{ErrorCategory, RawError, Result};

pub use engine::{DecodeEngine, EngineFailure, ImageKind, LibRawEngine, ProcessedImage};

pub use export::{ExportConfig, ExportFormat, FrameWriter, PixmapWriter, TiffCompression, TiffFrameWriter};

pub use frame::{Frame, FrameMetadata, GpsInfo, LensInfo, Thumbnail};

pub use layout::{CompiledLayout, LayoutProvider, LayoutSet, RecordKind, RecordView, RecordViewMut};

pub use resolver::{EngineLocator, EngineVersion, Resolution, SystemLocator, VersionResolver};

pub use session::{
    ColorSpace, CropBox, DecodeSession, DemosaicQuality, GammaCurve, HighlightMode,
    ProcessingOptions, ProcessingOptionsBuilder, SessionState, Stage, StageTimings, ThumbnailState,
    WhiteBalance,
};

/// Open `path` with the system's LibRaw.
///
/// The engine version is resolved (once per process) before the file is
/// touched, so an unsupported engine fails without any file I/O.
pub fn open_session(path: impl AsRef<Path>) -> Result<DecodeSession<LibRawEngine>> {
    let resolution = resolver::global().resolve()?;
    let engine = LibRawEngine::shared(resolution)?;
    open_session_on(engine, path)
}

/// Like [`open_session`], with an explicit resolver.
pub fn open_session_with<L: EngineLocator>(
    resolver: &VersionResolver<L>,
    path: impl AsRef<Path>,
) -> Result<DecodeSession<LibRawEngine>> {
    let resolution = resolver.resolve()?;
    let engine = Arc::new(LibRawEngine::load(resolution)?);
    open_session_on(engine, path)
}

/// Open `path` on an already loaded engine.
#[instrument(skip_all, fields(engine = %engine.version_string()))]
pub fn open_session_on<E: DecodeEngine>(
    engine: Arc<E>,
    path: impl AsRef<Path>,
) -> Result<DecodeSession<E>> {
    let mut session = DecodeSession::new(engine);
    session.open(path)?;
    Ok(session)
}
