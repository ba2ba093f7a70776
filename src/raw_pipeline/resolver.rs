//! Version Resolver
//!
//! Detects which engine API version is installed, once per process, and
//! selects the matching layout descriptor set.

mod locator;
mod version;


use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{info, instrument};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::layout::{CompiledLayout, LayoutSet};

pub use locator::{EngineLocator, LIBRARY_PATH_ENV, SystemLocator, find_libraw_in_dir};
pub use version::{EngineVersion, parse_api_version};

/// Outcome of a successful resolution: where the engine is and how to talk to it.
#[derive(Debug, Clone)]
pub struct Resolution {
    version: EngineVersion,
    library_path: PathBuf,
    layout: Arc<CompiledLayout>,
}

impl Resolution {
    pub fn version(&self) -> EngineVersion {
        self.version
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    pub fn layout(&self) -> &Arc<CompiledLayout> {
        &self.layout
    }
}

// Cached failures must be cloneable, so they are kept apart from RawError.
#[derive(Debug, Clone)]
enum ResolveFailure {
    NotFound(String),
    Unsupported(u32),
    Layout(String),
}

impl From<&ResolveFailure> for RawError {
    fn from(failure: &ResolveFailure) -> Self {
        match failure {
            ResolveFailure::NotFound(msg) => RawError::EngineNotFound(msg.clone()),
            ResolveFailure::Unsupported(version) => RawError::UnsupportedVersion(*version),
            ResolveFailure::Layout(msg) => RawError::LayoutError(msg.clone()),
        }
    }
}

/// Resolves the engine version at most once and caches the result, success or failure.
pub struct VersionResolver<L: EngineLocator = SystemLocator> {
    locator: L,
    resolved: OnceLock<std::result::Result<Resolution, ResolveFailure>>,
}

impl<L: EngineLocator> VersionResolver<L> {
    pub fn new(locator: L) -> Self {
        Self {
            locator,
            resolved: OnceLock::new(),
        }
    }

    /// Concurrent first calls block until one of them has finished detection.
    pub fn resolve(&self) -> Result<&Resolution> {
        match self.resolved.get_or_init(|| self.detect()) {
            Ok(resolution) => Ok(resolution),
            Err(failure) => Err(failure.into()),
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    #[instrument(skip(self))]
    fn detect(&self) -> std::result::Result<Resolution, ResolveFailure> {
        let library_path = self
            .locator
            .locate()
            .map_err(|e| ResolveFailure::NotFound(e.to_string()))?;

        let version = parse_api_version(&library_path).ok_or_else(|| {
            ResolveFailure::NotFound(format!(
                "cannot read an API version from {}",
                library_path.display()
            ))
        })?;

        let set = LayoutSet::for_version(version.get())
            .map_err(|_| ResolveFailure::Unsupported(version.get()))?;
        let layout =
            CompiledLayout::compile(set).map_err(|e| ResolveFailure::Layout(e.to_string()))?;

        info!(
            "Resolved decode engine {} at {}",
            version,
            library_path.display()
        );

        Ok(Resolution {
            version,
            library_path,
            layout: Arc::new(layout),
        })
    }
}

/// The process-wide resolver backed by [`SystemLocator`].
pub fn global() -> &'static VersionResolver {
    static GLOBAL: OnceLock<VersionResolver> = OnceLock::new();
    GLOBAL.get_or_init(|| VersionResolver::new(SystemLocator::default()))
}
