use tracing::debug;

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::layout::types::{ArrayBounds, FieldDescriptor, LayoutProvider, RecordKind};
use crate::raw_pipeline::layout::{api_10, api_11};

/// The closed set of engine API versions this crate knows how to marshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSet {
    Api10,
    Api11,
}

impl LayoutSet {
    pub const SUPPORTED: [LayoutSet; 2] = [LayoutSet::Api10, LayoutSet::Api11];

    /// Look up the descriptor set registered for an engine API version.
    pub fn for_version(version: u32) -> Result<Self> {
        let set = Self::SUPPORTED
            .iter()
            .copied()
            .find(|set| set.api_version() == version)
            .ok_or(RawError::UnsupportedVersion(version))?;
        debug!("Selected layout set for API {} (release {})", version, set.release());
        Ok(set)
    }

    pub fn supported_versions() -> Vec<u32> {
        Self::SUPPORTED.iter().map(|set| set.api_version()).collect()
    }
}

impl LayoutProvider for LayoutSet {
    fn api_version(&self) -> u32 {
        match self {
            LayoutSet::Api10 => api_10::API_VERSION,
            LayoutSet::Api11 => api_11::API_VERSION,
        }
    }

    fn release(&self) -> &'static str {
        match self {
            LayoutSet::Api10 => api_10::RELEASE,
            LayoutSet::Api11 => api_11::RELEASE,
        }
    }

    fn record(&self, kind: RecordKind) -> Option<&'static [FieldDescriptor]> {
        match self {
            LayoutSet::Api10 => api_10::record(kind),
            LayoutSet::Api11 => api_11::record(kind),
        }
    }

    fn array_bounds(&self) -> ArrayBounds {
        match self {
            LayoutSet::Api10 => api_10::BOUNDS,
            LayoutSet::Api11 => api_11::BOUNDS,
        }
    }
}
