use thiserror::Error;

#[derive(Error, Debug)]
pub enum RawError {
    #[error("Decode engine not found: {0}")]
    EngineNotFound(String),

    #[error("Unsupported engine API version {0}")]
    UnsupportedVersion(u32),

    #[error("Failed to open raw file: {0}")]
    OpenError(String),

    #[error("Failed to unpack sensor data: {0}")]
    UnpackError(String),

    #[error("No usable embedded thumbnail: {0}")]
    ThumbnailUnavailable(String),

    #[error("Failed to process raw data: {0}")]
    ProcessError(String),

    #[error("Session is closed")]
    SessionClosed,

    #[error("Failed to export image: {0}")]
    ExportError(String),

    #[error("No raw file is open for {0}")]
    NotOpen(&'static str),

    #[error("Layout error: {0}")]
    LayoutError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Coarse grouping of errors for callers that only need to know who is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The input or output file is missing, corrupt, unsupported or unwritable.
    File,
    /// The decode engine is missing, the wrong version, or failed internally.
    Engine,
    /// The caller used the API out of order.
    Usage,
}

impl RawError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RawError::EngineNotFound(_)
            | RawError::UnsupportedVersion(_)
            | RawError::ProcessError(_)
            | RawError::LayoutError(_) => ErrorCategory::Engine,
            RawError::OpenError(_)
            | RawError::UnpackError(_)
            | RawError::ThumbnailUnavailable(_)
            | RawError::ExportError(_)
            | RawError::IoError(_) => ErrorCategory::File,
            RawError::SessionClosed | RawError::NotOpen(_) => ErrorCategory::Usage,
        }
    }
}

pub type Result<T> = std::result::Result<T, RawError>;
