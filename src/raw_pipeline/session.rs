//! Decode Session
//!
//! The per-file state machine: open, unpack, process, export, close.

mod decode_session;
mod options;
mod path;
mod state;
mod timing;


pub use decode_session::DecodeSession;
pub use options::{
    ColorSpace, CropBox, DemosaicQuality, GammaCurve, HighlightMode, ProcessingOptions,
    ProcessingOptionsBuilder, WhiteBalance,
};
pub use path::engine_path;
pub use state::{SessionState, ThumbnailState};
pub use timing::{Stage, StageTimings};
