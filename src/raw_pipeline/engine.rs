//! Engine Boundary
//!
//! The native decode engine seen through the [`DecodeEngine`] trait. Every
//! call returns a status that is turned into an [`EngineFailure`] here; the
//! session maps failures to the error of the stage that made the call.

mod decode_engine;
mod libraw_engine;
mod types;

#[cfg(test)]
pub(crate) mod mock;


pub use decode_engine::DecodeEngine;
pub use libraw_engine::{LibRawEngine, LibRawHandle};
pub use types::{
    EngineFailure, EngineResult, ImageKind, ProcessedHeader, ProcessedImage, describe, status,
};
