//! Frame Data Model
//!
//! Owned snapshots of processed pixels, embedded previews and capture
//! metadata. Nothing here points into engine memory.

mod builder;
mod metadata;
mod types;

#[cfg(test)]
mod tests;

pub use builder::FrameBuilder;
pub use metadata::{FrameMetadata, GpsInfo, LensInfo};
pub use types::{Frame, Thumbnail, expected_len};
