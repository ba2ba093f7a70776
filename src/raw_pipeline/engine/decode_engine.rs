use std::ffi::CStr;

use crate::raw_pipeline::engine::types::{EngineResult, ProcessedImage};
use crate::raw_pipeline::layout::CompiledLayout;

/// The decode engine's entry points, one method per native call.
///
/// A handle is owned by exactly one session. `close` consumes it, so it can
/// only be released once. Calls on the same handle must not overlap.
pub trait DecodeEngine: Send + Sync {
    type Handle: Send;

    /// Layout of the records this engine exchanges.
    fn layout(&self) -> &CompiledLayout;

    /// Human-readable engine release string.
    fn version_string(&self) -> String;

    fn init(&self) -> EngineResult<Self::Handle>;
    fn open(&self, handle: &mut Self::Handle, path: &CStr) -> EngineResult<()>;
    fn close(&self, handle: Self::Handle);
    fn unpack(&self, handle: &mut Self::Handle) -> EngineResult<()>;
    fn unpack_thumbnail(&self, handle: &mut Self::Handle) -> EngineResult<()>;
    fn process(&self, handle: &mut Self::Handle) -> EngineResult<()>;

    /// Copy the processed image out of the engine and release the engine's copy.
    fn make_memory_image(&self, handle: &mut Self::Handle) -> EngineResult<ProcessedImage>;
    fn make_memory_thumbnail(&self, handle: &mut Self::Handle) -> EngineResult<ProcessedImage>;

    /// Let the engine write a PPM or TIFF itself, as selected by `params.output_tiff`.
    fn write_image(&self, handle: &mut Self::Handle, path: &CStr) -> EngineResult<()>;
    fn write_thumbnail(&self, handle: &mut Self::Handle, path: &CStr) -> EngineResult<()>;

    /// The handle's `libraw_data_t`, sized by [`DecodeEngine::layout`].
    fn data<'h>(&self, handle: &'h Self::Handle) -> &'h [u8];
    fn data_mut<'h>(&self, handle: &'h mut Self::Handle) -> &'h mut [u8];
}
