//! LibRaw loaded at runtime.
//!
//! The shared library found by the resolver is opened with `libloading`,
//! every entry point is resolved once, and the `Library` is kept alive next
//! to the copied function pointers.

use std::ffi::{CStr, c_char, c_int, c_uint, c_void};
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, instrument};

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::engine::decode_engine::DecodeEngine;
use crate::raw_pipeline::engine::types::{
    EngineFailure, EngineResult, ProcessedHeader, ProcessedImage, describe, status,
};
use crate::raw_pipeline::layout::{CompiledLayout, RecordKind};
use crate::raw_pipeline::resolver::{EngineVersion, Resolution};

type InitFn = unsafe extern "C" fn(c_uint) -> *mut c_void;
type HandleFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type CloseFn = unsafe extern "C" fn(*mut c_void);
type PathFn = unsafe extern "C" fn(*mut c_void, *const c_char) -> c_int;
type MemImageFn = unsafe extern "C" fn(*mut c_void, *mut c_int) -> *mut c_void;
type ClearMemFn = unsafe extern "C" fn(*mut c_void);
type StrErrorFn = unsafe extern "C" fn(c_int) -> *const c_char;
type VersionFn = unsafe extern "C" fn() -> *const c_char;

/// Owner of one `libraw_data_t` allocated by `libraw_init`.
#[derive(Debug)]
pub struct LibRawHandle {
    ptr: NonNull<c_void>,
}

// Safety: the handle is only touched through `&mut` or by value, so calls on
// it never overlap, and LibRaw keeps no thread-local state per handle.
unsafe impl Send for LibRawHandle {}

/// Releases a `libraw_processed_image_t` when the copy-out is done.
struct MemImageGuard {
    block: NonNull<c_void>,
    clear: ClearMemFn,
}

impl Drop for MemImageGuard {
    fn drop(&mut self) {
        // Safety: the block came from libraw_dcraw_make_mem_{image,thumb} and is released once.
        unsafe { (self.clear)(self.block.as_ptr()) }
    }
}

pub struct LibRawEngine {
    layout: Arc<CompiledLayout>,
    version: EngineVersion,
    library_path: PathBuf,
    data_size: usize,
    header_size: usize,
    init_fn: InitFn,
    open_file_fn: PathFn,
    close_fn: CloseFn,
    unpack_fn: HandleFn,
    unpack_thumb_fn: HandleFn,
    process_fn: HandleFn,
    make_mem_image_fn: MemImageFn,
    make_mem_thumb_fn: MemImageFn,
    image_writer_fn: PathFn,
    thumb_writer_fn: PathFn,
    clear_mem_fn: ClearMemFn,
    strerror_fn: StrErrorFn,
    version_fn: VersionFn,
    _library: libloading::Library,
}

// Safety: the struct only holds immutable function pointers into a library
// that stays loaded for its whole lifetime.
unsafe impl Send for LibRawEngine {}
unsafe impl Sync for LibRawEngine {}

impl std::fmt::Debug for LibRawEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibRawEngine")
            .field("version", &self.version)
            .field("library_path", &self.library_path)
            .field("data_size", &self.data_size)
            .finish()
    }
}

fn symbol<T: Copy>(library: &libloading::Library, name: &[u8]) -> Result<T> {
    // Safety: every name is paired with its C prototype by the callers below.
    let sym: libloading::Symbol<'_, T> = unsafe { library.get(name) }.map_err(|e| {
        RawError::EngineNotFound(format!(
            "missing symbol {}: {}",
            String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)),
            e
        ))
    })?;
    Ok(*sym)
}

impl LibRawEngine {
    /// Open the library a resolution points at and bind its entry points.
    #[instrument(skip(resolution), fields(version = %resolution.version()))]
    pub fn load(resolution: &Resolution) -> Result<Self> {
        let path = resolution.library_path();
        // Safety: loading a system-managed library binary; its initializers are trusted.
        let library = unsafe { libloading::Library::new(path) }
            .map_err(|e| RawError::EngineNotFound(format!("dlopen {}: {}", path.display(), e)))?;

        let layout = Arc::clone(resolution.layout());
        let data_size = layout.size_of(RecordKind::Data)?;
        let header_size = layout.size_of(RecordKind::ProcessedImage)?;

        let engine = Self {
            version: resolution.version(),
            library_path: path.to_path_buf(),
            data_size,
            header_size,
            init_fn: symbol(&library, b"libraw_init\0")?,
            open_file_fn: symbol(&library, b"libraw_open_file\0")?,
            close_fn: symbol(&library, b"libraw_close\0")?,
            unpack_fn: symbol(&library, b"libraw_unpack\0")?,
            unpack_thumb_fn: symbol(&library, b"libraw_unpack_thumb\0")?,
            process_fn: symbol(&library, b"libraw_dcraw_process\0")?,
            make_mem_image_fn: symbol(&library, b"libraw_dcraw_make_mem_image\0")?,
            make_mem_thumb_fn: symbol(&library, b"libraw_dcraw_make_mem_thumb\0")?,
            image_writer_fn: symbol(&library, b"libraw_dcraw_ppm_tiff_writer\0")?,
            thumb_writer_fn: symbol(&library, b"libraw_dcraw_thumb_writer\0")?,
            clear_mem_fn: symbol(&library, b"libraw_dcraw_clear_mem\0")?,
            strerror_fn: symbol(&library, b"libraw_strerror\0")?,
            version_fn: symbol(&library, b"libraw_version\0")?,
            layout,
            _library: library,
        };

        info!(
            "Loaded LibRaw {} from {}",
            engine.version_string(),
            engine.library_path.display()
        );
        Ok(engine)
    }

    /// The engine behind the process-wide resolution, loaded once.
    pub fn shared(resolution: &Resolution) -> Result<Arc<Self>> {
        static SHARED: OnceLock<std::result::Result<Arc<LibRawEngine>, String>> = OnceLock::new();
        SHARED
            .get_or_init(|| LibRawEngine::load(resolution).map(Arc::new).map_err(|e| e.to_string()))
            .clone()
            .map_err(RawError::EngineNotFound)
    }

    pub fn api_version(&self) -> EngineVersion {
        self.version
    }

    pub fn library_path(&self) -> &Path {
        &self.library_path
    }

    fn failure(&self, code: c_int) -> EngineFailure {
        if code > 0 {
            return EngineFailure::from_code(code);
        }
        // Safety: libraw_strerror returns a static string for every code.
        let text = unsafe { (self.strerror_fn)(code) };
        if text.is_null() {
            return EngineFailure::new(code, describe(code));
        }
        // Safety: non-null and NUL-terminated.
        let message = unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned();
        EngineFailure::new(code, message)
    }

    fn check(&self, code: c_int) -> EngineResult<()> {
        if code == status::SUCCESS {
            Ok(())
        } else {
            Err(self.failure(code))
        }
    }

    fn copy_out(&self, block: *mut c_void, errc: c_int) -> EngineResult<ProcessedImage> {
        let Some(block) = NonNull::new(block) else {
            let code = if errc != status::SUCCESS {
                errc
            } else {
                status::UNSPECIFIED_ERROR
            };
            return Err(self.failure(code));
        };
        let _guard = MemImageGuard {
            block,
            clear: self.clear_mem_fn,
        };

        let base = block.as_ptr() as *const u8;
        // Safety: LibRaw allocates sizeof(libraw_processed_image_t) + data_size bytes.
        let header = unsafe { std::slice::from_raw_parts(base, self.header_size) };
        let parsed = ProcessedHeader::parse(&self.layout, header)?;
        let len = parsed.block_len().max(self.header_size);
        // Safety: as above, the payload follows the header inside the same allocation.
        let bytes = unsafe { std::slice::from_raw_parts(base, len) };

        let image = ProcessedImage::copy_from_block(&self.layout, bytes)?;
        debug!(
            "Copied {:?} image {}x{}x{} at {} bits",
            image.kind, image.width, image.height, image.colors, image.bits
        );
        Ok(image)
    }
}

impl DecodeEngine for LibRawEngine {
    type Handle = LibRawHandle;

    fn layout(&self) -> &CompiledLayout {
        &self.layout
    }

    fn version_string(&self) -> String {
        // Safety: libraw_version returns a static NUL-terminated string.
        let text = unsafe { (self.version_fn)() };
        if text.is_null() {
            return self.version.to_string();
        }
        unsafe { CStr::from_ptr(text) }.to_string_lossy().into_owned()
    }

    fn init(&self) -> EngineResult<LibRawHandle> {
        // Safety: flags 0 asks for the default allocator and no callbacks.
        let ptr = unsafe { (self.init_fn)(0) };
        NonNull::new(ptr)
            .map(|ptr| LibRawHandle { ptr })
            .ok_or_else(|| {
                EngineFailure::new(status::UNSUFFICIENT_MEMORY, "libraw_init returned null")
            })
    }

    fn open(&self, handle: &mut LibRawHandle, path: &CStr) -> EngineResult<()> {
        self.check(unsafe { (self.open_file_fn)(handle.ptr.as_ptr(), path.as_ptr()) })
    }

    fn close(&self, handle: LibRawHandle) {
        // Safety: the handle is consumed, so libraw_close runs once per libraw_init.
        unsafe { (self.close_fn)(handle.ptr.as_ptr()) }
    }

    fn unpack(&self, handle: &mut LibRawHandle) -> EngineResult<()> {
        self.check(unsafe { (self.unpack_fn)(handle.ptr.as_ptr()) })
    }

    fn unpack_thumbnail(&self, handle: &mut LibRawHandle) -> EngineResult<()> {
        self.check(unsafe { (self.unpack_thumb_fn)(handle.ptr.as_ptr()) })
    }

    fn process(&self, handle: &mut LibRawHandle) -> EngineResult<()> {
        self.check(unsafe { (self.process_fn)(handle.ptr.as_ptr()) })
    }

    fn make_memory_image(&self, handle: &mut LibRawHandle) -> EngineResult<ProcessedImage> {
        let mut errc: c_int = 0;
        let block = unsafe { (self.make_mem_image_fn)(handle.ptr.as_ptr(), &mut errc) };
        self.copy_out(block, errc)
    }

    fn make_memory_thumbnail(&self, handle: &mut LibRawHandle) -> EngineResult<ProcessedImage> {
        let mut errc: c_int = 0;
        let block = unsafe { (self.make_mem_thumb_fn)(handle.ptr.as_ptr(), &mut errc) };
        self.copy_out(block, errc)
    }

    fn write_image(&self, handle: &mut LibRawHandle, path: &CStr) -> EngineResult<()> {
        self.check(unsafe { (self.image_writer_fn)(handle.ptr.as_ptr(), path.as_ptr()) })
    }

    fn write_thumbnail(&self, handle: &mut LibRawHandle, path: &CStr) -> EngineResult<()> {
        self.check(unsafe { (self.thumb_writer_fn)(handle.ptr.as_ptr(), path.as_ptr()) })
    }

    fn data<'h>(&self, handle: &'h LibRawHandle) -> &'h [u8] {
        // Safety: libraw_init allocated a libraw_data_t of exactly this layout.
        unsafe { std::slice::from_raw_parts(handle.ptr.as_ptr() as *const u8, self.data_size) }
    }

    fn data_mut<'h>(&self, handle: &'h mut LibRawHandle) -> &'h mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(handle.ptr.as_ptr() as *mut u8, self.data_size) }
    }
}
