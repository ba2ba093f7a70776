//! In-process engine over a plain byte buffer, for tests.
//!
//! Records are laid out with the real compiled layout, so everything above
//! the engine boundary runs exactly as it does against LibRaw. Inputs are
//! accepted when the file starts with [`MOCK_MAGIC`].

use std::ffi::CStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::raw_pipeline::engine::decode_engine::DecodeEngine;
use crate::raw_pipeline::engine::types::{
    EngineFailure, EngineResult, ImageKind, ProcessedImage, status,
};
use crate::raw_pipeline::layout::{CompiledLayout, RecordKind, RecordView, RecordViewMut};

pub(crate) const MOCK_MAGIC: &[u8] = b"MOCKRAW";
pub(crate) const MOCK_THUMBNAIL_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x10, 0x4A, 0xFF, 0xD9];

#[derive(Debug, Default)]
pub(crate) struct MockCalls {
    pub init: AtomicUsize,
    pub open: AtomicUsize,
    pub close: AtomicUsize,
    pub unpack: AtomicUsize,
    pub unpack_thumbnail: AtomicUsize,
    pub process: AtomicUsize,
    pub make_image: AtomicUsize,
    pub make_thumbnail: AtomicUsize,
    pub write_image: AtomicUsize,
    pub write_thumbnail: AtomicUsize,
}

impl MockCalls {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockConfig {
    pub width: u16,
    pub height: u16,
    pub thumbnail: Option<ProcessedImage>,
    pub fail_unpack: bool,
    pub fail_process: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 4,
            thumbnail: Some(ProcessedImage {
                kind: ImageKind::Jpeg,
                width: 160,
                height: 120,
                colors: 3,
                bits: 8,
                data: MOCK_THUMBNAIL_JPEG.to_vec(),
            }),
            fail_unpack: false,
            fail_process: false,
        }
    }
}

#[derive(Debug)]
pub(crate) struct MockHandle {
    data: Vec<u8>,
    opened: bool,
    unpacked: bool,
    thumbnail_unpacked: bool,
    processed: bool,
}

pub(crate) struct MockEngine {
    layout: CompiledLayout,
    config: MockConfig,
    pub calls: Arc<MockCalls>,
}

impl MockEngine {
    pub fn new(api_version: u32) -> Self {
        Self::with_config(api_version, MockConfig::default())
    }

    pub fn with_config(api_version: u32, config: MockConfig) -> Self {
        Self {
            layout: CompiledLayout::for_version(api_version).unwrap(),
            config,
            calls: Arc::new(MockCalls::default()),
        }
    }

    fn count(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    fn data_view<'h>(&'h self, handle: &'h MockHandle) -> RecordView<'h> {
        RecordView::new(&self.layout, RecordKind::Data, &handle.data).unwrap()
    }

    fn fill_metadata(&self, handle: &mut MockHandle) {
        let mut data = RecordViewMut::new(&self.layout, RecordKind::Data, &mut handle.data).unwrap();
        let (w, h) = (self.config.width, self.config.height);

        data.write_string("idata.make", "Mockam").unwrap();
        data.write_string("idata.model", "M1 Mark II").unwrap();
        if data.has("idata.software") {
            data.write_string("idata.software", "Firmware 1.0.2").unwrap();
        }
        data.write("idata.colors", 3i32).unwrap();
        data.write_string("idata.cdesc", "RGBG").unwrap();
        data.write("sizes.raw_width", w + 8).unwrap();
        data.write("sizes.raw_height", h + 4).unwrap();
        data.write("sizes.width", w).unwrap();
        data.write("sizes.height", h).unwrap();
        data.write("sizes.flip", 6i32).unwrap();

        data.write("other.iso_speed", 200.0f32).unwrap();
        data.write("other.shutter", 0.008f32).unwrap();
        data.write("other.aperture", 2.8f32).unwrap();
        data.write("other.focal_len", 50.0f32).unwrap();
        data.write("other.timestamp", 1_700_000_000i64).unwrap();
        data.write_string("other.artist", "A. Tester").unwrap();
        data.write_string("other.desc", "mock capture").unwrap();
        if data.has("other.parsed_gps") {
            data.write_array("other.parsed_gps.latitude", &[47.0f32, 36.0, 12.5])
                .unwrap();
            data.write_array("other.parsed_gps.longitude", &[122.0f32, 19.0, 48.0])
                .unwrap();
            data.write("other.parsed_gps.altitude", 56.5f32).unwrap();
            data.write("other.parsed_gps.latref", b'N' as i8).unwrap();
            data.write("other.parsed_gps.longref", b'W' as i8).unwrap();
            data.write("other.parsed_gps.gpsparsed", 1i8).unwrap();
        }

        data.write_string("lens.LensMake", "Mockam").unwrap();
        data.write_string("lens.Lens", "Mock 50mm F1.8").unwrap();
        data.write("lens.MinFocal", 50.0f32).unwrap();
        data.write("lens.MaxFocal", 50.0f32).unwrap();
        data.write("lens.FocalLengthIn35mmFormat", 50u16).unwrap();
        data.write("lens.makernotes.LensID", 42u64).unwrap();
    }

    fn render(&self, handle: &MockHandle) -> EngineResult<Vec<u8>> {
        let data = self.data_view(handle);
        let bits: i32 = data.read("params.output_bps").unwrap();
        let half: i32 = data.read("params.half_size").unwrap();
        let inverse_power: f64 = data.read_at("params.gamm", 0).unwrap();
        let cropbox: Vec<u32> = data.read_array("params.cropbox").unwrap();

        let (mut width, mut height) = (self.config.width, self.config.height);
        if cropbox[2] > 0 && cropbox[3] > 0 {
            if cropbox[0] >= width as u32 || cropbox[1] >= height as u32 {
                return Err(EngineFailure::from_code(status::BAD_CROP));
            }
            width = (cropbox[2].min(width as u32 - cropbox[0])) as u16;
            height = (cropbox[3].min(height as u32 - cropbox[1])) as u16;
        }
        if half != 0 {
            width = width.div_ceil(2);
            height = height.div_ceil(2);
        }

        let colors = 3u16;
        let bits = if bits == 16 { 16u16 } else { 8u16 };
        let seed = (inverse_power * 10.0).round() as u32;
        let bytes_per_sample = (bits / 8) as usize;
        let mut pixels =
            Vec::with_capacity(width as usize * height as usize * colors as usize * bytes_per_sample);
        for y in 0..height as u32 {
            for x in 0..width as u32 {
                for c in 0..colors as u32 {
                    let value = x * 31 + y * 17 + c * 7 + seed;
                    if bits == 16 {
                        pixels.extend_from_slice(&((value * 257) as u16).to_ne_bytes());
                    } else {
                        pixels.push((value % 256) as u8);
                    }
                }
            }
        }

        let header_len = self
            .layout
            .locate(RecordKind::ProcessedImage, "data")
            .unwrap()
            .offset;
        let record_size = self.layout.size_of(RecordKind::ProcessedImage).unwrap();
        let mut block = vec![0u8; (header_len + pixels.len()).max(record_size)];
        {
            let mut header =
                RecordViewMut::new(&self.layout, RecordKind::ProcessedImage, &mut block).unwrap();
            header.write("type", ImageKind::Bitmap.code()).unwrap();
            header.write("width", width).unwrap();
            header.write("height", height).unwrap();
            header.write("colors", colors).unwrap();
            header.write("bits", bits).unwrap();
            header.write("data_size", pixels.len() as u32).unwrap();
        }
        block[header_len..header_len + pixels.len()].copy_from_slice(&pixels);
        Ok(block)
    }
}

fn cstr_path(path: &CStr) -> std::path::PathBuf {
    std::path::PathBuf::from(path.to_string_lossy().into_owned())
}

impl DecodeEngine for MockEngine {
    type Handle = MockHandle;

    fn layout(&self) -> &CompiledLayout {
        &self.layout
    }

    fn version_string(&self) -> String {
        format!("mock-{}", self.layout.api_version())
    }

    fn init(&self) -> EngineResult<MockHandle> {
        Self::count(&self.calls.init);
        let size = self.layout.size_of(RecordKind::Data).unwrap();
        let mut handle = MockHandle {
            data: vec![0u8; size],
            opened: false,
            unpacked: false,
            thumbnail_unpacked: false,
            processed: false,
        };

        let mut data = RecordViewMut::new(&self.layout, RecordKind::Data, &mut handle.data).unwrap();
        data.write_at("params.gamm", 0, 0.45f64).unwrap();
        data.write_at("params.gamm", 1, 4.5f64).unwrap();
        data.write("params.bright", 1.0f32).unwrap();
        data.write("params.output_bps", 8i32).unwrap();
        data.write("params.output_color", 1i32).unwrap();
        data.write("params.user_qual", -1i32).unwrap();
        data.write("params.use_camera_wb", 0i32).unwrap();
        Ok(handle)
    }

    fn open(&self, handle: &mut MockHandle, path: &CStr) -> EngineResult<()> {
        Self::count(&self.calls.open);
        let bytes = std::fs::read(cstr_path(path)).map_err(|e| {
            EngineFailure::from_code(e.raw_os_error().unwrap_or(status::IO_ERROR))
        })?;
        if !bytes.starts_with(MOCK_MAGIC) {
            return Err(EngineFailure::from_code(status::FILE_UNSUPPORTED));
        }
        self.fill_metadata(handle);
        handle.opened = true;
        Ok(())
    }

    fn close(&self, _handle: MockHandle) {
        Self::count(&self.calls.close);
    }

    fn unpack(&self, handle: &mut MockHandle) -> EngineResult<()> {
        Self::count(&self.calls.unpack);
        if !handle.opened {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        if self.config.fail_unpack {
            return Err(EngineFailure::from_code(status::DATA_ERROR));
        }
        handle.unpacked = true;
        Ok(())
    }

    fn unpack_thumbnail(&self, handle: &mut MockHandle) -> EngineResult<()> {
        Self::count(&self.calls.unpack_thumbnail);
        if !handle.opened {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        if self.config.thumbnail.is_none() {
            return Err(EngineFailure::from_code(status::NO_THUMBNAIL));
        }
        handle.thumbnail_unpacked = true;
        Ok(())
    }

    fn process(&self, handle: &mut MockHandle) -> EngineResult<()> {
        Self::count(&self.calls.process);
        if !handle.unpacked {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        if self.config.fail_process {
            return Err(EngineFailure::from_code(status::UNSUFFICIENT_MEMORY));
        }
        handle.processed = true;
        Ok(())
    }

    fn make_memory_image(&self, handle: &mut MockHandle) -> EngineResult<ProcessedImage> {
        Self::count(&self.calls.make_image);
        if !handle.processed {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        let block = self.render(handle)?;
        ProcessedImage::copy_from_block(&self.layout, &block)
    }

    fn make_memory_thumbnail(&self, handle: &mut MockHandle) -> EngineResult<ProcessedImage> {
        Self::count(&self.calls.make_thumbnail);
        if !handle.thumbnail_unpacked {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        self.config
            .thumbnail
            .clone()
            .ok_or_else(|| EngineFailure::from_code(status::NO_THUMBNAIL))
    }

    fn write_image(&self, handle: &mut MockHandle, path: &CStr) -> EngineResult<()> {
        Self::count(&self.calls.write_image);
        if !handle.processed {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        let tiff: i32 = self.data_view(handle).read("params.output_tiff").unwrap();
        let marker: &[u8] = if tiff != 0 { b"MOCKTIFF" } else { b"MOCKPPM" };
        std::fs::write(cstr_path(path), marker)
            .map_err(|e| EngineFailure::from_code(e.raw_os_error().unwrap_or(status::IO_ERROR)))
    }

    fn write_thumbnail(&self, handle: &mut MockHandle, path: &CStr) -> EngineResult<()> {
        Self::count(&self.calls.write_thumbnail);
        if !handle.thumbnail_unpacked {
            return Err(EngineFailure::from_code(status::OUT_OF_ORDER_CALL));
        }
        let thumbnail = self
            .config
            .thumbnail
            .as_ref()
            .ok_or_else(|| EngineFailure::from_code(status::NO_THUMBNAIL))?;
        std::fs::write(cstr_path(path), &thumbnail.data)
            .map_err(|e| EngineFailure::from_code(e.raw_os_error().unwrap_or(status::IO_ERROR)))
    }

    fn data<'h>(&self, handle: &'h MockHandle) -> &'h [u8] {
        &handle.data
    }

    fn data_mut<'h>(&self, handle: &'h mut MockHandle) -> &'h mut [u8] {
        &mut handle.data
    }
}
