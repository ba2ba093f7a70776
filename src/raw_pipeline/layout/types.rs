//! Field descriptor types for the decode engine's binary records.

use std::fmt;
use std::mem::{align_of, size_of};
use std::os::raw::c_void;

/// Every record the decode engine reads or writes across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// `libraw_data_t`, the container handed out by `libraw_init`.
    Data,
    ImageParams,
    ImageSizes,
    ColorData,
    PhaseOneData,
    DngColor,
    CanonMakernotes,
    GpsInfo,
    OtherParams,
    Thumbnail,
    InternalOutputParams,
    RawData,
    OutputParams,
    NikonLens,
    DngLens,
    MakernotesLens,
    LensInfo,
    ProcessedImage,
    DecoderInfo,
}

impl RecordKind {
    pub const ALL: [RecordKind; 19] = [
        RecordKind::Data,
        RecordKind::ImageParams,
        RecordKind::ImageSizes,
        RecordKind::ColorData,
        RecordKind::PhaseOneData,
        RecordKind::DngColor,
        RecordKind::CanonMakernotes,
        RecordKind::GpsInfo,
        RecordKind::OtherParams,
        RecordKind::Thumbnail,
        RecordKind::InternalOutputParams,
        RecordKind::RawData,
        RecordKind::OutputParams,
        RecordKind::NikonLens,
        RecordKind::DngLens,
        RecordKind::MakernotesLens,
        RecordKind::LensInfo,
        RecordKind::ProcessedImage,
        RecordKind::DecoderInfo,
    ];

    /// Name of the matching C struct in the engine headers.
    pub fn c_name(&self) -> &'static str {
        match self {
            RecordKind::Data => "libraw_data_t",
            RecordKind::ImageParams => "libraw_iparams_t",
            RecordKind::ImageSizes => "libraw_image_sizes_t",
            RecordKind::ColorData => "libraw_colordata_t",
            RecordKind::PhaseOneData => "ph1_t",
            RecordKind::DngColor => "libraw_dng_color_t",
            RecordKind::CanonMakernotes => "libraw_canon_makernotes_t",
            RecordKind::GpsInfo => "libraw_gps_info_t",
            RecordKind::OtherParams => "libraw_imgother_t",
            RecordKind::Thumbnail => "libraw_thumbnail_t",
            RecordKind::InternalOutputParams => "libraw_internal_output_params_t",
            RecordKind::RawData => "libraw_rawdata_t",
            RecordKind::OutputParams => "libraw_output_params_t",
            RecordKind::NikonLens => "libraw_nikonlens_t",
            RecordKind::DngLens => "libraw_dnglens_t",
            RecordKind::MakernotesLens => "libraw_makernotes_lens_t",
            RecordKind::LensInfo => "libraw_lensinfo_t",
            RecordKind::ProcessedImage => "libraw_processed_image_t",
            RecordKind::DecoderInfo => "libraw_decoder_info_t",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_name())
    }
}

/// Semantic type of one field, mapped to its C representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// `char`, used for fixed-size text buffers.
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    U64,
    /// `time_t`, 64-bit on every supported host.
    TimeT,
    F32,
    F64,
    /// Any data pointer (`void*`, `char*`, `ushort (*)[4]`, ...).
    Pointer,
    /// A nested record stored inline.
    Record(RecordKind),
}

impl FieldType {
    /// Size and alignment of a primitive on the host ABI, `None` for nested records.
    pub fn primitive_layout(&self) -> Option<(usize, usize)> {
        let layout = match self {
            FieldType::Char | FieldType::I8 => (size_of::<i8>(), align_of::<i8>()),
            FieldType::U8 => (size_of::<u8>(), align_of::<u8>()),
            FieldType::I16 => (size_of::<i16>(), align_of::<i16>()),
            FieldType::U16 => (size_of::<u16>(), align_of::<u16>()),
            FieldType::I32 => (size_of::<i32>(), align_of::<i32>()),
            FieldType::U32 => (size_of::<u32>(), align_of::<u32>()),
            FieldType::U64 => (size_of::<u64>(), align_of::<u64>()),
            FieldType::TimeT => (size_of::<i64>(), align_of::<i64>()),
            FieldType::F32 => (size_of::<f32>(), align_of::<f32>()),
            FieldType::F64 => (size_of::<f64>(), align_of::<f64>()),
            FieldType::Pointer => (size_of::<*const c_void>(), align_of::<*const c_void>()),
            FieldType::Record(_) => return None,
        };
        Some(layout)
    }
}

/// One field of a record: name, type and fixed array dimensions (empty for scalars).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub ty: FieldType,
    pub dims: &'static [usize],
}

impl FieldDescriptor {
    pub const fn scalar(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty, dims: &[] }
    }

    pub const fn array(name: &'static str, ty: FieldType, dims: &'static [usize]) -> Self {
        Self { name, ty, dims }
    }

    pub const fn record(name: &'static str, kind: RecordKind) -> Self {
        Self { name, ty: FieldType::Record(kind), dims: &[] }
    }

    pub const fn record_array(name: &'static str, kind: RecordKind, dims: &'static [usize]) -> Self {
        Self { name, ty: FieldType::Record(kind), dims }
    }

    /// Number of elements, 1 for a scalar.
    pub fn element_count(&self) -> usize {
        self.dims.iter().product()
    }
}

/// Maximum nested-array bounds for one API version.
///
/// Callers that size their own buffers from engine data (tone curves, black
/// patterns, masked borders) must use these rather than guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayBounds {
    /// Entries in `color.curve`.
    pub curve: usize,
    /// Entries in `color.cblack` (4 per-channel levels plus any pattern).
    pub cblack: usize,
    /// Masked border rectangles in `sizes.mask`.
    pub mask_areas: usize,
    /// Coordinates per masked rectangle.
    pub mask_coords: usize,
    /// Rows and columns of the `color.white` block.
    pub white: (usize, usize),
    /// Side of the X-Trans CFA pattern in `idata.xtrans`.
    pub xtrans: usize,
    /// Raw GPS words in `other.gpsdata`.
    pub gps_words: usize,
    /// Entries in `color.black_stat`.
    pub black_stat: usize,
}

/// A complete, self-consistent set of record layouts for one engine API version.
pub trait LayoutProvider {
    /// Engine API version (the shared library's soname major).
    fn api_version(&self) -> u32;

    /// Engine release line the layout was taken from.
    fn release(&self) -> &'static str;

    /// Ordered fields of `kind`, or `None` if this version has no such record.
    fn record(&self, kind: RecordKind) -> Option<&'static [FieldDescriptor]>;

    fn array_bounds(&self) -> ArrayBounds;

    fn record_kinds(&self) -> Vec<RecordKind> {
        RecordKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.record(*kind).is_some())
            .collect()
    }
}
