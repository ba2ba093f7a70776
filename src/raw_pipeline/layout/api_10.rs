//! Record layouts for engine API 10 (LibRaw 0.16 headers).
//!
//! This release predates the parsed GPS block, the DNG color and Canon
//! makernote records, and the extended makernote lens fields. Its black
//! level table is the four per-channel values only.

use super::types::FieldType::{Char, F32, F64, I8, I16, I32, Pointer, TimeT, U8, U16, U32, U64};
use super::types::{ArrayBounds, FieldDescriptor as F, RecordKind};

pub const API_VERSION: u32 = 10;
pub const RELEASE: &str = "0.16";

pub const BOUNDS: ArrayBounds = ArrayBounds {
    curve: 0x10000,
    cblack: 4,
    mask_areas: 8,
    mask_coords: 4,
    white: (8, 8),
    xtrans: 6,
    gps_words: 32,
    black_stat: 8,
};

const PHASE_ONE_DATA: &[F] = &[
    F::scalar("format", I32),
    F::scalar("key_off", I32),
    F::scalar("tag_21a", I32),
    F::scalar("t_black", I32),
    F::scalar("split_col", I32),
    F::scalar("black_col", I32),
    F::scalar("split_row", I32),
    F::scalar("black_row", I32),
    F::scalar("tag_210", F32),
];

const IMAGE_PARAMS: &[F] = &[
    F::array("make", Char, &[64]),
    F::array("model", Char, &[64]),
    F::scalar("raw_count", U32),
    F::scalar("dng_version", U32),
    F::scalar("is_foveon", U32),
    F::scalar("colors", I32),
    F::scalar("filters", U32),
    F::array("xtrans", Char, &[6, 6]),
    F::array("cdesc", Char, &[5]),
];

const IMAGE_SIZES: &[F] = &[
    F::scalar("raw_height", U16),
    F::scalar("raw_width", U16),
    F::scalar("height", U16),
    F::scalar("width", U16),
    F::scalar("top_margin", U16),
    F::scalar("left_margin", U16),
    F::scalar("iheight", U16),
    F::scalar("iwidth", U16),
    F::scalar("raw_pitch", U32),
    F::scalar("pixel_aspect", F64),
    F::scalar("flip", I32),
    F::array("mask", I32, &[8, 4]),
];

const COLOR_DATA: &[F] = &[
    F::array("curve", U16, &[0x10000]),
    F::array("cblack", U32, &[4]),
    F::scalar("black", U32),
    F::scalar("data_maximum", U32),
    F::scalar("maximum", U32),
    F::array("white", U16, &[8, 8]),
    F::array("cam_mul", F32, &[4]),
    F::array("pre_mul", F32, &[4]),
    F::array("cmatrix", F32, &[3, 4]),
    F::array("rgb_cam", F32, &[3, 4]),
    F::array("cam_xyz", F32, &[4, 3]),
    F::record("phase_one_data", RecordKind::PhaseOneData),
    F::scalar("flash_used", F32),
    F::scalar("canon_ev", F32),
    F::array("model2", Char, &[64]),
    F::scalar("profile", Pointer),
    F::scalar("profile_length", U32),
    F::array("black_stat", U32, &[8]),
];

const OTHER_PARAMS: &[F] = &[
    F::scalar("iso_speed", F32),
    F::scalar("shutter", F32),
    F::scalar("aperture", F32),
    F::scalar("focal_len", F32),
    F::scalar("timestamp", TimeT),
    F::scalar("shot_order", U32),
    F::array("gpsdata", U32, &[32]),
    F::array("desc", Char, &[512]),
    F::array("artist", Char, &[64]),
];

const THUMBNAIL: &[F] = &[
    F::scalar("tformat", U32),
    F::scalar("twidth", U16),
    F::scalar("theight", U16),
    F::scalar("tlength", U32),
    F::scalar("tcolors", I32),
    F::scalar("thumb", Pointer),
];

const INTERNAL_OUTPUT_PARAMS: &[F] = &[
    F::scalar("mix_green", U32),
    F::scalar("raw_color", U32),
    F::scalar("zero_is_bad", U32),
    F::scalar("shrink", U16),
    F::scalar("fuji_width", U16),
];

const RAW_DATA: &[F] = &[
    F::scalar("raw_alloc", Pointer),
    F::scalar("raw_image", Pointer),
    F::scalar("color4_image", Pointer),
    F::scalar("color3_image", Pointer),
    F::scalar("ph1_black", Pointer),
    F::record("iparams", RecordKind::ImageParams),
    F::record("sizes", RecordKind::ImageSizes),
    F::record("ioparams", RecordKind::InternalOutputParams),
    F::record("color", RecordKind::ColorData),
];

const OUTPUT_PARAMS: &[F] = &[
    F::array("greybox", U32, &[4]),
    F::array("cropbox", U32, &[4]),
    F::array("aber", F64, &[4]),
    F::array("gamm", F64, &[6]),
    F::array("user_mul", F32, &[4]),
    F::scalar("shot_select", U32),
    F::scalar("bright", F32),
    F::scalar("threshold", F32),
    F::scalar("half_size", I32),
    F::scalar("four_color_rgb", I32),
    F::scalar("highlight", I32),
    F::scalar("use_auto_wb", I32),
    F::scalar("use_camera_wb", I32),
    F::scalar("use_camera_matrix", I32),
    F::scalar("output_color", I32),
    F::scalar("output_profile", Pointer),
    F::scalar("camera_profile", Pointer),
    F::scalar("bad_pixels", Pointer),
    F::scalar("dark_frame", Pointer),
    F::scalar("output_bps", I32),
    F::scalar("output_tiff", I32),
    F::scalar("user_flip", I32),
    F::scalar("user_qual", I32),
    F::scalar("user_black", I32),
    F::array("user_cblack", I32, &[4]),
    F::scalar("user_sat", I32),
    F::scalar("med_passes", I32),
    F::scalar("auto_bright_thr", F32),
    F::scalar("adjust_maximum_thr", F32),
    F::scalar("no_auto_bright", I32),
    F::scalar("use_fuji_rotate", I32),
    F::scalar("green_matching", I32),
    F::scalar("dcb_iterations", I32),
    F::scalar("dcb_enhance_fl", I32),
    F::scalar("fbdd_noiserd", I32),
    F::scalar("eeci_refine", I32),
    F::scalar("es_med_passes", I32),
    F::scalar("ca_correc", I32),
    F::scalar("cared", F32),
    F::scalar("cablue", F32),
    F::scalar("cfaline", I32),
    F::scalar("linenoise", F32),
    F::scalar("cfa_clean", I32),
    F::scalar("lclean", F32),
    F::scalar("cclean", F32),
    F::scalar("cfa_green", I32),
    F::scalar("green_thresh", F32),
    F::scalar("exp_correc", I32),
    F::scalar("exp_shift", F32),
    F::scalar("exp_preser", F32),
    F::scalar("wf_debanding", I32),
    F::array("wf_deband_treshold", F32, &[4]),
    F::scalar("use_rawspeed", I32),
    F::scalar("no_auto_scale", I32),
    F::scalar("no_interpolation", I32),
    F::scalar("straw_ycc", I32),
    F::scalar("force_foveon_x3f", I32),
    F::scalar("x3f_flags", I32),
    F::scalar("sony_arw2_options", I32),
];

const NIKON_LENS: &[F] = &[
    F::scalar("NikonEffectiveMaxAp", F32),
    F::scalar("NikonLensIDNumber", U8),
    F::scalar("NikonLensFStops", U8),
    F::scalar("NikonMCUVersion", U8),
    F::scalar("NikonLensType", U8),
];

const DNG_LENS: &[F] = &[
    F::scalar("MinFocal", F32),
    F::scalar("MaxFocal", F32),
    F::scalar("MaxAp4MinFocal", F32),
    F::scalar("MaxAp4MaxFocal", F32),
];

const MAKERNOTES_LENS: &[F] = &[
    F::scalar("LensID", U64),
    F::array("Lens", Char, &[128]),
    F::scalar("LensFormat", U16),
    F::scalar("LensMount", U16),
    F::scalar("CamID", U64),
    F::scalar("CameraFormat", U16),
    F::scalar("CameraMount", U16),
    F::array("body", Char, &[64]),
    F::scalar("FocalType", I16),
    F::array("LensFeatures_pre", Char, &[16]),
    F::array("LensFeatures_suf", Char, &[16]),
    F::scalar("MinFocal", F32),
    F::scalar("MaxFocal", F32),
    F::scalar("MaxAp4MinFocal", F32),
    F::scalar("MaxAp4MaxFocal", F32),
    F::scalar("MaxAp", F32),
];

const LENS_INFO: &[F] = &[
    F::scalar("MinFocal", F32),
    F::scalar("MaxFocal", F32),
    F::scalar("MaxAp4MinFocal", F32),
    F::scalar("MaxAp4MaxFocal", F32),
    F::scalar("EXIF_MaxAp", F32),
    F::array("LensMake", Char, &[128]),
    F::array("Lens", Char, &[128]),
    F::scalar("FocalLengthIn35mmFormat", U16),
    F::record("nikon", RecordKind::NikonLens),
    F::record("dng", RecordKind::DngLens),
    F::record("makernotes", RecordKind::MakernotesLens),
];

const DATA: &[F] = &[
    F::scalar("image", Pointer),
    F::record("sizes", RecordKind::ImageSizes),
    F::record("idata", RecordKind::ImageParams),
    F::record("lens", RecordKind::LensInfo),
    F::record("params", RecordKind::OutputParams),
    F::scalar("progress_flags", U32),
    F::scalar("process_warnings", U32),
    F::record("color", RecordKind::ColorData),
    F::record("other", RecordKind::OtherParams),
    F::record("thumbnail", RecordKind::Thumbnail),
    F::record("rawdata", RecordKind::RawData),
    F::scalar("parent_class", Pointer),
];

const PROCESSED_IMAGE: &[F] = &[
    F::scalar("type", U32),
    F::scalar("height", U16),
    F::scalar("width", U16),
    F::scalar("colors", U16),
    F::scalar("bits", U16),
    F::scalar("data_size", U32),
    F::array("data", I8, &[1]),
];

const DECODER_INFO: &[F] = &[
    F::scalar("decoder_name", Pointer),
    F::scalar("decoder_flags", U32),
];

pub fn record(kind: RecordKind) -> Option<&'static [F]> {
    match kind {
        RecordKind::Data => Some(DATA),
        RecordKind::ImageParams => Some(IMAGE_PARAMS),
        RecordKind::ImageSizes => Some(IMAGE_SIZES),
        RecordKind::ColorData => Some(COLOR_DATA),
        RecordKind::PhaseOneData => Some(PHASE_ONE_DATA),
        RecordKind::OtherParams => Some(OTHER_PARAMS),
        RecordKind::Thumbnail => Some(THUMBNAIL),
        RecordKind::InternalOutputParams => Some(INTERNAL_OUTPUT_PARAMS),
        RecordKind::RawData => Some(RAW_DATA),
        RecordKind::OutputParams => Some(OUTPUT_PARAMS),
        RecordKind::NikonLens => Some(NIKON_LENS),
        RecordKind::DngLens => Some(DNG_LENS),
        RecordKind::MakernotesLens => Some(MAKERNOTES_LENS),
        RecordKind::LensInfo => Some(LENS_INFO),
        RecordKind::ProcessedImage => Some(PROCESSED_IMAGE),
        RecordKind::DecoderInfo => Some(DECODER_INFO),
        RecordKind::DngColor | RecordKind::CanonMakernotes | RecordKind::GpsInfo => None,
    }
}
