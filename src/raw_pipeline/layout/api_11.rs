//! Record layouts for engine API 11 (LibRaw 0.17 headers).
//!
//! Field order, element types and array dimensions mirror the C structs one to
//! one. Do not edit an entry to track a newer release: add a new `api_N`
//! module instead, the engine's layout is not stable across versions.

use super::types::FieldType::{Char, F32, F64, I8, I16, I32, Pointer, TimeT, U8, U16, U32, U64};
use super::types::{ArrayBounds, FieldDescriptor as F, RecordKind};

pub const API_VERSION: u32 = 11;
pub const RELEASE: &str = "0.17";

pub const BOUNDS: ArrayBounds = ArrayBounds {
    curve: 0x10000,
    cblack: 4102,
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
    F::array("software", Char, &[64]),
    F::scalar("raw_count", U32),
    F::scalar("dng_version", U32),
    F::scalar("is_foveon", U32),
    F::scalar("colors", I32),
    F::scalar("filters", U32),
    F::array("xtrans", Char, &[6, 6]),
    F::array("xtrans_abs", Char, &[6, 6]),
    F::array("cdesc", Char, &[5]),
    F::scalar("xmplen", U32),
    F::scalar("xmpdata", Pointer),
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

const DNG_COLOR: &[F] = &[
    F::scalar("illuminant", U16),
    F::array("calibration", F32, &[4, 4]),
    F::array("colormatrix", F32, &[4, 3]),
];

const CANON_MAKERNOTES: &[F] = &[
    F::scalar("CanonColorDataVer", I32),
    F::scalar("CanonColorDataSubVer", I32),
    F::scalar("SpecularWhiteLevel", I32),
    F::scalar("AverageBlackLevel", I32),
];

const COLOR_DATA: &[F] = &[
    F::array("curve", U16, &[0x10000]),
    F::array("cblack", U32, &[4102]),
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
    F::record_array("dng_color", RecordKind::DngColor, &[2]),
    F::record("canon_makernotes", RecordKind::CanonMakernotes),
    F::scalar("baseline_exposure", F32),
    F::array("OlympusSensorCalibration", I32, &[2]),
    F::scalar("FujiExpoMidPointShift", F32),
    F::scalar("digitalBack_color", I32),
];

const GPS_INFO: &[F] = &[
    F::array("latitude", F32, &[3]),
    F::array("longitude", F32, &[3]),
    F::array("gpstimestamp", F32, &[3]),
    F::scalar("altitude", F32),
    F::scalar("altref", Char),
    F::scalar("latref", Char),
    F::scalar("longref", Char),
    F::scalar("gpsstatus", Char),
    F::scalar("gpsparsed", Char),
];

const OTHER_PARAMS: &[F] = &[
    F::scalar("iso_speed", F32),
    F::scalar("shutter", F32),
    F::scalar("aperture", F32),
    F::scalar("focal_len", F32),
    F::scalar("timestamp", TimeT),
    F::scalar("shot_order", U32),
    F::array("gpsdata", U32, &[32]),
    F::record("parsed_gps", RecordKind::GpsInfo),
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
    F::scalar("ph1_cblack", Pointer),
    F::scalar("ph1_rblack", Pointer),
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
    F::scalar("sony_arw2_posterization_thr", I32),
    F::scalar("coolscan_nef_gamma", F32),
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
    F::scalar("MinAp4MinFocal", F32),
    F::scalar("MinAp4MaxFocal", F32),
    F::scalar("MaxAp", F32),
    F::scalar("MinAp", F32),
    F::scalar("CurFocal", F32),
    F::scalar("CurAp", F32),
    F::scalar("MaxAp4CurFocal", F32),
    F::scalar("MinAp4CurFocal", F32),
    F::scalar("LensFStops", F32),
    F::scalar("TeleconverterID", U64),
    F::array("Teleconverter", Char, &[128]),
    F::scalar("AdapterID", U64),
    F::array("Adapter", Char, &[128]),
    F::scalar("AttachmentID", U64),
    F::array("Attachment", Char, &[128]),
    F::scalar("CanonFocalUnits", I16),
    F::scalar("FocalLengthIn35mmFormat", F32),
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
    // flexible array member, pixel bytes start here
    F::array("data", I8, &[1]),
];

const DECODER_INFO: &[F] = &[
    F::scalar("decoder_name", Pointer),
    F::scalar("decoder_flags", U32),
];

pub fn record(kind: RecordKind) -> Option<&'static [F]> {
    let fields = match kind {
        RecordKind::Data => DATA,
        RecordKind::ImageParams => IMAGE_PARAMS,
        RecordKind::ImageSizes => IMAGE_SIZES,
        RecordKind::ColorData => COLOR_DATA,
        RecordKind::PhaseOneData => PHASE_ONE_DATA,
        RecordKind::DngColor => DNG_COLOR,
        RecordKind::CanonMakernotes => CANON_MAKERNOTES,
        RecordKind::GpsInfo => GPS_INFO,
        RecordKind::OtherParams => OTHER_PARAMS,
        RecordKind::Thumbnail => THUMBNAIL,
        RecordKind::InternalOutputParams => INTERNAL_OUTPUT_PARAMS,
        RecordKind::RawData => RAW_DATA,
        RecordKind::OutputParams => OUTPUT_PARAMS,
        RecordKind::NikonLens => NIKON_LENS,
        RecordKind::DngLens => DNG_LENS,
        RecordKind::MakernotesLens => MAKERNOTES_LENS,
        RecordKind::LensInfo => LENS_INFO,
        RecordKind::ProcessedImage => PROCESSED_IMAGE,
        RecordKind::DecoderInfo => DECODER_INFO,
    };
    Some(fields)
}
