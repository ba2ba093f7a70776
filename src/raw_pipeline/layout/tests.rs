use crate::raw_pipeline::common::error::RawError;
use crate::raw_pipeline::layout::{
    CompiledLayout, FieldType, LayoutProvider, LayoutSet, RecordKind, RecordView, RecordViewMut,
};

fn compiled(set: LayoutSet) -> CompiledLayout {
    CompiledLayout::compile(set).expect("layout compiles")
}

fn assert_record(layout: &CompiledLayout, kind: RecordKind, fields: usize, size: usize) {
    let record = layout.record(kind).expect("record present");
    assert_eq!(record.fields.len(), fields, "field count of {}", kind);
    assert_eq!(record.size, size, "size of {}", kind);
}

#[test]
fn test_unknown_version_is_rejected() {
    let result = LayoutSet::for_version(99);
    assert!(matches!(result, Err(RawError::UnsupportedVersion(99))));
    assert!(matches!(
        CompiledLayout::for_version(7),
        Err(RawError::UnsupportedVersion(7))
    ));
}

#[test]
fn test_supported_versions() {
    assert_eq!(LayoutSet::supported_versions(), vec![10, 11]);
    assert_eq!(LayoutSet::for_version(10).unwrap(), LayoutSet::Api10);
    assert_eq!(LayoutSet::for_version(11).unwrap().release(), "0.17");
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_api_10_reference_sizes() {
    let layout = compiled(LayoutSet::Api10);
    assert_record(&layout, RecordKind::PhaseOneData, 9, 36);
    assert_record(&layout, RecordKind::ImageParams, 9, 192);
    assert_record(&layout, RecordKind::ImageSizes, 12, 168);
    assert_record(&layout, RecordKind::ColorData, 18, 131_560);
    assert_record(&layout, RecordKind::OtherParams, 9, 736);
    assert_record(&layout, RecordKind::Thumbnail, 6, 24);
    assert_record(&layout, RecordKind::InternalOutputParams, 5, 16);
    assert_record(&layout, RecordKind::RawData, 9, 131_976);
    assert_record(&layout, RecordKind::OutputParams, 59, 384);
    assert_record(&layout, RecordKind::NikonLens, 5, 8);
    assert_record(&layout, RecordKind::DngLens, 4, 16);
    assert_record(&layout, RecordKind::MakernotesLens, 16, 280);
    assert_record(&layout, RecordKind::LensInfo, 11, 584);
    assert_record(&layout, RecordKind::Data, 12, 265_648);
    assert_record(&layout, RecordKind::ProcessedImage, 7, 20);
    assert_record(&layout, RecordKind::DecoderInfo, 2, 16);

    for missing in [RecordKind::GpsInfo, RecordKind::DngColor, RecordKind::CanonMakernotes] {
        assert!(layout.record(missing).is_err(), "{} should be absent", missing);
    }
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_api_11_reference_sizes() {
    let layout = compiled(LayoutSet::Api11);
    assert_record(&layout, RecordKind::PhaseOneData, 9, 36);
    assert_record(&layout, RecordKind::ImageParams, 13, 304);
    assert_record(&layout, RecordKind::ImageSizes, 12, 168);
    assert_record(&layout, RecordKind::DngColor, 3, 116);
    assert_record(&layout, RecordKind::CanonMakernotes, 4, 16);
    assert_record(&layout, RecordKind::ColorData, 24, 148_216);
    assert_record(&layout, RecordKind::GpsInfo, 9, 48);
    assert_record(&layout, RecordKind::OtherParams, 10, 784);
    assert_record(&layout, RecordKind::Thumbnail, 6, 24);
    assert_record(&layout, RecordKind::InternalOutputParams, 5, 16);
    assert_record(&layout, RecordKind::RawData, 10, 148_752);
    assert_record(&layout, RecordKind::OutputParams, 61, 392);
    assert_record(&layout, RecordKind::NikonLens, 5, 8);
    assert_record(&layout, RecordKind::DngLens, 4, 16);
    assert_record(&layout, RecordKind::MakernotesLens, 32, 728);
    assert_record(&layout, RecordKind::LensInfo, 11, 1032);
    assert_record(&layout, RecordKind::Data, 12, 299_696);
    assert_record(&layout, RecordKind::ProcessedImage, 7, 20);
    assert_record(&layout, RecordKind::DecoderInfo, 2, 16);
}

#[cfg(target_pointer_width = "64")]
#[test]
fn test_nested_offsets() {
    let api10 = compiled(LayoutSet::Api10);
    assert_eq!(api10.locate(RecordKind::Data, "params").unwrap().offset, 952);
    assert_eq!(api10.locate(RecordKind::Data, "params.output_bps").unwrap().offset, 952 + 200);
    assert_eq!(api10.locate(RecordKind::Data, "params.gamm").unwrap().offset, 952 + 64);

    let api11 = compiled(LayoutSet::Api11);
    assert_eq!(api11.locate(RecordKind::Data, "params").unwrap().offset, 1512);
    assert_eq!(api11.locate(RecordKind::Data, "other").unwrap().offset, 150_128);
    assert_eq!(
        api11.locate(RecordKind::Data, "other.parsed_gps").unwrap().offset,
        150_128 + 156
    );
    assert_eq!(api11.locate(RecordKind::ProcessedImage, "data").unwrap().offset, 16);
}

#[test]
fn test_array_bounds_match_descriptors() {
    for set in LayoutSet::SUPPORTED {
        let layout = compiled(set);
        let bounds = layout.array_bounds();
        let count = |path: &str| layout.locate(RecordKind::Data, path).unwrap().count;

        assert_eq!(count("color.curve"), bounds.curve);
        assert_eq!(count("color.cblack"), bounds.cblack);
        assert_eq!(count("sizes.mask"), bounds.mask_areas * bounds.mask_coords);
        assert_eq!(count("color.white"), bounds.white.0 * bounds.white.1);
        assert_eq!(count("idata.xtrans"), bounds.xtrans * bounds.xtrans);
        assert_eq!(count("other.gpsdata"), bounds.gps_words);
        assert_eq!(count("color.black_stat"), bounds.black_stat);
    }

    assert_eq!(LayoutSet::Api10.array_bounds().cblack, 4);
    assert_eq!(LayoutSet::Api11.array_bounds().cblack, 4102);
}

#[test]
fn test_versions_disagree_on_field_presence() {
    let api10 = compiled(LayoutSet::Api10);
    let api11 = compiled(LayoutSet::Api11);

    for path in ["idata.software", "other.parsed_gps.altitude", "rawdata.ph1_cblack"] {
        assert!(!api10.contains(RecordKind::Data, path), "{} in API 10", path);
        assert!(api11.contains(RecordKind::Data, path), "{} in API 11", path);
    }
    assert!(api10.contains(RecordKind::Data, "rawdata.ph1_black"));
    assert!(!api11.contains(RecordKind::Data, "rawdata.ph1_black"));
}

#[test]
fn test_locate_indexing_and_errors() {
    let layout = compiled(LayoutSet::Api11);

    let whole = layout.locate(RecordKind::Data, "params.cropbox").unwrap();
    assert_eq!(whole.count, 4);
    assert_eq!(whole.ty, FieldType::U32);

    let third = layout.locate(RecordKind::Data, "params.cropbox[2]").unwrap();
    assert_eq!(third.count, 1);
    assert_eq!(third.offset, whole.offset + 8);

    let dng = layout
        .locate(RecordKind::Data, "color.dng_color[1].illuminant")
        .unwrap();
    let first = layout
        .locate(RecordKind::Data, "color.dng_color[0].illuminant")
        .unwrap();
    assert_eq!(dng.offset - first.offset, 116);

    for bad in [
        "params.nope",
        "params.cropbox[4]",
        "params.output_bps.more",
        "color.dng_color.illuminant",
        "params.cropbox[x]",
        "",
    ] {
        assert!(
            matches!(layout.locate(RecordKind::Data, bad), Err(RawError::LayoutError(_))),
            "{:?} should fail",
            bad
        );
    }
}

#[test]
fn test_record_view_reads_back_writes() {
    let layout = compiled(LayoutSet::Api11);
    let mut bytes = vec![0u8; layout.size_of(RecordKind::Data).unwrap()];

    {
        let mut view = RecordViewMut::new(&layout, RecordKind::Data, &mut bytes).unwrap();
        view.write_string("idata.make", "Phase One").unwrap();
        view.write("params.output_bps", 16i32).unwrap();
        view.write_array("params.gamm", &[1.0 / 2.4, 12.92]).unwrap();
        view.write("other.iso_speed", 400.0f32).unwrap();
        view.write("lens.makernotes.LensID", 0xDEAD_BEEFu64).unwrap();
        view.write_at("params.cropbox", 3, 1200u32).unwrap();
    }

    let view = RecordView::new(&layout, RecordKind::Data, &bytes).unwrap();
    assert_eq!(view.read_string("idata.make").unwrap(), "Phase One");
    assert_eq!(view.read::<i32>("params.output_bps").unwrap(), 16);
    assert_eq!(view.read_at::<f64>("params.gamm", 1).unwrap(), 12.92);
    assert_eq!(view.read::<f32>("other.iso_speed").unwrap(), 400.0);
    assert_eq!(view.read::<u64>("lens.makernotes.LensID").unwrap(), 0xDEAD_BEEF);
    assert_eq!(view.read_array::<u32>("params.cropbox").unwrap(), vec![0, 0, 0, 1200]);
    assert_eq!(view.try_read_string("idata.software").unwrap(), Some(String::new()));
}

#[test]
fn test_record_view_type_and_length_checks() {
    let layout = compiled(LayoutSet::Api10);
    let short = vec![0u8; 16];
    assert!(matches!(
        RecordView::new(&layout, RecordKind::Data, &short),
        Err(RawError::LayoutError(_))
    ));

    let mut bytes = vec![0u8; layout.size_of(RecordKind::Data).unwrap()];
    let mut view = RecordViewMut::new(&layout, RecordKind::Data, &mut bytes).unwrap();
    assert!(view.write("params.output_bps", 16u16).is_err());
    assert!(view.write("params.output_bps", 1.0f32).is_err());
    assert!(view.write_string("params.output_bps", "x").is_err());
    assert_eq!(view.as_view().try_read::<f32>("other.parsed_gps.altitude").unwrap(), None);
}

#[test]
fn test_write_string_truncates_and_terminates() {
    let layout = compiled(LayoutSet::Api10);
    let mut bytes = vec![0xAAu8; layout.size_of(RecordKind::ImageParams).unwrap()];
    let mut view = RecordViewMut::new(&layout, RecordKind::ImageParams, &mut bytes).unwrap();

    let long = "C".repeat(100);
    view.write_string("make", &long).unwrap();
    let read = view.as_view().read_string("make").unwrap();
    assert_eq!(read.len(), 63);
}
