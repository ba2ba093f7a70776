use crate::raw_pipeline::common::error::RawError;
use crate::raw_pipeline::engine::{ImageKind, ProcessedImage};
use crate::raw_pipeline::frame::{Frame, FrameBuilder, FrameMetadata, GpsInfo, expected_len};
use crate::raw_pipeline::layout::{CompiledLayout, RecordKind, RecordViewMut};

fn data_record(layout: &CompiledLayout) -> Vec<u8> {
    let mut data = vec![0u8; layout.size_of(RecordKind::Data).unwrap()];
    {
        let mut view = RecordViewMut::new(layout, RecordKind::Data, &mut data).unwrap();
        view.write_string("idata.make", "Nikon").unwrap();
        view.write_string("idata.model", "D800").unwrap();
        view.write_string("idata.cdesc", "RGBG").unwrap();
        view.write("idata.colors", 3i32).unwrap();
        view.write("sizes.width", 4u16).unwrap();
        view.write("sizes.height", 2u16).unwrap();
        view.write("other.iso_speed", 400.0f32).unwrap();
        view.write("other.timestamp", 1_600_000_000i64).unwrap();
        view.write_string("lens.Lens", "AF-S 24-70mm f/2.8").unwrap();
        view.write("lens.MinFocal", 24.0f32).unwrap();
        view.write("lens.MaxFocal", 70.0f32).unwrap();
        if view.has("idata.software") {
            view.write_string("idata.software", "Ver.1.10").unwrap();
            view.write_array("other.parsed_gps.latitude", &[33.0f32, 51.0, 36.0])
                .unwrap();
            view.write_array("other.parsed_gps.longitude", &[151.0f32, 12.0, 36.0])
                .unwrap();
            view.write("other.parsed_gps.latref", b'S' as i8).unwrap();
            view.write("other.parsed_gps.longref", b'E' as i8).unwrap();
            view.write("other.parsed_gps.gpsparsed", 1i8).unwrap();
        }
    }
    data
}

fn bitmap(width: u16, height: u16, colors: u16, bits: u16) -> ProcessedImage {
    ProcessedImage {
        kind: ImageKind::Bitmap,
        width,
        height,
        colors,
        bits,
        data: vec![0x5A; expected_len(width as u32, height as u32, colors, bits)],
    }
}

#[test]
fn test_metadata_api_11() {
    let layout = CompiledLayout::for_version(11).unwrap();
    let data = data_record(&layout);
    let metadata = FrameBuilder::new(&layout).metadata(&data).unwrap();

    assert_eq!(metadata.make, "Nikon");
    assert_eq!(metadata.model, "D800");
    assert_eq!(metadata.software.as_deref(), Some("Ver.1.10"));
    assert_eq!(metadata.colors, 3);
    assert_eq!(metadata.color_description, "RGBG");
    assert_eq!(metadata.iso_speed, 400.0);
    assert_eq!(metadata.timestamp, 1_600_000_000);
    assert_eq!(metadata.lens.name, "AF-S 24-70mm f/2.8");
    assert_eq!(metadata.lens.max_focal, 70.0);

    let gps = metadata.gps.unwrap();
    assert_eq!(gps.latitude_ref, 'S');
    assert!((gps.latitude_degrees() + 33.86).abs() < 1e-6);
    assert!((gps.longitude_degrees() - 151.21).abs() < 1e-6);
}

#[test]
fn test_metadata_api_10_lacks_newer_fields() {
    let layout = CompiledLayout::for_version(10).unwrap();
    let data = data_record(&layout);
    let metadata = FrameBuilder::new(&layout).metadata(&data).unwrap();

    assert_eq!(metadata.make, "Nikon");
    assert_eq!(metadata.software, None);
    assert_eq!(metadata.gps, None);
    assert_eq!(metadata.lens.lens_id, 0);
}

#[test]
fn test_metadata_rejects_short_record() {
    let layout = CompiledLayout::for_version(11).unwrap();
    let result = FrameBuilder::new(&layout).metadata(&[0u8; 64]);
    assert!(matches!(result, Err(RawError::LayoutError(_))));
}

#[test]
fn test_build_frame() {
    let layout = CompiledLayout::for_version(11).unwrap();
    let data = data_record(&layout);
    let frame = FrameBuilder::new(&layout)
        .build_frame(&data, bitmap(4, 2, 3, 16))
        .unwrap();

    assert_eq!((frame.width(), frame.height(), frame.colors(), frame.bits()), (4, 2, 3, 16));
    assert_eq!(frame.data().len(), 4 * 2 * 3 * 2);
    assert_eq!(frame.samples_per_row(), 12);
    assert_eq!(frame.samples_u16().unwrap().len(), 24);
    assert_eq!(frame.metadata().model, "D800");
}

#[test]
fn test_build_frame_rejects_jpeg() {
    let layout = CompiledLayout::for_version(11).unwrap();
    let data = data_record(&layout);
    let mut image = bitmap(2, 2, 3, 8);
    image.kind = ImageKind::Jpeg;

    let result = FrameBuilder::new(&layout).build_frame(&data, image);
    assert!(matches!(result, Err(RawError::ProcessError(_))));
}

#[test]
fn test_frame_validates_buffer() {
    let metadata = FrameMetadata::default();
    assert!(Frame::new(2, 2, 3, 8, vec![0; 12], metadata.clone()).is_ok());
    assert!(Frame::new(2, 2, 3, 8, vec![0; 11], metadata.clone()).is_err());
    assert!(Frame::new(2, 2, 3, 12, vec![0; 18], metadata.clone()).is_err());
    assert!(Frame::new(2, 2, 5, 8, vec![0; 20], metadata.clone()).is_err());
    assert!(Frame::new(0, 2, 3, 8, Vec::new(), metadata).is_err());
}

#[test]
fn test_thumbnail_keeps_encoding() {
    let layout = CompiledLayout::for_version(10).unwrap();
    let jpeg = ProcessedImage {
        kind: ImageKind::Jpeg,
        width: 160,
        height: 120,
        colors: 3,
        bits: 8,
        data: vec![0xFF, 0xD8, 0xFF, 0xD9],
    };
    let thumbnail = FrameBuilder::new(&layout).build_thumbnail(jpeg).unwrap();
    assert!(thumbnail.is_jpeg());
    assert_eq!(thumbnail.data, vec![0xFF, 0xD8, 0xFF, 0xD9]);

    let empty = ProcessedImage {
        data: Vec::new(),
        ..bitmap(1, 1, 3, 8)
    };
    assert!(matches!(
        FrameBuilder::new(&layout).build_thumbnail(empty),
        Err(RawError::ThumbnailUnavailable(_))
    ));
}

#[test]
fn test_gps_hemispheres() {
    let gps = GpsInfo {
        latitude: [10.0, 30.0, 0.0],
        longitude: [20.0, 0.0, 0.0],
        altitude: 0.0,
        latitude_ref: 'N',
        longitude_ref: 'W',
    };
    assert_eq!(gps.latitude_degrees(), 10.5);
    assert_eq!(gps.longitude_degrees(), -20.0);
}
