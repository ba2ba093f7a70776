//! Capture metadata copied out of the engine's data record.

use tracing::debug;

use crate::raw_pipeline::common::error::Result;
use crate::raw_pipeline::layout::RecordView;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsInfo {
    /// Degrees, minutes, seconds.
    pub latitude: [f32; 3],
    pub longitude: [f32; 3],
    pub altitude: f32,
    pub latitude_ref: char,
    pub longitude_ref: char,
}

impl GpsInfo {
    /// Signed decimal degrees, negative for the southern hemisphere.
    pub fn latitude_degrees(&self) -> f64 {
        signed_degrees(&self.latitude, self.latitude_ref == 'S')
    }

    /// Signed decimal degrees, negative west of Greenwich.
    pub fn longitude_degrees(&self) -> f64 {
        signed_degrees(&self.longitude, self.longitude_ref == 'W')
    }
}

fn signed_degrees(dms: &[f32; 3], negative: bool) -> f64 {
    let value = dms[0] as f64 + dms[1] as f64 / 60.0 + dms[2] as f64 / 3600.0;
    if negative { -value } else { value }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LensInfo {
    pub make: String,
    pub name: String,
    pub min_focal: f32,
    pub max_focal: f32,
    pub max_aperture_at_min_focal: f32,
    pub max_aperture_at_max_focal: f32,
    pub focal_length_35mm: u16,
    /// Maker-specific lens identifier, 0 when unknown.
    pub lens_id: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetadata {
    pub make: String,
    pub model: String,
    /// Firmware string, only reported by newer engines.
    pub software: Option<String>,
    pub raw_width: u16,
    pub raw_height: u16,
    pub width: u16,
    pub height: u16,
    pub flip: i32,
    pub colors: i32,
    pub color_description: String,
    pub iso_speed: f32,
    /// Seconds.
    pub shutter: f32,
    pub aperture: f32,
    /// Millimetres.
    pub focal_length: f32,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub artist: String,
    pub description: String,
    pub gps: Option<GpsInfo>,
    pub lens: LensInfo,
}

impl FrameMetadata {
    /// Read from a `libraw_data_t` view. Fields missing in older layouts stay `None`.
    pub fn read(data: &RecordView<'_>) -> Result<Self> {
        let metadata = Self {
            make: data.read_string("idata.make")?,
            model: data.read_string("idata.model")?,
            software: data
                .try_read_string("idata.software")?
                .filter(|s| !s.is_empty()),
            raw_width: data.read("sizes.raw_width")?,
            raw_height: data.read("sizes.raw_height")?,
            width: data.read("sizes.width")?,
            height: data.read("sizes.height")?,
            flip: data.read("sizes.flip")?,
            colors: data.read("idata.colors")?,
            color_description: data.read_string("idata.cdesc")?,
            iso_speed: data.read("other.iso_speed")?,
            shutter: data.read("other.shutter")?,
            aperture: data.read("other.aperture")?,
            focal_length: data.read("other.focal_len")?,
            timestamp: data.read("other.timestamp")?,
            artist: data.read_string("other.artist")?,
            description: data.read_string("other.desc")?,
            gps: read_gps(data)?,
            lens: read_lens(data)?,
        };

        debug!(
            "Read metadata for {} {} ({}x{})",
            metadata.make, metadata.model, metadata.width, metadata.height
        );
        Ok(metadata)
    }
}

fn read_gps(data: &RecordView<'_>) -> Result<Option<GpsInfo>> {
    match data.try_read::<i8>("other.parsed_gps.gpsparsed")? {
        Some(parsed) if parsed != 0 => {}
        _ => return Ok(None),
    }

    let triple = |path: &str| -> Result<[f32; 3]> {
        Ok([
            data.read_at(path, 0)?,
            data.read_at(path, 1)?,
            data.read_at(path, 2)?,
        ])
    };
    let reference = |path: &str| -> Result<char> {
        let raw: i8 = data.read(path)?;
        Ok(raw as u8 as char)
    };

    Ok(Some(GpsInfo {
        latitude: triple("other.parsed_gps.latitude")?,
        longitude: triple("other.parsed_gps.longitude")?,
        altitude: data.read("other.parsed_gps.altitude")?,
        latitude_ref: reference("other.parsed_gps.latref")?,
        longitude_ref: reference("other.parsed_gps.longref")?,
    }))
}

fn read_lens(data: &RecordView<'_>) -> Result<LensInfo> {
    Ok(LensInfo {
        make: data.read_string("lens.LensMake")?,
        name: data.read_string("lens.Lens")?,
        min_focal: data.read("lens.MinFocal")?,
        max_focal: data.read("lens.MaxFocal")?,
        max_aperture_at_min_focal: data.read("lens.MaxAp4MinFocal")?,
        max_aperture_at_max_focal: data.read("lens.MaxAp4MaxFocal")?,
        focal_length_35mm: data.read("lens.FocalLengthIn35mmFormat")?,
        lens_id: data.try_read("lens.makernotes.LensID")?.unwrap_or(0),
    })
}
