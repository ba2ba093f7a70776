//! Processing configuration types

use crate::raw_pipeline::common::error::{RawError, Result};
use crate::raw_pipeline::layout::RecordViewMut;

/// White balance applied before demosaicing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WhiteBalance {
    /// Multipliers recorded by the camera.
    #[default]
    Camera,
    /// Averaged over the whole image.
    Auto,
    /// The engine's fixed daylight multipliers.
    Daylight,
    /// Explicit R, G, B, G2 multipliers.
    Custom([f32; 4]),
}

/// Interpolation quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemosaicQuality {
    Linear,
    Vng,
    Ppg,
    #[default]
    Ahd,
    Dcb,
}

impl DemosaicQuality {
    fn code(&self) -> i32 {
        match self {
            DemosaicQuality::Linear => 0,
            DemosaicQuality::Vng => 1,
            DemosaicQuality::Ppg => 2,
            DemosaicQuality::Ahd => 3,
            DemosaicQuality::Dcb => 4,
        }
    }
}

/// Handling of clipped highlights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightMode {
    #[default]
    Clip,
    Unclip,
    Blend,
    /// Reconstruction, 3 (favours whites) to 9 (favours colors).
    Rebuild(u8),
}

impl HighlightMode {
    fn code(&self) -> Result<i32> {
        match *self {
            HighlightMode::Clip => Ok(0),
            HighlightMode::Unclip => Ok(1),
            HighlightMode::Blend => Ok(2),
            HighlightMode::Rebuild(level @ 3..=9) => Ok(level as i32),
            HighlightMode::Rebuild(level) => Err(RawError::ProcessError(format!(
                "highlight rebuild level {} outside 3..=9",
                level
            ))),
        }
    }
}

/// Output color space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorSpace {
    Raw,
    #[default]
    Srgb,
    AdobeRgb,
    WideGamut,
    ProPhoto,
    Xyz,
}

impl ColorSpace {
    fn code(&self) -> i32 {
        match self {
            ColorSpace::Raw => 0,
            ColorSpace::Srgb => 1,
            ColorSpace::AdobeRgb => 2,
            ColorSpace::WideGamut => 3,
            ColorSpace::ProPhoto => 4,
            ColorSpace::Xyz => 5,
        }
    }
}

/// Output tone curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GammaCurve {
    pub power: f64,
    /// Slope of the linear toe.
    pub slope: f64,
}

impl GammaCurve {
    pub const BT709: GammaCurve = GammaCurve {
        power: 2.222,
        slope: 4.5,
    };
    pub const SRGB: GammaCurve = GammaCurve {
        power: 2.4,
        slope: 12.92,
    };
    pub const LINEAR: GammaCurve = GammaCurve {
        power: 1.0,
        slope: 1.0,
    };
}

impl Default for GammaCurve {
    fn default() -> Self {
        GammaCurve::BT709
    }
}

/// Crop rectangle in sensor pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Configuration for one processing run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingOptions {
    pub crop: Option<CropBox>,
    pub white_balance: WhiteBalance,
    /// 8 or 16.
    pub bit_depth: u8,
    pub demosaic: DemosaicQuality,
    pub gamma: GammaCurve,
    pub highlight: HighlightMode,
    pub color_space: ColorSpace,
    /// Halve both dimensions by merging each 2x2 block instead of interpolating.
    pub half_size: bool,
    pub auto_brightness: bool,
    pub brightness: f32,
    /// Median filter passes on color differences, 0 to disable.
    pub median_passes: u32,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            crop: None,
            white_balance: WhiteBalance::default(),
            bit_depth: 8,
            demosaic: DemosaicQuality::default(),
            gamma: GammaCurve::default(),
            highlight: HighlightMode::default(),
            color_space: ColorSpace::default(),
            half_size: false,
            auto_brightness: true,
            brightness: 1.0,
            median_passes: 0,
        }
    }
}

impl ProcessingOptions {
    pub fn builder() -> ProcessingOptionsBuilder {
        ProcessingOptionsBuilder::default()
    }

    /// Reject values the engine cannot be configured with.
    pub fn validate(&self) -> Result<()> {
        if self.bit_depth != 8 && self.bit_depth != 16 {
            return Err(RawError::ProcessError(format!(
                "output bit depth must be 8 or 16, got {}",
                self.bit_depth
            )));
        }
        if self.gamma.power.is_nan() || self.gamma.power <= 0.0 {
            return Err(RawError::ProcessError(format!(
                "gamma power must be positive, got {}",
                self.gamma.power
            )));
        }
        self.highlight.code()?;
        Ok(())
    }

    /// Write these options into a `libraw_data_t` view's `params` record.
    /// Nothing is written unless the options validate.
    pub fn apply(&self, data: &mut RecordViewMut<'_>) -> Result<()> {
        self.validate()?;

        let cropbox = match self.crop {
            Some(c) => [c.left, c.top, c.width, c.height],
            None => [0, 0, 0, 0],
        };
        data.write_array("params.cropbox", &cropbox)?;

        let (camera_wb, auto_wb, user_mul) = match self.white_balance {
            WhiteBalance::Camera => (1, 0, [0.0; 4]),
            WhiteBalance::Auto => (0, 1, [0.0; 4]),
            WhiteBalance::Daylight => (0, 0, [0.0; 4]),
            WhiteBalance::Custom(mul) => (0, 0, mul),
        };
        data.write("params.use_camera_wb", camera_wb as i32)?;
        data.write("params.use_auto_wb", auto_wb as i32)?;
        data.write_array("params.user_mul", &user_mul)?;

        data.write("params.output_bps", self.bit_depth as i32)?;
        data.write("params.user_qual", self.demosaic.code())?;
        data.write_at("params.gamm", 0, 1.0 / self.gamma.power)?;
        data.write_at("params.gamm", 1, self.gamma.slope)?;
        data.write("params.highlight", self.highlight.code()?)?;
        data.write("params.output_color", self.color_space.code())?;
        data.write("params.half_size", self.half_size as i32)?;
        data.write("params.no_auto_bright", (!self.auto_brightness) as i32)?;
        data.write("params.bright", self.brightness)?;
        data.write("params.med_passes", self.median_passes as i32)?;
        Ok(())
    }
}

/// Builder for ProcessingOptions
#[derive(Default)]
pub struct ProcessingOptionsBuilder {
    crop: Option<Option<CropBox>>,
    white_balance: Option<WhiteBalance>,
    bit_depth: Option<u8>,
    demosaic: Option<DemosaicQuality>,
    gamma: Option<GammaCurve>,
    highlight: Option<HighlightMode>,
    color_space: Option<ColorSpace>,
    half_size: Option<bool>,
    auto_brightness: Option<bool>,
    brightness: Option<f32>,
    median_passes: Option<u32>,
}

impl ProcessingOptionsBuilder {
    pub fn crop(mut self, crop: Option<CropBox>) -> Self {
        self.crop = Some(crop);
        self
    }

    pub fn white_balance(mut self, white_balance: WhiteBalance) -> Self {
        self.white_balance = Some(white_balance);
        self
    }

    pub fn bit_depth(mut self, bits: u8) -> Self {
        self.bit_depth = Some(bits);
        self
    }

    pub fn demosaic(mut self, quality: DemosaicQuality) -> Self {
        self.demosaic = Some(quality);
        self
    }

    pub fn gamma(mut self, gamma: GammaCurve) -> Self {
        self.gamma = Some(gamma);
        self
    }

    pub fn highlight(mut self, mode: HighlightMode) -> Self {
        self.highlight = Some(mode);
        self
    }

    pub fn color_space(mut self, space: ColorSpace) -> Self {
        self.color_space = Some(space);
        self
    }

    pub fn half_size(mut self, enable: bool) -> Self {
        self.half_size = Some(enable);
        self
    }

    pub fn auto_brightness(mut self, enable: bool) -> Self {
        self.auto_brightness = Some(enable);
        self
    }

    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn median_passes(mut self, passes: u32) -> Self {
        self.median_passes = Some(passes);
        self
    }

    pub fn build(self) -> ProcessingOptions {
        let default = ProcessingOptions::default();
        ProcessingOptions {
            crop: self.crop.unwrap_or(default.crop),
            white_balance: self.white_balance.unwrap_or(default.white_balance),
            bit_depth: self.bit_depth.unwrap_or(default.bit_depth),
            demosaic: self.demosaic.unwrap_or(default.demosaic),
            gamma: self.gamma.unwrap_or(default.gamma),
            highlight: self.highlight.unwrap_or(default.highlight),
            color_space: self.color_space.unwrap_or(default.color_space),
            half_size: self.half_size.unwrap_or(default.half_size),
            auto_brightness: self.auto_brightness.unwrap_or(default.auto_brightness),
            brightness: self.brightness.unwrap_or(default.brightness),
            median_passes: self.median_passes.unwrap_or(default.median_passes),
        }
    }
}
