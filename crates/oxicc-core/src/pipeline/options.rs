//! Transform Options
//!
//! Configuration for the transform factory.

use crate::icc::RenderingIntent;
use crate::icc::tags::Interpolation;

/// Options for building device/PCS/sRGB transforms
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformOptions {
    pub intent: RenderingIntent,
    /// Use black point compensation
    pub black_point_compensation: bool,
    /// Interpolation for 3-input CLUTs
    pub interpolation: Interpolation,
    /// Device to sRGB ends in chroma-reducing gamut mapping instead of a clip
    pub gamut_mapping: bool,
    /// Clamp sRGB output to [0, 1]
    pub clamp_output: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            intent: RenderingIntent::default(),
            black_point_compensation: false,
            interpolation: Interpolation::default(),
            gamut_mapping: false,
            clamp_output: true,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_intent(mut self, intent: RenderingIntent) -> Self {
        self.intent = intent;
        self
    }

    /// Enable black point compensation
    pub fn with_bpc(mut self) -> Self {
        self.black_point_compensation = true;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_gamut_mapping(mut self) -> Self {
        self.gamut_mapping = true;
        self
    }

    /// Leave sRGB output unclamped (values outside [0, 1] pass through)
    pub fn without_clamp(mut self) -> Self {
        self.clamp_output = false;
        self
    }
}
