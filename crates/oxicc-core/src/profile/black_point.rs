//! Black point detection
//!
//! Per-intent black point of a profile, memoised on the profile. The
//! result is XYZ relative to the PCS illuminant, with a = b = 0.
//!
//! Rules, first match wins:
//! 1. Device links, abstract and named color profiles have no black point.
//! 2. Only perceptual, saturation and relative colorimetric have one.
//! 3. v4 perceptual and saturation use the fixed perceptual black, except
//!    matrix/TRC profiles which use their relative colorimetric black.
//! 4. Relative colorimetric on CMYK output profiles uses the perceptual
//!    black found by a round trip.
//! 5. Everything else sends the nominal device black through device → PCS.

use std::sync::PoisonError;

use super::Profile;
use crate::color::{Lab, Xyz};
use crate::icc::{ColorSpace, ProfileClass, RenderingIntent};
use crate::pipeline::{PcsSpace, TransformOptions};

/// ICC v4 perceptual reference medium black
pub const PERCEPTUAL_BLACK: Xyz = Xyz::new(0.00336, 0.0034731, 0.00287);

/// Black lightness never exceeds this
const MAX_BLACK_L: f64 = 50.0;

/// Device value of full black: zeros for additive spaces, full ink for
/// subtractive ones
fn nominal_black(space: ColorSpace) -> Option<Vec<f64>> {
    match space {
        ColorSpace::Rgb | ColorSpace::Gray | ColorSpace::YCbCr => Some(vec![0.0; space.channels()]),
        ColorSpace::Cmy | ColorSpace::Cmyk | ColorSpace::Color(_) => Some(vec![1.0; space.channels()]),
        _ => None,
    }
}

impl Profile {
    /// Black point for `intent`, computed once per intent
    pub fn black_point(&self, intent: RenderingIntent) -> Xyz {
        let cached = self
            .black_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&intent)
            .copied();
        if let Some(black) = cached {
            return black;
        }

        // Computed without the lock; rule 3 recurses into another intent
        let computed = self.detect_black_point(intent);
        tracing::debug!(?intent, ?computed, "Black point");

        let mut cache = self.black_points.lock().unwrap_or_else(PoisonError::into_inner);
        *cache.entry(intent).or_insert(computed)
    }

    fn detect_black_point(&self, intent: RenderingIntent) -> Xyz {
        if matches!(
            self.device_class(),
            ProfileClass::DeviceLink | ProfileClass::Abstract | ProfileClass::NamedColor
        ) {
            return Xyz::ZERO;
        }
        if !matches!(
            intent,
            RenderingIntent::Perceptual | RenderingIntent::Saturation | RenderingIntent::RelativeColorimetric
        ) {
            return Xyz::ZERO;
        }

        if self.version().is_v4()
            && matches!(intent, RenderingIntent::Perceptual | RenderingIntent::Saturation)
        {
            if self.is_matrix_shaper() {
                return self.black_point(RenderingIntent::RelativeColorimetric);
            }
            return PERCEPTUAL_BLACK;
        }

        if intent == RenderingIntent::RelativeColorimetric
            && self.device_class() == ProfileClass::Output
            && self.color_space() == ColorSpace::Cmyk
        {
            return self.perceptual_black();
        }

        self.darker_colorant_black(intent)
    }

    /// Nominal device black through the `intent` device → PCS path
    fn darker_colorant_black(&self, intent: RenderingIntent) -> Xyz {
        let Some(black) = nominal_black(self.color_space()) else {
            return Xyz::ZERO;
        };
        self.forward_black(&black, intent)
    }

    /// Darkest printable color through the perceptual tables
    ///
    /// With a perceptual B2A, Lab black goes PCS → device → PCS. Without
    /// one, device zero goes through the perceptual A2B.
    fn perceptual_black(&self) -> Xyz {
        let channels = self.color_space().channels();
        let options = TransformOptions::new().with_intent(RenderingIntent::Perceptual);

        let mut device = vec![0.0; channels];
        if self.b2a_for_intent(RenderingIntent::Perceptual).is_some() {
            match self.to_device_pipeline(channels, options) {
                // Lab black and XYZ black are both zeros
                Ok(to_device) => to_device.transform_general(&[0.0; 3], &mut device),
                Err(err) => {
                    tracing::debug!(%err, "No perceptual PCS to device path, using device zero");
                }
            }
        }
        self.forward_black(&device, RenderingIntent::Perceptual)
    }

    /// Device value to PCS, then to a neutral black no lighter than L = 50
    fn forward_black(&self, device: &[f64], intent: RenderingIntent) -> Xyz {
        let options = TransformOptions::new().with_intent(intent);
        let to_pcs = match self.to_pcs_pipeline(device.len(), options) {
            Ok(pipeline) => pipeline,
            Err(err) => {
                tracing::debug!(%err, ?intent, "No device to PCS path for black point");
                return Xyz::ZERO;
            }
        };
        let mut pcs = [0.0; 3];
        to_pcs.transform_general(device, &mut pcs);

        let white = self.header().illuminant.to_xyz();
        let lab = match self.pcs_space() {
            PcsSpace::Lab => Lab::from_array(pcs),
            PcsSpace::Xyz => Lab::from_xyz_with_white(Xyz::from_array(pcs), white),
        };
        // NaN or negative lightness is no black at all
        let l = if lab.l >= 0.0 { lab.l.min(MAX_BLACK_L) } else { 0.0 };
        Lab::new(l, 0.0, 0.0).to_xyz_with_white(white)
    }
}
