//! ICC Profile Model
//!
//! A [`Profile`] owns the parsed header, the tag directory and the raw
//! bytes. Tags are decoded lazily and cached, so a profile with one broken
//! tag still answers queries about the others.
//!
//! # Usage
//!
//! ```ignore
//! let profile = Profile::parse(&bytes)?;
//! println!("Profile: {:?}", profile.description());
//! let to_srgb = profile.to_srgb_pipeline(3, &TransformOptions::default())?;
//! let rgb = to_srgb.transform([1.0, 1.0, 1.0]);
//! ```

mod black_point;
mod factory;
mod tag_table;
mod well_known;

pub use tag_table::TagEntry;
pub use well_known::WellKnownProfile;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use tag_table::TagTable;

use crate::color::{D50, Xyz};
use crate::error::{Error, Result};
use crate::icc::tags::{Curve, LutDirection, TagValue};
use crate::icc::{ColorSpace, IccHeader, ProfileClass, ProfileVersion, RenderingIntent, Signature};
use crate::math::Matrix3x3;

/// A parsed ICC profile
#[derive(Debug)]
pub struct Profile {
    header: IccHeader,
    tags: TagTable,
    data: Arc<[u8]>,
    description: OnceLock<Option<String>>,
    well_known: OnceLock<WellKnownProfile>,
    black_points: Mutex<HashMap<RenderingIntent, Xyz>>,
}

impl Profile {
    /// Parse the header and tag directory
    ///
    /// Tag bodies are not touched until first use.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let span = tracing::trace_span!("parse_profile", len = data.len());
        let _enter = span.enter();

        let header = IccHeader::parse(data)?;
        let illuminant = header.illuminant.to_xyz();
        if !illuminant.approx_eq(&D50, 1e-3) {
            tracing::warn!(?illuminant, "PCS illuminant is not D50");
        }
        let tags = TagTable::parse(data)?;

        tracing::debug!(
            class = ?header.device_class,
            space = ?header.color_space,
            pcs = ?header.pcs,
            version = %format_args!("{}.{}", header.version.major, header.version.minor),
            tags = tags.len(),
            "Parsed profile"
        );

        Ok(Self {
            header,
            tags,
            data: Arc::from(data),
            description: OnceLock::new(),
            well_known: OnceLock::new(),
            black_points: Mutex::new(HashMap::new()),
        })
    }

    pub fn header(&self) -> &IccHeader {
        &self.header
    }

    pub fn version(&self) -> ProfileVersion {
        self.header.version
    }

    pub fn device_class(&self) -> ProfileClass {
        self.header.device_class
    }

    /// Data color space
    pub fn color_space(&self) -> ColorSpace {
        self.header.color_space
    }

    pub fn pcs(&self) -> ColorSpace {
        self.header.pcs
    }

    pub fn rendering_intent(&self) -> RenderingIntent {
        self.header.rendering_intent
    }

    pub fn raw_data(&self) -> &[u8] {
        &self.data
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// Decoded tag, cached after the first call
    pub fn tag(&self, signature: Signature) -> Result<Arc<TagValue>> {
        self.tags.get(&self.data, signature)
    }

    pub fn has_tag(&self, signature: Signature) -> bool {
        self.tags.contains(signature)
    }

    /// Byte range of a tag in the profile
    pub fn tag_entry(&self, signature: Signature) -> Option<TagEntry> {
        self.tags.entry(signature)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Signatures in directory order
    pub fn tag_signatures(&self) -> impl Iterator<Item = Signature> + '_ {
        self.tags.signatures()
    }

    fn xyz_tag(&self, signature: Signature) -> Result<Xyz> {
        self.tag(signature)?.as_xyz()
    }

    fn curve_tag(&self, signature: Signature) -> Result<Curve> {
        self.tag(signature)?.as_curve().cloned()
    }

    fn text_tag(&self, signature: Signature) -> Option<String> {
        let tag = self.tag(signature).ok()?;
        tag.as_text().ok().map(|t| t.text.clone())
    }

    /// Profile description, decoded once
    pub fn description(&self) -> Option<&str> {
        self.description
            .get_or_init(|| self.text_tag(Signature::DESC))
            .as_deref()
    }

    pub fn copyright(&self) -> Option<String> {
        self.text_tag(Signature::COPYRIGHT)
    }

    pub fn red_colorant(&self) -> Result<Xyz> {
        self.xyz_tag(Signature::RED_COLORANT)
    }

    pub fn green_colorant(&self) -> Result<Xyz> {
        self.xyz_tag(Signature::GREEN_COLORANT)
    }

    pub fn blue_colorant(&self) -> Result<Xyz> {
        self.xyz_tag(Signature::BLUE_COLORANT)
    }

    /// Colorants as the columns of the device to PCS matrix
    pub fn colorant_matrix(&self) -> Result<Matrix3x3> {
        Ok(Matrix3x3::from_columns(
            self.red_colorant()?.to_array(),
            self.green_colorant()?.to_array(),
            self.blue_colorant()?.to_array(),
        ))
    }

    pub fn media_white_point(&self) -> Result<Xyz> {
        self.xyz_tag(Signature::MEDIA_WHITE)
    }

    pub fn media_black_point(&self) -> Result<Xyz> {
        self.xyz_tag(Signature::MEDIA_BLACK)
    }

    /// `chad` chromatic adaptation matrix
    pub fn chromatic_adaptation(&self) -> Result<Matrix3x3> {
        self.tag(Signature::CHAD)?.as_matrix()
    }

    pub fn red_trc(&self) -> Result<Curve> {
        self.curve_tag(Signature::RED_TRC)
    }

    pub fn green_trc(&self) -> Result<Curve> {
        self.curve_tag(Signature::GREEN_TRC)
    }

    pub fn blue_trc(&self) -> Result<Curve> {
        self.curve_tag(Signature::BLUE_TRC)
    }

    /// Red, green and blue TRCs
    pub fn rgb_trcs(&self) -> Result<Vec<Curve>> {
        Ok(vec![self.red_trc()?, self.green_trc()?, self.blue_trc()?])
    }

    pub fn gray_trc(&self) -> Result<Curve> {
        self.curve_tag(Signature::GRAY_TRC)
    }

    /// Signature of the LUT tag serving `intent` in `direction`
    ///
    /// Colorimetric intents use the *1 tag and saturation the *2 tag,
    /// both falling back to the perceptual *0 tag.
    pub fn lut_for_intent(&self, direction: LutDirection, intent: RenderingIntent) -> Option<Signature> {
        let [perceptual, colorimetric, saturation] = match direction {
            LutDirection::AToB => [Signature::A2B0, Signature::A2B1, Signature::A2B2],
            LutDirection::BToA => [Signature::B2A0, Signature::B2A1, Signature::B2A2],
        };
        let preferred = match intent {
            RenderingIntent::Perceptual => perceptual,
            RenderingIntent::RelativeColorimetric | RenderingIntent::AbsoluteColorimetric => colorimetric,
            RenderingIntent::Saturation => saturation,
        };
        [preferred, perceptual]
            .into_iter()
            .find(|sig| self.has_tag(*sig))
    }

    /// A2B tag for `intent`
    pub fn a2b_for_intent(&self, intent: RenderingIntent) -> Option<Signature> {
        self.lut_for_intent(LutDirection::AToB, intent)
    }

    /// B2A tag for `intent`
    pub fn b2a_for_intent(&self, intent: RenderingIntent) -> Option<Signature> {
        self.lut_for_intent(LutDirection::BToA, intent)
    }

    /// Has rXYZ/gXYZ/bXYZ with rTRC/gTRC/bTRC, or a kTRC
    pub fn is_matrix_shaper(&self) -> bool {
        let rgb = [
            Signature::RED_COLORANT,
            Signature::GREEN_COLORANT,
            Signature::BLUE_COLORANT,
            Signature::RED_TRC,
            Signature::GREEN_TRC,
            Signature::BLUE_TRC,
        ]
        .into_iter()
        .all(|sig| self.has_tag(sig));
        rgb || self.has_tag(Signature::GRAY_TRC)
    }

    /// Has any A2B or B2A tag
    pub fn is_lut_based(&self) -> bool {
        [
            Signature::A2B0,
            Signature::A2B1,
            Signature::A2B2,
            Signature::B2A0,
            Signature::B2A1,
            Signature::B2A2,
        ]
        .into_iter()
        .any(|sig| self.has_tag(sig))
    }

    /// Known standard profile this one matches, detected once
    pub fn well_known(&self) -> WellKnownProfile {
        *self.well_known.get_or_init(|| well_known::detect(self))
    }

    /// Media white relative to D50, for absolute colorimetric
    ///
    /// Falls back to D50 (no scaling) when the profile has no usable wtpt.
    fn absolute_scale(&self) -> Matrix3x3 {
        match self.media_white_point() {
            Ok(white) if white.x > 0.0 && white.y > 0.0 && white.z > 0.0 => Matrix3x3::diagonal(
                white.x / D50.x,
                white.y / D50.y,
                white.z / D50.z,
            ),
            Ok(_) | Err(_) => {
                tracing::debug!("No usable media white, absolute colorimetric is relative");
                Matrix3x3::identity()
            }
        }
    }

    /// Channel count check shared by every factory entry point
    fn check_channels(&self, channel_count: usize) -> Result<()> {
        let expected = self.header.color_space.channels();
        if channel_count != expected {
            return Err(Error::inconsistent(format!(
                "{} channels requested for a {:?} profile with {}",
                channel_count, self.header.color_space, expected
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test_profiles;
