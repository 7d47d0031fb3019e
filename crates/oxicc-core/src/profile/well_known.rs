//! Well-known profile detection
//!
//! Only colorimetry decides: an RGB matrix/TRC profile must carry the
//! D50-adapted reference colorants and TRCs. A description naming a
//! standard space just orders the search and is never enough on its own.

use std::sync::OnceLock;

use super::Profile;
use crate::color::{D50, D65};
use crate::icc::ColorSpace;
use crate::icc::tags::Curve;
use crate::math::{Matrix3x3, bradford_matrix, srgb_gamma_decode};

/// Colorant tolerance, covering s15Fixed16 rounding and adaptation variants
const COLORANT_TOLERANCE: f64 = 5e-3;
const TRC_TOLERANCE: f64 = 5e-3;
const TRC_SAMPLES: [f64; 5] = [0.1, 0.25, 0.5, 0.75, 1.0];

/// Adobe RGB (1998) gamma, 563/256
const ADOBE_GAMMA: f64 = 2.19921875;

/// Standard profiles recognised by [`Profile::well_known`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WellKnownProfile {
    Srgb,
    DisplayP3,
    AdobeRgb,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Transfer {
    Srgb,
    Gamma(f64),
}

impl Transfer {
    fn eval(self, x: f64) -> f64 {
        match self {
            Transfer::Srgb => srgb_gamma_decode(x),
            Transfer::Gamma(g) => x.powf(g),
        }
    }
}

struct Reference {
    profile: WellKnownProfile,
    colorants: Matrix3x3,
    transfer: Transfer,
}

/// xy chromaticity to XYZ with Y = 1
fn xy_to_xyz(x: f64, y: f64) -> [f64; 3] {
    [x / y, 1.0, (1.0 - x - y) / y]
}

/// D65 primaries to a D50 colorant matrix (colorants as columns)
fn d50_colorants(primaries: [(f64, f64); 3]) -> Matrix3x3 {
    let [r, g, b] = primaries.map(|(x, y)| xy_to_xyz(x, y));
    let xyz = Matrix3x3::from_columns(r, g, b);
    // Scale each primary so that RGB white lands on D65
    let s = xyz
        .inverse()
        .map(|inv| inv.multiply_vec(D65.to_array()))
        .unwrap_or([1.0; 3]);
    let scaled = xyz.multiply(&Matrix3x3::diagonal(s[0], s[1], s[2]));
    bradford_matrix(D65, D50).multiply(&scaled)
}

fn references() -> &'static [Reference] {
    static REFERENCES: OnceLock<Vec<Reference>> = OnceLock::new();
    REFERENCES.get_or_init(|| {
        vec![
            Reference {
                profile: WellKnownProfile::Srgb,
                colorants: d50_colorants([(0.64, 0.33), (0.30, 0.60), (0.15, 0.06)]),
                transfer: Transfer::Srgb,
            },
            Reference {
                profile: WellKnownProfile::DisplayP3,
                colorants: d50_colorants([(0.680, 0.320), (0.265, 0.690), (0.150, 0.060)]),
                transfer: Transfer::Srgb,
            },
            Reference {
                profile: WellKnownProfile::AdobeRgb,
                colorants: d50_colorants([(0.64, 0.33), (0.21, 0.71), (0.15, 0.06)]),
                transfer: Transfer::Gamma(ADOBE_GAMMA),
            },
        ]
    })
}

fn from_description(description: &str) -> Option<WellKnownProfile> {
    let lower = description.to_ascii_lowercase();
    if lower.contains("display p3") {
        Some(WellKnownProfile::DisplayP3)
    } else if lower.contains("adobe rgb") {
        Some(WellKnownProfile::AdobeRgb)
    } else if lower.contains("srgb") {
        Some(WellKnownProfile::Srgb)
    } else {
        None
    }
}

fn trcs_match(trcs: &[Curve], transfer: Transfer) -> bool {
    trcs.iter().all(|trc| {
        TRC_SAMPLES
            .iter()
            .all(|&x| (trc.eval(x) - transfer.eval(x)).abs() < TRC_TOLERANCE)
    })
}

fn from_colorimetry(profile: &Profile, hint: Option<WellKnownProfile>) -> Option<WellKnownProfile> {
    if profile.color_space() != ColorSpace::Rgb {
        return None;
    }
    let colorants = profile.colorant_matrix().ok()?;
    let trcs = profile.rgb_trcs().ok()?;
    let matches = |r: &&Reference| {
        colorants.approx_eq(&r.colorants, COLORANT_TOLERANCE) && trcs_match(&trcs, r.transfer)
    };
    // The named reference is tried first
    let named = references().iter().filter(|r| Some(r.profile) == hint);
    let others = references().iter().filter(|r| Some(r.profile) != hint);
    named.chain(others).find(matches).map(|r| r.profile)
}

pub(super) fn detect(profile: &Profile) -> WellKnownProfile {
    let hint = profile.description().and_then(from_description);
    let detected = from_colorimetry(profile, hint).unwrap_or(WellKnownProfile::Unknown);
    if hint.is_some_and(|h| h != detected) {
        tracing::debug!(?hint, ?detected, "Description disagrees with colorimetry");
    }
    tracing::debug!(?detected, "Well-known profile detection");
    detected
}
