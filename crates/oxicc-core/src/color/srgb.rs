//! PCS to sRGB conversion
//!
//! XYZ (D50) is Bradford-adapted to D65, mapped to linear sRGB with the
//! IEC 61966-2-1 matrix, then companded. The Lab entry points optionally
//! gamut map by reducing chroma at constant lightness and hue.

use std::sync::OnceLock;

use crate::color::white_point::{D50, D65};
use crate::color::{Lab, Xyz};
use crate::math::gamma::{srgb_gamma_decode, srgb_gamma_encode};
use crate::math::matrix::XYZ_TO_SRGB;
use crate::math::{Matrix3x3, bradford_matrix, clamp_unit};

/// Bisection steps when searching the in-gamut chroma scale
const GAMUT_ITERATIONS: usize = 40;

struct SrgbMatrices {
    from_pcs: Matrix3x3,
    to_pcs: Matrix3x3,
}

fn matrices() -> &'static SrgbMatrices {
    static MATRICES: OnceLock<SrgbMatrices> = OnceLock::new();
    MATRICES.get_or_init(|| {
        let from_pcs = XYZ_TO_SRGB.multiply(&bradford_matrix(D50, D65));
        // XYZ_TO_SRGB and Bradford are both well conditioned
        let to_pcs = from_pcs.inverse().unwrap_or_else(Matrix3x3::identity);
        SrgbMatrices { from_pcs, to_pcs }
    })
}

/// D50 PCS XYZ to linear sRGB, Bradford adapted
pub fn pcs_to_linear_srgb_matrix() -> Matrix3x3 {
    matrices().from_pcs
}

/// Linear sRGB to D50 PCS XYZ
pub fn linear_srgb_to_pcs_matrix() -> Matrix3x3 {
    matrices().to_pcs
}

#[inline]
fn in_unit_cube(rgb: &[f64; 3]) -> bool {
    rgb.iter().all(|v| (0.0..=1.0).contains(v))
}

#[inline]
fn encode(linear: [f64; 3]) -> [f64; 3] {
    linear.map(|v| srgb_gamma_encode(clamp_unit(v)))
}

/// Lab (D50) to linear sRGB without any range handling
pub fn lab_to_linear_srgb(lab: Lab) -> [f64; 3] {
    matrices().from_pcs.multiply_vec(lab.to_xyz().to_array())
}

/// Lab (D50) to companded sRGB, gamut mapped into [0, 1]
///
/// Lightness is clamped to 0..100. Out-of-gamut colors keep L and hue and
/// lose chroma until linear sRGB fits the unit cube.
pub fn lab_to_srgb(lab: Lab) -> [f64; 3] {
    let lab = Lab::new(lab.l.clamp(0.0, 100.0), lab.a, lab.b);
    let linear = lab_to_linear_srgb(lab);
    if in_unit_cube(&linear) {
        return encode(linear);
    }

    let scaled = |s: f64| lab_to_linear_srgb(Lab::new(lab.l, lab.a * s, lab.b * s));
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..GAMUT_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if in_unit_cube(&scaled(mid)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    encode(scaled(lo))
}

/// XYZ (D50) to companded sRGB through the Lab projection
///
/// Agrees with [`lab_to_srgb`] for the same color, including gamut mapping.
pub fn xyz_to_srgb(xyz: Xyz) -> [f64; 3] {
    lab_to_srgb(Lab::from_xyz(xyz))
}

/// Companded sRGB to XYZ (D50)
pub fn srgb_to_xyz(rgb: [f64; 3]) -> Xyz {
    let linear = rgb.map(srgb_gamma_decode);
    Xyz::from_array(matrices().to_pcs.multiply_vec(linear))
}

/// Companded sRGB to Lab (D50)
pub fn srgb_to_lab(rgb: [f64; 3]) -> Lab {
    Lab::from_xyz(srgb_to_xyz(rgb))
}
