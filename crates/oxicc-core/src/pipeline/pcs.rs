//! PCS value encodings at LUT boundaries
//!
//! LUT tags work on values normalised to [0, 1]. Pipelines carry real PCS
//! units instead: XYZ with the white at Y = 1, Lab with L in 0..100. These
//! encodings convert between the two.

use crate::math::clamp_unit;

/// Which connection space a stage reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PcsSpace {
    Xyz,
    Lab,
}

/// Normalised encoding of a PCS value inside a LUT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PcsEncoding {
    /// 16-bit legacy Lab of mft2: L 0xFF00 = 100, a/b 0xFF00 = 127
    LabV2,
    /// Lab of v4 tags and mft1: L 0xFFFF = 100, a/b 0..0xFFFF = -128..127
    LabV4,
    /// u1Fixed15 XYZ: 0x8000 = 1.0
    Xyz,
}

const U1F15_SCALE: f64 = 65535.0 / 32768.0;
const LAB_V2_L_SCALE: f64 = 65535.0 / 65280.0 * 100.0;
const LAB_V2_AB_SCALE: f64 = 65535.0 / 256.0;

impl PcsEncoding {
    /// Normalised LUT values to PCS units
    #[inline]
    pub fn decode(self, v: [f64; 3]) -> [f64; 3] {
        match self {
            PcsEncoding::LabV2 => [
                v[0] * LAB_V2_L_SCALE,
                v[1] * LAB_V2_AB_SCALE - 128.0,
                v[2] * LAB_V2_AB_SCALE - 128.0,
            ],
            PcsEncoding::LabV4 => [v[0] * 100.0, v[1] * 255.0 - 128.0, v[2] * 255.0 - 128.0],
            PcsEncoding::Xyz => v.map(|c| c * U1F15_SCALE),
        }
    }

    /// PCS units to normalised LUT values, clamped to [0, 1]
    #[inline]
    pub fn encode(self, v: [f64; 3]) -> [f64; 3] {
        let n = match self {
            PcsEncoding::LabV2 => [
                v[0] / LAB_V2_L_SCALE,
                (v[1] + 128.0) / LAB_V2_AB_SCALE,
                (v[2] + 128.0) / LAB_V2_AB_SCALE,
            ],
            PcsEncoding::LabV4 => [v[0] / 100.0, (v[1] + 128.0) / 255.0, (v[2] + 128.0) / 255.0],
            PcsEncoding::Xyz => v.map(|c| c / U1F15_SCALE),
        };
        n.map(clamp_unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_v2_white() {
        let lab = PcsEncoding::LabV2.decode([65280.0 / 65535.0, 32768.0 / 65535.0, 32768.0 / 65535.0]);
        assert!((lab[0] - 100.0).abs() < 1e-9, "{:?}", lab);
        assert!(lab[1].abs() < 1e-9, "{:?}", lab);
    }

    #[test]
    fn test_lab_v4_range() {
        let lab = PcsEncoding::LabV4.decode([1.0, 0.0, 1.0]);
        assert_eq!(lab, [100.0, -128.0, 127.0]);
    }

    #[test]
    fn test_xyz_one() {
        let xyz = PcsEncoding::Xyz.decode([32768.0 / 65535.0; 3]);
        for v in xyz {
            assert!((v - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_encode_inverts_decode() {
        for enc in [PcsEncoding::LabV2, PcsEncoding::LabV4, PcsEncoding::Xyz] {
            let v = [0.2, 0.5, 0.9];
            let back = enc.encode(enc.decode(v));
            for i in 0..3 {
                assert!((back[i] - v[i]).abs() < 1e-12, "{:?}: {:?}", enc, back);
            }
        }
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(PcsEncoding::Xyz.encode([5.0, -1.0, f64::NAN]), [1.0, 0.0, 0.0]);
    }
}
