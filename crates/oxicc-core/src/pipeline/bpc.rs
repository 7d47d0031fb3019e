//! Black point compensation
//!
//! An affine map per XYZ channel that moves one black point onto another
//! while the D50 white stays where it is. The factory puts it after the
//! device → PCS stages (profile black to zero) or before the PCS → device
//! stages (zero to profile black).

use crate::color::{D50, Xyz};

/// Per-channel affine correction in XYZ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackPointCorrection {
    pub scale: [f64; 3],
    pub offset: [f64; 3],
}

impl BlackPointCorrection {
    /// Correction taking `src_bp` to `dst_bp` with the D50 white fixed
    ///
    /// Returns None when a source black component equals the white, which
    /// leaves the channel scale undefined.
    pub fn new(src_bp: Xyz, dst_bp: Xyz) -> Option<Self> {
        let wp = D50.to_array();
        let src = src_bp.to_array();
        let dst = dst_bp.to_array();

        let mut scale = [1.0; 3];
        let mut offset = [0.0; 3];
        for i in 0..3 {
            let t = src[i] - wp[i];
            if t.abs() < 1e-10 {
                return None;
            }
            scale[i] = (dst[i] - wp[i]) / t;
            offset[i] = -wp[i] * (dst[i] - src[i]) / t;
        }
        Some(Self { scale, offset })
    }

    #[inline]
    pub fn apply(&self, xyz: [f64; 3]) -> [f64; 3] {
        [
            self.offset[0] + xyz[0] * self.scale[0],
            self.offset[1] + xyz[1] * self.scale[1],
            self.offset[2] + xyz[2] * self.scale[2],
        ]
    }

    pub fn is_identity(&self) -> bool {
        self.scale.iter().all(|s| (s - 1.0).abs() < 1e-12)
            && self.offset.iter().all(|o| o.abs() < 1e-12)
    }
}
