//! Matrix element of modular LUTs
//!
//! Nine s15Fixed16 values row-major, optionally followed by a three-value
//! offset added after the linear map.

use crate::error::Result;
use crate::icc::types::{ensure_len, read_s15f16};
use crate::math::Matrix3x3;

/// 3x3 linear map plus an additive offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixWithOffset {
    pub matrix: Matrix3x3,
    pub offset: [f64; 3],
}

impl MatrixWithOffset {
    #[inline]
    pub fn apply(&self, v: [f64; 3]) -> [f64; 3] {
        let r = self.matrix.multiply_vec(v);
        [r[0] + self.offset[0], r[1] + self.offset[1], r[2] + self.offset[2]]
    }

    pub fn has_offset(&self) -> bool {
        self.offset.iter().any(|o| *o != 0.0)
    }
}

/// Decode a matrix element. The offset is read only when 12 more bytes
/// remain after the nine coefficients.
pub fn decode_matrix(data: &[u8]) -> Result<(MatrixWithOffset, usize)> {
    ensure_len(data, 36)?;
    let mut m = [[0.0f64; 3]; 3];
    for (i, v) in m.iter_mut().flatten().enumerate() {
        *v = read_s15f16(data, i * 4)?.decode();
    }

    let mut offset = [0.0f64; 3];
    let mut used = 36;
    if data.len() >= 48 {
        for (i, v) in offset.iter_mut().enumerate() {
            *v = read_s15f16(data, 36 + i * 4)?.decode();
        }
        used = 48;
    }

    Ok((
        MatrixWithOffset {
            matrix: Matrix3x3::new(m),
            offset,
        },
        used,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn encode(values: &[f64]) -> Vec<u8> {
        values
            .iter()
            .flat_map(|v| ((v * 65536.0).round() as i32).to_be_bytes())
            .collect()
    }

    #[test]
    fn test_matrix_without_offset() {
        let data = encode(&[1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.5]);
        let (mat, used) = decode_matrix(&data).unwrap();
        assert_eq!(used, 36);
        assert!(!mat.has_offset());
        assert_eq!(mat.apply([1.0, 1.0, 1.0]), [1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_matrix_with_offset() {
        let data = encode(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.25, -0.5, 0.0]);
        let (mat, used) = decode_matrix(&data).unwrap();
        assert_eq!(used, 48);
        assert_eq!(mat.apply([0.0, 1.0, 0.0]), [0.25, 0.5, 0.0]);
    }

    #[test]
    fn test_matrix_too_short() {
        assert!(matches!(decode_matrix(&[0u8; 35]), Err(Error::TooShort { needed: 36, .. })));
    }
}
