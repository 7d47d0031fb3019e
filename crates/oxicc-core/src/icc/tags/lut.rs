//! Legacy LUT Tag Types
//!
//! - mft1 (lut8Type): 256-entry 8-bit curves, 8-bit CLUT
//! - mft2 (lut16Type): explicit curve lengths, 16-bit everything
//!
//! Both store a 3x3 matrix, input curves, a CLUT with one grid size for
//! every dimension, then output curves. See ICC.1:2022 Sections 10.10-10.11

use std::sync::Arc;

use super::clut::{Clut, Interpolation, read_samples, validate_shape};
use super::curves::Curve;
use crate::error::{Error, Result};
use crate::icc::types::{Signature, ensure_len, read_s15f16, read_signature, read_u8, read_u16};
use crate::math::Matrix3x3;
use crate::pipeline::{ChannelTransformer, PcsEncoding, Pipeline};

const MFT_MATRIX_OFFSET: usize = 12;
const MFT1_TABLES_OFFSET: usize = 48;
const MFT2_TABLES_OFFSET: usize = 52;
const MFT1_ENTRIES: usize = 256;

/// Decoded mft1 or mft2 tag
#[derive(Debug, Clone, PartialEq)]
pub struct LutTag {
    /// Applied only when the input space is XYZ
    pub matrix: Matrix3x3,
    pub input_curves: Vec<Curve>,
    pub clut: Arc<Clut>,
    pub output_curves: Vec<Curve>,
    /// Bytes per sample: 1 for mft1, 2 for mft2
    pub precision: usize,
}

impl LutTag {
    pub fn inputs(&self) -> usize {
        self.input_curves.len()
    }

    pub fn outputs(&self) -> usize {
        self.output_curves.len()
    }

    /// How a Lab or XYZ PCS side of this table is normalised
    pub fn pcs_encoding(&self, pcs_is_lab: bool) -> PcsEncoding {
        match (pcs_is_lab, self.precision) {
            (false, _) => PcsEncoding::Xyz,
            (true, 1) => PcsEncoding::LabV4,
            (true, _) => PcsEncoding::LabV2,
        }
    }

    /// Matrix, input curves, CLUT, output curves. Identity stages are left out.
    pub fn to_pipeline(&self, input_is_xyz: bool, interpolation: Interpolation) -> Pipeline {
        let mut pipeline = Pipeline::new();
        if input_is_xyz && self.inputs() == 3 && !self.matrix.is_identity(1e-9) {
            pipeline.append(ChannelTransformer::Matrix(self.matrix));
        }
        pipeline.append(ChannelTransformer::curves(self.input_curves.clone()));
        pipeline.append(ChannelTransformer::Clut {
            clut: Arc::clone(&self.clut),
            interpolation,
        });
        pipeline.append(ChannelTransformer::curves(self.output_curves.clone()));
        pipeline
    }
}

/// Decode an mft1 or mft2 body
pub fn decode_lut(data: &[u8]) -> Result<(LutTag, usize)> {
    let sig = read_signature(data, 0)?;
    let precision = match sig {
        Signature::LUT8_TYPE => 1,
        Signature::LUT16_TYPE => 2,
        other => return Err(Error::UnsupportedTagType(other)),
    };

    let inputs = read_u8(data, 8)? as usize;
    let outputs = read_u8(data, 9)? as usize;
    let grid_points = read_u8(data, 10)? as usize;
    validate_shape(&vec![grid_points.max(2); inputs], outputs)?;

    let mut m = [[0.0f64; 3]; 3];
    for (i, v) in m.iter_mut().flatten().enumerate() {
        *v = read_s15f16(data, MFT_MATRIX_OFFSET + i * 4)?.decode();
    }

    let (in_entries, out_entries, mut pos) = if precision == 1 {
        (MFT1_ENTRIES, MFT1_ENTRIES, MFT1_TABLES_OFFSET)
    } else {
        let in_entries = read_u16(data, 48)? as usize;
        let out_entries = read_u16(data, 50)? as usize;
        if in_entries < 2 || out_entries < 2 {
            return Err(Error::inconsistent(format!(
                "mft2 curve tables with {}/{} entries",
                in_entries, out_entries
            )));
        }
        (in_entries, out_entries, MFT2_TABLES_OFFSET)
    };
    ensure_len(data, pos)?;

    let read_tables = |pos: &mut usize, channels: usize, entries: usize| -> Result<Vec<Curve>> {
        let mut curves = Vec::with_capacity(channels);
        for _ in 0..channels {
            let samples = read_samples(data, *pos, entries, precision)?;
            *pos += entries * precision;
            curves.push(Curve::Sampled(samples));
        }
        Ok(curves)
    };

    let input_curves = read_tables(&mut pos, inputs, in_entries)?;

    let grid = vec![grid_points; inputs];
    let count = validate_shape(&grid, outputs)?;
    let samples = read_samples(data, pos, count, precision)?;
    pos += count * precision;
    let clut = Clut::new(grid, outputs, samples)?;

    let output_curves = read_tables(&mut pos, outputs, out_entries)?;

    tracing::trace!(%sig, inputs, outputs, grid_points, "Decoded legacy LUT");
    Ok((
        LutTag {
            matrix: Matrix3x3::new(m),
            input_curves,
            clut: Arc::new(clut),
            output_curves,
            precision,
        },
        pos,
    ))
}
