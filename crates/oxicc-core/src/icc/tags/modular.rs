//! Modular LUT Tag Types
//!
//! - mAB (lutAToBType): A curves, CLUT, M curves, matrix, B curves
//! - mBA (lutBToAType): the same elements executed in reverse
//!
//! Every element is optional and located by an offset from the start of
//! the tag. See ICC.1:2022 Sections 10.12-10.13

use std::sync::Arc;

use super::clut::{Clut, Interpolation, decode_clut};
use super::curves::{Curve, decode_curve_set};
use super::matrix::{MatrixWithOffset, decode_matrix};
use crate::error::{Error, Result};
use crate::icc::types::{Signature, read_signature, read_u8, read_u32};
use crate::pipeline::{ChannelTransformer, Pipeline};

const OFFSET_B: usize = 12;
const OFFSET_MATRIX: usize = 16;
const OFFSET_M: usize = 20;
const OFFSET_CLUT: usize = 24;
const OFFSET_A: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LutDirection {
    AToB,
    BToA,
}

/// Decoded mAB or mBA tag
#[derive(Debug, Clone, PartialEq)]
pub struct ModularTag {
    pub direction: LutDirection,
    pub inputs: usize,
    pub outputs: usize,
    pub a_curves: Option<Vec<Curve>>,
    pub clut: Option<Arc<Clut>>,
    pub m_curves: Option<Vec<Curve>>,
    pub matrix: Option<MatrixWithOffset>,
    pub b_curves: Option<Vec<Curve>>,
}

impl ModularTag {
    /// Elements in execution order. Identity curve sets are skipped.
    pub fn to_pipeline(&self, interpolation: Interpolation) -> Pipeline {
        let clut = self.clut.as_ref().map(|clut| ChannelTransformer::Clut {
            clut: Arc::clone(clut),
            interpolation,
        });
        let matrix = self.matrix.map(ChannelTransformer::from_matrix_with_offset);
        let curves = |set: &Option<Vec<Curve>>| set.clone().map(ChannelTransformer::curves);

        let stages = match self.direction {
            LutDirection::AToB => [
                curves(&self.a_curves),
                clut,
                curves(&self.m_curves),
                matrix,
                curves(&self.b_curves),
            ],
            LutDirection::BToA => [
                curves(&self.b_curves),
                matrix,
                curves(&self.m_curves),
                clut,
                curves(&self.a_curves),
            ],
        };

        let mut pipeline = Pipeline::new();
        for stage in stages.into_iter().flatten() {
            pipeline.append(stage);
        }
        pipeline
    }

    fn validate(&self) -> Result<()> {
        // Channels on the CLUT input side and on the matrix side
        let (clut_side, matrix_side) = match self.direction {
            LutDirection::AToB => (self.inputs, self.outputs),
            LutDirection::BToA => (self.outputs, self.inputs),
        };
        let check_curves = |name: &str, set: &Option<Vec<Curve>>, expected: usize| match set {
            Some(curves) if curves.len() != expected => Err(Error::inconsistent(format!(
                "{} curves: {} for {} channels",
                name,
                curves.len(),
                expected
            ))),
            _ => Ok(()),
        };
        check_curves("A", &self.a_curves, clut_side)?;
        check_curves("M", &self.m_curves, matrix_side)?;
        check_curves("B", &self.b_curves, matrix_side)?;

        if self.matrix.is_some() && matrix_side != 3 {
            return Err(Error::inconsistent(format!(
                "matrix element with {} channels",
                matrix_side
            )));
        }
        match &self.clut {
            Some(clut) if clut.inputs() != clut_side || clut.outputs() != matrix_side => {
                Err(Error::inconsistent(format!(
                    "CLUT {}->{} in a {}->{} tag",
                    clut.inputs(),
                    clut.outputs(),
                    self.inputs,
                    self.outputs
                )))
            }
            None if self.inputs != self.outputs => Err(Error::inconsistent(format!(
                "{}->{} tag without a CLUT",
                self.inputs, self.outputs
            ))),
            _ => Ok(()),
        }
    }
}

/// Decode an mAB or mBA body. Element offsets are bounds checked against
/// the tag length.
pub fn decode_modular(data: &[u8]) -> Result<(ModularTag, usize)> {
    let sig = read_signature(data, 0)?;
    let direction = match sig {
        Signature::LUT_A2B_TYPE => LutDirection::AToB,
        Signature::LUT_B2A_TYPE => LutDirection::BToA,
        other => return Err(Error::UnsupportedTagType(other)),
    };
    let _guard = tracing::trace_span!("decode_modular", %sig).entered();

    let inputs = read_u8(data, 8)? as usize;
    let outputs = read_u8(data, 9)? as usize;
    if inputs == 0 || outputs == 0 {
        return Err(Error::inconsistent(format!(
            "{} with {} inputs and {} outputs",
            sig, inputs, outputs
        )));
    }
    let (clut_side, matrix_side) = match direction {
        LutDirection::AToB => (inputs, outputs),
        LutDirection::BToA => (outputs, inputs),
    };

    let mut end = 32;
    let element = |field: usize| -> Result<Option<usize>> {
        let offset = read_u32(data, field)? as usize;
        if offset == 0 {
            return Ok(None);
        }
        if offset >= data.len() {
            return Err(Error::too_short(offset + 1, data.len()));
        }
        Ok(Some(offset))
    };
    let offsets = [
        element(OFFSET_B)?,
        element(OFFSET_MATRIX)?,
        element(OFFSET_M)?,
        element(OFFSET_CLUT)?,
        element(OFFSET_A)?,
    ];
    let [b_at, matrix_at, m_at, clut_at, a_at] = offsets;

    let mut curve_set = |at: Option<usize>, count: usize| -> Result<Option<Vec<Curve>>> {
        at.map(|offset| {
            let (curves, used) = decode_curve_set(data, offset, count)?;
            end = end.max(offset + used);
            Ok(curves)
        })
        .transpose()
    };
    let b_curves = curve_set(b_at, matrix_side)?;
    let m_curves = curve_set(m_at, matrix_side)?;
    let a_curves = curve_set(a_at, clut_side)?;

    let matrix = match matrix_at {
        Some(offset) => {
            let (matrix, used) = decode_matrix(&data[offset..])?;
            end = end.max(offset + used);
            Some(matrix)
        }
        None => None,
    };

    let clut = match clut_at {
        Some(offset) => {
            let (clut, used) = decode_clut(&data[offset..], clut_side, matrix_side)?;
            end = end.max(offset + used);
            Some(Arc::new(clut))
        }
        None => None,
    };

    let tag = ModularTag {
        direction,
        inputs,
        outputs,
        a_curves,
        clut,
        m_curves,
        matrix,
        b_curves,
    };
    tag.validate()?;
    tracing::trace!(
        inputs,
        outputs,
        has_clut = tag.clut.is_some(),
        has_matrix = tag.matrix.is_some(),
        "Decoded modular LUT"
    );
    Ok((tag, end))
}
