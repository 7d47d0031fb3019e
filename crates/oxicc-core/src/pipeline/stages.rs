//! Pipeline Stages
//!
//! Every unit of work in a transform is a [`ChannelTransformer`]. The set
//! of stages is closed: tag types without a stage here cannot be turned
//! into a pipeline.

use std::sync::Arc;

use super::Pipeline;
use super::bpc::BlackPointCorrection;
use super::pcs::{PcsEncoding, PcsSpace};
use crate::color::{D50, Lab, Xyz, xyz_to_srgb};
use crate::icc::tags::{Clut, Curve, Interpolation, MatrixWithOffset};
use crate::math::{Matrix3x3, clamp_unit, srgb_gamma_encode};

/// Most channels any stage reads or writes (nCLR tops out at 15)
pub const MAX_CHANNELS: usize = 16;

/// One pipeline stage
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelTransformer {
    /// One curve per channel, forward
    Curves(Vec<Curve>),
    /// One curve per channel, inverted
    InverseCurves(Vec<Curve>),
    /// Pure 3x3 map; adjacent ones fuse
    Matrix(Matrix3x3),
    MatrixWithOffset(MatrixWithOffset),
    Clut {
        clut: Arc<Clut>,
        interpolation: Interpolation,
    },
    /// Gray TRC into the PCS
    GrayToPcs { curve: Curve, pcs: PcsSpace },
    /// PCS through the inverted gray TRC
    PcsToGray { curve: Curve, pcs: PcsSpace },
    /// Lab to XYZ, both relative to D50
    LabToXyz,
    XyzToLab,
    /// Normalised LUT output to PCS units
    PcsDecode(PcsEncoding),
    /// PCS units to normalised LUT input
    PcsEncode(PcsEncoding),
    BlackPointCorrection(BlackPointCorrection),
    /// Linear sRGB to companded sRGB
    SrgbCompanding { clamp: bool },
    /// D50 XYZ to companded sRGB, reducing chroma to fit the gamut
    GamutMappedSrgb,
    /// Clamp every channel to [0, 1]
    Clamp { channels: usize },
    /// Nested pipeline
    Pipeline(Pipeline),
}

impl ChannelTransformer {
    /// `self` followed by `other` is the identity
    pub(crate) fn cancels(&self, other: &ChannelTransformer) -> bool {
        matches!(
            (self, other),
            (ChannelTransformer::LabToXyz, ChannelTransformer::XyzToLab)
                | (ChannelTransformer::XyzToLab, ChannelTransformer::LabToXyz)
        )
    }

    pub fn curves(curves: Vec<Curve>) -> Self {
        ChannelTransformer::Curves(curves)
    }

    /// Pure matrix when the offset is zero, so it can fuse
    pub fn from_matrix_with_offset(m: MatrixWithOffset) -> Self {
        if m.has_offset() {
            ChannelTransformer::MatrixWithOffset(m)
        } else {
            ChannelTransformer::Matrix(m.matrix)
        }
    }

    /// (input channels, output channels)
    ///
    /// An empty nested pipeline reports (0, 0).
    pub fn signature(&self) -> (usize, usize) {
        match self {
            ChannelTransformer::Curves(c) | ChannelTransformer::InverseCurves(c) => (c.len(), c.len()),
            ChannelTransformer::Clut { clut, .. } => (clut.inputs(), clut.outputs()),
            ChannelTransformer::GrayToPcs { .. } => (1, 3),
            ChannelTransformer::PcsToGray { .. } => (3, 1),
            ChannelTransformer::Clamp { channels } => (*channels, *channels),
            ChannelTransformer::Pipeline(p) => p.signature().unwrap_or((0, 0)),
            ChannelTransformer::Matrix(_)
            | ChannelTransformer::MatrixWithOffset(_)
            | ChannelTransformer::LabToXyz
            | ChannelTransformer::XyzToLab
            | ChannelTransformer::PcsDecode(_)
            | ChannelTransformer::PcsEncode(_)
            | ChannelTransformer::BlackPointCorrection(_)
            | ChannelTransformer::SrgbCompanding { .. }
            | ChannelTransformer::GamutMappedSrgb => (3, 3),
        }
    }

    /// Scratch channels needed to run this stage
    pub fn workspace_size(&self) -> usize {
        match self {
            ChannelTransformer::Pipeline(p) => p.workspace_size(),
            other => {
                let (i, o) = other.signature();
                i.max(o)
            }
        }
    }

    /// Stages that leave every value unchanged
    pub fn is_identity(&self) -> bool {
        match self {
            ChannelTransformer::Curves(c) | ChannelTransformer::InverseCurves(c) => {
                c.iter().all(Curve::is_identity)
            }
            ChannelTransformer::Matrix(m) => m.is_identity(1e-12),
            ChannelTransformer::MatrixWithOffset(m) => m.matrix.is_identity(1e-12) && !m.has_offset(),
            ChannelTransformer::BlackPointCorrection(bpc) => bpc.is_identity(),
            ChannelTransformer::Pipeline(p) => p.is_empty(),
            _ => false,
        }
    }

    /// Apply to a 3-channel value
    ///
    /// Stages with other channel counts read their leading inputs and
    /// leave unused outputs at zero.
    pub fn transform(&self, v: [f64; 3]) -> [f64; 3] {
        match self {
            ChannelTransformer::Curves(c) if c.len() == 3 => {
                [c[0].eval(v[0]), c[1].eval(v[1]), c[2].eval(v[2])]
            }
            ChannelTransformer::InverseCurves(c) if c.len() == 3 => [
                c[0].eval_inverse(v[0]),
                c[1].eval_inverse(v[1]),
                c[2].eval_inverse(v[2]),
            ],
            ChannelTransformer::Matrix(m) => m.multiply_vec(v),
            ChannelTransformer::MatrixWithOffset(m) => m.apply(v),
            ChannelTransformer::LabToXyz => Lab::from_array(v).to_xyz().to_array(),
            ChannelTransformer::XyzToLab => Lab::from_xyz(Xyz::from_array(v)).to_array(),
            ChannelTransformer::PcsDecode(enc) => enc.decode(v),
            ChannelTransformer::PcsEncode(enc) => enc.encode(v),
            ChannelTransformer::BlackPointCorrection(bpc) => bpc.apply(v),
            ChannelTransformer::SrgbCompanding { clamp } => v.map(|c| {
                let c = if *clamp { clamp_unit(c) } else { c };
                srgb_gamma_encode(c)
            }),
            ChannelTransformer::GamutMappedSrgb => xyz_to_srgb(Xyz::from_array(v)),
            ChannelTransformer::Pipeline(p) => p.transform(v),
            _ => {
                let mut out = [0.0; MAX_CHANNELS];
                let mut input = [0.0; MAX_CHANNELS];
                input[..3].copy_from_slice(&v);
                self.transform_general(&input, &mut out);
                [out[0], out[1], out[2]]
            }
        }
    }

    /// Apply to one pixel of any channel count
    ///
    /// `input` holds at least `signature().0` values and `output` at least
    /// `signature().1`.
    pub fn transform_general(&self, input: &[f64], output: &mut [f64]) {
        let (inputs, outputs) = self.signature();
        match self {
            ChannelTransformer::Curves(c) => {
                for ((o, x), curve) in output.iter_mut().zip(input).zip(c) {
                    *o = curve.eval(*x);
                }
            }
            ChannelTransformer::InverseCurves(c) => {
                for ((o, x), curve) in output.iter_mut().zip(input).zip(c) {
                    *o = curve.eval_inverse(*x);
                }
            }
            ChannelTransformer::Clut {
                clut,
                interpolation,
            } => clut.eval(&input[..inputs], &mut output[..outputs], *interpolation),
            ChannelTransformer::GrayToPcs { curve, pcs } => {
                let y = curve.eval(input[0]);
                let pcs = match pcs {
                    PcsSpace::Xyz => D50.scale(y).to_array(),
                    PcsSpace::Lab => [y * 100.0, 0.0, 0.0],
                };
                output[..3].copy_from_slice(&pcs);
            }
            ChannelTransformer::PcsToGray { curve, pcs } => {
                let y = match pcs {
                    PcsSpace::Xyz => input[1],
                    PcsSpace::Lab => input[0] / 100.0,
                };
                output[0] = curve.eval_inverse(y);
            }
            ChannelTransformer::Clamp { channels } => {
                for (o, x) in output[..*channels].iter_mut().zip(input) {
                    *o = clamp_unit(*x);
                }
            }
            ChannelTransformer::Pipeline(p) => p.transform_general(input, output),
            _ => {
                let v = self.transform([input[0], input[1], input[2]]);
                output[..3].copy_from_slice(&v);
            }
        }
    }
}
