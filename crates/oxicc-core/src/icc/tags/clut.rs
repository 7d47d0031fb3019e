//! Color lookup tables
//!
//! Shared by the legacy mft1/mft2 tags and the modular mAB/mBA tags. The
//! same validation applies on both paths: 1 to 4 inputs, at least 2 grid
//! points per dimension, at least one output, and a sample count matching
//! the grid.

use crate::error::{Error, Result};
use crate::icc::types::{ensure_len, read_u8, slice_at};
use crate::math::interpolation::{MAX_INPUT_DIMS, nlinear_interp, tetrahedral_interp};

/// Interpolation used for 3-input tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    #[default]
    Tetrahedral,
    NLinear,
}

/// N-dimensional sample grid, samples normalised to [0, 1]
#[derive(Debug, Clone, PartialEq)]
pub struct Clut {
    grid: Vec<usize>,
    outputs: usize,
    samples: Vec<f64>,
}

impl Clut {
    pub fn new(grid: Vec<usize>, outputs: usize, samples: Vec<f64>) -> Result<Self> {
        let expected = validate_shape(&grid, outputs)?;
        if samples.len() != expected {
            return Err(Error::inconsistent(format!(
                "CLUT holds {} samples, grid needs {}",
                samples.len(),
                expected
            )));
        }
        Ok(Self {
            grid,
            outputs,
            samples,
        })
    }

    pub fn inputs(&self) -> usize {
        self.grid.len()
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn grid(&self) -> &[usize] {
        &self.grid
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Interpolate `input` (one value per input channel) into `out`
    pub fn eval(&self, input: &[f64], out: &mut [f64], method: Interpolation) {
        match (self.grid.as_slice(), method) {
            ([g0, g1, g2], Interpolation::Tetrahedral) => tetrahedral_interp(
                [*g0, *g1, *g2],
                self.outputs,
                &self.samples,
                [input[0], input[1], input[2]],
                out,
            ),
            _ => nlinear_interp(&self.grid, self.outputs, &self.samples, input, out),
        }
    }
}

/// Check dimensions and return ∏grid × outputs
pub(crate) fn validate_shape(grid: &[usize], outputs: usize) -> Result<usize> {
    if grid.is_empty() || grid.len() > MAX_INPUT_DIMS {
        return Err(Error::inconsistent(format!(
            "CLUT with {} input channels",
            grid.len()
        )));
    }
    if let Some(points) = grid.iter().find(|g| **g < 2) {
        return Err(Error::inconsistent(format!("CLUT grid dimension of {}", points)));
    }
    if outputs == 0 {
        return Err(Error::inconsistent("CLUT with no output channels"));
    }
    grid.iter()
        .try_fold(outputs, |acc, g| acc.checked_mul(*g))
        .ok_or_else(|| Error::inconsistent("CLUT size overflows"))
}

/// Read `count` big-endian samples of `precision` bytes each, normalised
pub(crate) fn read_samples(data: &[u8], offset: usize, count: usize, precision: usize) -> Result<Vec<f64>> {
    let len = count
        .checked_mul(precision)
        .ok_or_else(|| Error::too_short(usize::MAX, data.len()))?;
    let bytes = slice_at(data, offset, len)?;
    Ok(match precision {
        1 => bytes.iter().map(|b| *b as f64 / 255.0).collect(),
        _ => bytes
            .chunks_exact(2)
            .map(|b| u16::from_be_bytes([b[0], b[1]]) as f64 / 65535.0)
            .collect(),
    })
}

/// Decode the CLUT structure of a modular tag: 16 grid-point bytes, a
/// precision byte (1 or 2), 3 padding bytes, then the samples.
pub fn decode_clut(data: &[u8], inputs: usize, outputs: usize) -> Result<(Clut, usize)> {
    ensure_len(data, 20)?;
    let grid = (0..inputs.min(16))
        .map(|i| read_u8(data, i).map(usize::from))
        .collect::<Result<Vec<_>>>()?;

    let precision = read_u8(data, 16)? as usize;
    if precision != 1 && precision != 2 {
        return Err(Error::inconsistent(format!("CLUT precision {}", precision)));
    }

    if grid.len() != inputs {
        return Err(Error::inconsistent(format!("CLUT with {} input channels", inputs)));
    }
    let count = validate_shape(&grid, outputs)?;
    let samples = read_samples(data, 20, count, precision)?;
    let clut = Clut::new(grid, outputs, samples)?;
    Ok((clut, 20 + count * precision))
}
