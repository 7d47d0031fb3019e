//! Color Transform Pipeline
//!
//! A pipeline is an ordered list of [`ChannelTransformer`] stages run left
//! to right. Appending or inserting flattens nested pipelines into their
//! leaf stages, drops identity stages, and fuses neighbouring pure 3x3
//! matrices into one.
//!
//! # Pipeline Architecture
//!
//! A device to sRGB transform consists of:
//! 1. Input stage: device space → PCS (Profile Connection Space)
//! 2. Optional black point compensation in XYZ
//! 3. Output stage: PCS → D65 linear sRGB → companded sRGB
//!
//! For matrix-shaper profiles:
//! - Input: TRC decode → matrix → PCS
//! - Output: PCS → inverse matrix → TRC encode
//!
//! For LUT profiles:
//! - Use A2B/B2A lookup tables directly

mod bpc;
mod options;
mod pcs;
mod stages;

pub use bpc::BlackPointCorrection;
pub use options::TransformOptions;
pub use pcs::{PcsEncoding, PcsSpace};
pub use stages::{ChannelTransformer, MAX_CHANNELS};

use crate::error::{Error, Result};
use crate::simd;

/// Pixels converted per chunk by the quantised buffer paths
const CHUNK_PIXELS: usize = 1024;

/// An ordered, flattened list of stages
///
/// Holds no mutable state; one pipeline can serve many threads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    stages: Vec<ChannelTransformer>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stages(&self) -> &[ChannelTransformer] {
        &self.stages
    }

    /// Append a stage, or every leaf of a pipeline, at the end
    pub fn append(&mut self, stage: ChannelTransformer) {
        let at = self.stages.len();
        self.insert(at, stage);
    }

    /// Insert a stage, or every leaf of a pipeline, before `position`
    ///
    /// `position` past the end appends.
    pub fn insert(&mut self, position: usize, stage: ChannelTransformer) {
        let mut pos = position.min(self.stages.len());
        for leaf in flatten(stage) {
            pos = self.insert_leaf(pos, leaf);
        }
    }

    /// Returns the position just after the inserted (or fused) leaf
    fn insert_leaf(&mut self, pos: usize, leaf: ChannelTransformer) -> usize {
        if leaf.is_identity() {
            return pos;
        }
        if pos > 0 && self.stages[pos - 1].cancels(&leaf) {
            tracing::trace!(index = pos - 1, "Stage cancels its inverse, both removed");
            self.stages.remove(pos - 1);
            return self.fuse_boundary(pos - 1);
        }
        if self.stages.get(pos).is_some_and(|next| leaf.cancels(next)) {
            tracing::trace!(index = pos, "Stage cancels its inverse, both removed");
            self.stages.remove(pos);
            return self.fuse_boundary(pos);
        }
        if let ChannelTransformer::Matrix(m) = leaf {
            // Fuse with the stage before the boundary
            if let Some(ChannelTransformer::Matrix(prev)) = pos.checked_sub(1).and_then(|i| self.stages.get(i)) {
                let fused = m.multiply(prev);
                return self.replace_fused(pos - 1, fused);
            }
            // Or with the stage after it
            if let Some(ChannelTransformer::Matrix(next)) = self.stages.get(pos) {
                let fused = next.multiply(&m);
                return self.replace_fused(pos, fused);
            }
        }
        self.stages.insert(pos, leaf);
        pos + 1
    }

    /// Elision can leave two matrices side by side at `pos`; fuse them
    fn fuse_boundary(&mut self, pos: usize) -> usize {
        if pos == 0 {
            return pos;
        }
        if let (ChannelTransformer::Matrix(prev), Some(ChannelTransformer::Matrix(next))) =
            (&self.stages[pos - 1], self.stages.get(pos))
        {
            let fused = next.multiply(prev);
            self.stages.remove(pos);
            return self.replace_fused(pos - 1, fused);
        }
        pos
    }

    fn replace_fused(&mut self, index: usize, fused: crate::math::Matrix3x3) -> usize {
        if fused.is_identity(1e-12) {
            tracing::trace!(index, "Fused matrices cancel, stage removed");
            self.stages.remove(index);
            index
        } else {
            self.stages[index] = ChannelTransformer::Matrix(fused);
            index + 1
        }
    }

    /// (first stage inputs, last stage outputs); None when empty
    pub fn signature(&self) -> Option<(usize, usize)> {
        let first = self.stages.first()?;
        let last = self.stages.last()?;
        Some((first.signature().0, last.signature().1))
    }

    /// Channel counts chain through every stage boundary and the ends
    /// match (inputs, outputs). The empty pipeline suits (n, n).
    pub fn suitable_for(&self, inputs: usize, outputs: usize) -> bool {
        let Some((i, o)) = self.signature() else {
            return inputs == outputs;
        };
        i == inputs
            && o == outputs
            && self
                .stages
                .windows(2)
                .all(|w| w[0].signature().1 == w[1].signature().0)
    }

    pub fn workspace_size(&self) -> usize {
        self.stages
            .iter()
            .map(ChannelTransformer::workspace_size)
            .max()
            .unwrap_or(0)
    }

    /// Run a 3-channel value through every stage
    pub fn transform(&self, v: [f64; 3]) -> [f64; 3] {
        if self.stages.iter().all(|s| s.signature() == (3, 3)) {
            return self.stages.iter().fold(v, |acc, s| s.transform(acc));
        }
        let mut input = [0.0; MAX_CHANNELS];
        input[..3].copy_from_slice(&v);
        let mut out = [0.0; MAX_CHANNELS];
        self.transform_general(&input, &mut out);
        [out[0], out[1], out[2]]
    }

    /// Run one pixel of any channel count through every stage
    pub fn transform_general(&self, input: &[f64], output: &mut [f64]) {
        let Some((inputs, outputs)) = self.signature() else {
            let n = input.len().min(output.len());
            output[..n].copy_from_slice(&input[..n]);
            return;
        };
        let mut a = [0.0f64; MAX_CHANNELS];
        let mut b = [0.0f64; MAX_CHANNELS];
        let n = inputs.min(MAX_CHANNELS).min(input.len());
        a[..n].copy_from_slice(&input[..n]);
        for stage in &self.stages {
            stage.transform_general(&a, &mut b);
            std::mem::swap(&mut a, &mut b);
        }
        let n = outputs.min(MAX_CHANNELS).min(output.len());
        output[..n].copy_from_slice(&a[..n]);
    }

    /// In-place transform of interleaved 3-channel f64 pixels
    pub fn apply_rgb_buffer(&self, buffer: &mut [f64]) -> Result<()> {
        if !self.suitable_for(3, 3) {
            return Err(Error::inconsistent(format!(
                "{:?} pipeline applied to RGB pixels",
                self.signature()
            )));
        }
        let pixels: &mut [[f64; 3]] = bytemuck::try_cast_slice_mut(buffer).map_err(|_| {
            Error::inconsistent("buffer length is not a multiple of 3")
        })?;

        for stage in &self.stages {
            match stage {
                ChannelTransformer::Matrix(m) => simd::matrix_multiply_vec3_inplace(&m.m, pixels),
                ChannelTransformer::SrgbCompanding { clamp } => {
                    let flat: &mut [f64] = bytemuck::cast_slice_mut(pixels);
                    if *clamp {
                        simd::clamp_unit_batch(flat);
                    }
                    simd::apply_srgb_encode_batch(flat);
                }
                ChannelTransformer::Clamp { .. } => {
                    simd::clamp_unit_batch(bytemuck::cast_slice_mut(pixels));
                }
                other => {
                    for px in pixels.iter_mut() {
                        *px = other.transform(*px);
                    }
                }
            }
        }
        Ok(())
    }

    /// Transform 8-bit RGB pixels, `src` and `dst` interleaved
    pub fn transform_rgb8(&self, src: &[u8], dst: &mut [u8]) -> Result<()> {
        check_rgb_lengths(src.len(), dst.len())?;
        let mut scratch = vec![[0.0f64; 3]; CHUNK_PIXELS.min(src.len() / 3)];
        for (s, d) in src.chunks(CHUNK_PIXELS * 3).zip(dst.chunks_mut(CHUNK_PIXELS * 3)) {
            let px = &mut scratch[..s.len() / 3];
            simd::rgb8_to_f64_batch(s, px);
            self.apply_rgb_buffer(bytemuck::cast_slice_mut(px))?;
            simd::f64_to_rgb8_batch(px, d);
        }
        Ok(())
    }

    /// Transform 16-bit RGB pixels, `src` and `dst` interleaved
    pub fn transform_rgb16(&self, src: &[u16], dst: &mut [u16]) -> Result<()> {
        check_rgb_lengths(src.len(), dst.len())?;
        let mut scratch = vec![[0.0f64; 3]; CHUNK_PIXELS.min(src.len() / 3)];
        for (s, d) in src.chunks(CHUNK_PIXELS * 3).zip(dst.chunks_mut(CHUNK_PIXELS * 3)) {
            let px = &mut scratch[..s.len() / 3];
            simd::rgb16_to_f64_batch(s, px);
            self.apply_rgb_buffer(bytemuck::cast_slice_mut(px))?;
            simd::f64_to_rgb16_batch(px, d);
        }
        Ok(())
    }

    /// Transform interleaved pixels with the pipeline's own channel counts
    ///
    /// `src` holds whole pixels of `inputs` channels; `dst` must fit the
    /// same number of pixels with `outputs` channels.
    pub fn transform_buffer(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        let (inputs, outputs) = self
            .signature()
            .ok_or_else(|| Error::inconsistent("empty pipeline has no channel count"))?;
        if !self.suitable_for(inputs, outputs) {
            return Err(Error::inconsistent("pipeline stage channel counts do not chain"));
        }
        if src.len() % inputs != 0 {
            return Err(Error::inconsistent(format!(
                "source length {} is not a multiple of {} channels",
                src.len(),
                inputs
            )));
        }
        let pixels = src.len() / inputs;
        if dst.len() < pixels * outputs {
            return Err(Error::too_short(pixels * outputs, dst.len()));
        }
        for (s, d) in src.chunks_exact(inputs).zip(dst.chunks_exact_mut(outputs)) {
            self.transform_general(s, d);
        }
        Ok(())
    }
}

fn check_rgb_lengths(src: usize, dst: usize) -> Result<()> {
    if src % 3 != 0 {
        return Err(Error::inconsistent("buffer length is not a multiple of 3"));
    }
    if dst < src {
        return Err(Error::too_short(src, dst));
    }
    Ok(())
}

/// Leaf stages of a possibly nested pipeline, in order
fn flatten(stage: ChannelTransformer) -> Vec<ChannelTransformer> {
    match stage {
        ChannelTransformer::Pipeline(p) => p.stages.into_iter().flat_map(flatten).collect(),
        leaf => vec![leaf],
    }
}
