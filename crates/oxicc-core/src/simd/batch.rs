//! Batch conversion between quantised and normalised pixels

use multiversion::multiversion;

use crate::math::clamp_unit;

/// Convert u8 RGB to normalized f64 RGB
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rgb8_to_f64_batch(src: &[u8], dst: &mut [[f64; 3]]) {
    for (src_chunk, out) in src.chunks_exact(3).zip(dst.iter_mut()) {
        out[0] = src_chunk[0] as f64 / 255.0;
        out[1] = src_chunk[1] as f64 / 255.0;
        out[2] = src_chunk[2] as f64 / 255.0;
    }
}

/// Convert normalized f64 RGB to u8 RGB, rounding and clamping
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn f64_to_rgb8_batch(src: &[[f64; 3]], dst: &mut [u8]) {
    for (inp, dst_chunk) in src.iter().zip(dst.chunks_exact_mut(3)) {
        dst_chunk[0] = (clamp_unit(inp[0]) * 255.0 + 0.5) as u8;
        dst_chunk[1] = (clamp_unit(inp[1]) * 255.0 + 0.5) as u8;
        dst_chunk[2] = (clamp_unit(inp[2]) * 255.0 + 0.5) as u8;
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn rgb16_to_f64_batch(src: &[u16], dst: &mut [[f64; 3]]) {
    for (src_chunk, out) in src.chunks_exact(3).zip(dst.iter_mut()) {
        out[0] = src_chunk[0] as f64 / 65535.0;
        out[1] = src_chunk[1] as f64 / 65535.0;
        out[2] = src_chunk[2] as f64 / 65535.0;
    }
}

#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn f64_to_rgb16_batch(src: &[[f64; 3]], dst: &mut [u16]) {
    for (inp, dst_chunk) in src.iter().zip(dst.chunks_exact_mut(3)) {
        dst_chunk[0] = (clamp_unit(inp[0]) * 65535.0 + 0.5) as u16;
        dst_chunk[1] = (clamp_unit(inp[1]) * 65535.0 + 0.5) as u16;
        dst_chunk[2] = (clamp_unit(inp[2]) * 65535.0 + 0.5) as u16;
    }
}

/// Clamp every value to [0, 1]; NaN becomes 0
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn clamp_unit_batch(data: &mut [f64]) {
    for v in data.iter_mut() {
        *v = clamp_unit(*v);
    }
}
