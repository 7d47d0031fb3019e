//! SIMD-Optimized Pixel Kernels
//!
//! Bulk kernels behind the pipeline buffer paths, using the `multiversion`
//! crate for automatic CPU dispatch.
//!
//! Supported instruction sets:
//! - x86-64: SSE4.1, AVX2
//! - ARM64: NEON
//!
//! The scalar fallback is always available.

mod batch;
mod gamma;
mod matrix;

pub use batch::{
    clamp_unit_batch, f64_to_rgb8_batch, f64_to_rgb16_batch, rgb8_to_f64_batch, rgb16_to_f64_batch,
};
pub use gamma::apply_srgb_encode_batch;
pub use matrix::matrix_multiply_vec3_inplace;

/// Get a description of the active SIMD features
pub fn active_features() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            "AVX2"
        } else if is_x86_feature_detected!("sse4.1") {
            "SSE4.1"
        } else {
            "scalar"
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        "NEON"
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        "scalar"
    }
}
