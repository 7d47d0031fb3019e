//! SIMD-optimized transfer function operations

use multiversion::multiversion;

/// Apply sRGB encode (linear → encoded) in place
///
/// Inverse sRGB transfer function:
/// - Linear segment: Y = X * 12.92 for X <= 0.0031308
/// - Power segment: Y = 1.055 * X^(1/2.4) - 0.055 for X > 0.0031308
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn apply_srgb_encode_batch(data: &mut [f64]) {
    const THRESHOLD: f64 = 0.0031308;
    const LINEAR_SCALE: f64 = 12.92;
    const POWER_SCALE: f64 = 1.055;
    const POWER_OFFSET: f64 = 0.055;
    const POWER_EXP: f64 = 1.0 / 2.4;

    for x in data.iter_mut() {
        *x = if *x <= THRESHOLD {
            *x * LINEAR_SCALE
        } else {
            POWER_SCALE * x.powf(POWER_EXP) - POWER_OFFSET
        };
    }
}
