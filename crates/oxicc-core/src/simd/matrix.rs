//! SIMD-optimized matrix operations
//!
//! Fused colorant and adaptation matrices run over whole pixel batches.

use multiversion::multiversion;

/// Multiply a 3x3 matrix by a batch of 3-element vectors, in place
///
/// The matrix is stored in row-major order.
#[multiversion(targets("x86_64+avx2", "x86_64+sse4.1", "aarch64+neon",))]
pub fn matrix_multiply_vec3_inplace(matrix: &[[f64; 3]; 3], pixels: &mut [[f64; 3]]) {
    // Extract matrix elements for better register allocation
    let [[m00, m01, m02], [m10, m11, m12], [m20, m21, m22]] = *matrix;

    for px in pixels.iter_mut() {
        let [r, g, b] = *px;
        px[0] = m00 * r + m01 * g + m02 * b;
        px[1] = m10 * r + m11 * g + m12 * b;
        px[2] = m20 * r + m21 * g + m22 * b;
    }
}
