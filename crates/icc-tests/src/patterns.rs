//! Deterministic test inputs
//!
//! 8-bit RGB patterns for buffer parity, and seeded float samples for
//! pipelines of any channel count.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Neutral ramp 0-255
    Grayscale,
    /// RGB cube corners
    ColorCube,
    /// Hue ramp at full saturation
    HueRamp,
    /// Saturated colors near the gamut boundary
    GamutBoundary,
    Random(u64),
    Black,
    White,
}

impl TestPattern {
    pub const ALL: [TestPattern; 7] = [
        TestPattern::Grayscale,
        TestPattern::ColorCube,
        TestPattern::HueRamp,
        TestPattern::GamutBoundary,
        TestPattern::Random(42),
        TestPattern::Black,
        TestPattern::White,
    ];
}

const CUBE: [[u8; 3]; 8] = [
    [0, 0, 0],
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 255, 0],
    [255, 0, 255],
    [0, 255, 255],
    [255, 255, 255],
];

const BOUNDARY: [[u8; 3]; 6] = [
    [255, 0, 0],
    [0, 255, 0],
    [0, 0, 255],
    [255, 128, 0],
    [128, 0, 255],
    [0, 128, 255],
];

/// Pattern as an interleaved RGB8 buffer of `pixels` pixels
pub fn generate_pattern(pattern: TestPattern, pixels: usize) -> Vec<u8> {
    let mut data = vec![0u8; pixels * 3];
    match pattern {
        TestPattern::Grayscale => {
            for (i, px) in data.chunks_exact_mut(3).enumerate() {
                px.fill((i * 255 / pixels.max(2).saturating_sub(1)).min(255) as u8);
            }
        }
        TestPattern::ColorCube => {
            for (i, px) in data.chunks_exact_mut(3).enumerate() {
                px.copy_from_slice(&CUBE[i % CUBE.len()]);
            }
        }
        TestPattern::HueRamp => {
            for (i, px) in data.chunks_exact_mut(3).enumerate() {
                let hue = i as f64 / pixels as f64 * 6.0;
                px.copy_from_slice(&hue_to_rgb8(hue));
            }
        }
        TestPattern::GamutBoundary => {
            for (i, px) in data.chunks_exact_mut(3).enumerate() {
                px.copy_from_slice(&BOUNDARY[i % BOUNDARY.len()]);
            }
        }
        TestPattern::Random(seed) => ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut data),
        TestPattern::Black => {}
        TestPattern::White => data.fill(255),
    }
    data
}

/// Fully saturated color for a hue in sextants, 0..6
fn hue_to_rgb8(h: f64) -> [u8; 3] {
    let x = 1.0 - ((h % 2.0) - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    [r, g, b].map(|v: f64| (v * 255.0).round() as u8)
}

/// `count` pixels of `channels` values in [0, 1]
pub fn random_unit_pixels(seed: u64, count: usize, channels: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count * channels).map(|_| rng.r#gen::<f64>()).collect()
}

/// Lab samples with L in 0..100 and a, b in -100..100
pub fn random_lab(seed: u64, count: usize) -> Vec<[f64; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            [
                rng.gen_range(0.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white() {
        assert!(generate_pattern(TestPattern::Black, 4).iter().all(|&v| v == 0));
        assert!(generate_pattern(TestPattern::White, 4).iter().all(|&v| v == 255));
    }

    #[test]
    fn test_grayscale_spans_range() {
        let data = generate_pattern(TestPattern::Grayscale, 256);
        assert_eq!(data[0], 0);
        assert_eq!(data[255 * 3], 255);
    }

    #[test]
    fn test_random_deterministic() {
        assert_eq!(
            generate_pattern(TestPattern::Random(7), 50),
            generate_pattern(TestPattern::Random(7), 50)
        );
        let a = random_unit_pixels(1, 10, 4);
        assert_eq!(a.len(), 40);
        assert_eq!(a, random_unit_pixels(1, 10, 4));
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));
    }
}
