//! Accuracy measurement using perceptual color difference metrics
//!
//! CIEDE2000 is the primary metric. Both buffers are read as sRGB and
//! projected to Lab (D50) before comparison.

use oxicc_core::{Lab, delta_e_2000, srgb_to_lab};

/// Statistics from a deltaE comparison
#[derive(Debug, Clone)]
pub struct DeltaEStats {
    pub mean: f64,
    pub max: f64,
    /// 95th percentile deltaE
    pub p95: f64,
    pub count: usize,
}

impl DeltaEStats {
    /// Summarise a set of per-sample differences
    pub fn from_deltas(mut deltas: Vec<f64>) -> Self {
        deltas.sort_by(f64::total_cmp);
        let count = deltas.len();
        if count == 0 {
            return Self {
                mean: 0.0,
                max: 0.0,
                p95: 0.0,
                count,
            };
        }
        let mean = deltas.iter().sum::<f64>() / count as f64;
        let p95_idx = ((count as f64 * 0.95) as usize).min(count - 1);
        Self {
            mean,
            max: deltas[count - 1],
            p95: deltas[p95_idx],
            count,
        }
    }

    /// All differences imperceptible (deltaE < 1.0)
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    /// Barely perceptible (deltaE < 2.0)
    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }

    pub fn is_acceptable(&self) -> bool {
        self.max < 3.5
    }
}

fn rgb8_lab(px: &[u8]) -> Lab {
    srgb_to_lab([px[0], px[1], px[2]].map(|v| v as f64 / 255.0))
}

/// Compare two 8-bit sRGB buffers
pub fn compare_rgb_buffers(reference: &[u8], result: &[u8]) -> DeltaEStats {
    assert_eq!(reference.len(), result.len());
    assert_eq!(reference.len() % 3, 0);

    let deltas = reference
        .chunks_exact(3)
        .zip(result.chunks_exact(3))
        .map(|(r, o)| delta_e_2000(rgb8_lab(r), rgb8_lab(o)))
        .collect();
    DeltaEStats::from_deltas(deltas)
}

/// Compare two sets of companded sRGB float pixels
pub fn compare_rgb_f64(reference: &[[f64; 3]], result: &[[f64; 3]]) -> DeltaEStats {
    assert_eq!(reference.len(), result.len());
    let deltas = reference
        .iter()
        .zip(result)
        .map(|(r, o)| delta_e_2000(srgb_to_lab(*r), srgb_to_lab(*o)))
        .collect();
    DeltaEStats::from_deltas(deltas)
}

/// Largest per-channel absolute difference
pub fn max_abs_diff(reference: &[f64], result: &[f64]) -> f64 {
    reference
        .iter()
        .zip(result)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}
