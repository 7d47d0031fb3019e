//! Curve Tag Types
//!
//! - curv: identity, single gamma, or sampled table
//! - para: ICC parametric function types 0-4
//!
//! See ICC.1:2022 Sections 10.6 (curv) and 10.18 (para)

use crate::error::{Error, Result};
use crate::icc::types::{
    Signature, U8Fixed8, ensure_len, read_s15f16, read_signature, read_u16, read_u32,
};
use crate::math::gamma::{ParametricCurve, ParametricCurveType, bisect_inverse};
use crate::math::interpolation::lut1d_interp;

/// One-dimensional tone curve
#[derive(Debug, Clone, PartialEq)]
pub enum Curve {
    Identity,
    /// Y = X^g, from a single-entry curv
    Gamma(f64),
    /// Uniformly spaced samples normalised to [0, 1], linearly interpolated
    Sampled(Vec<f64>),
    Parametric(ParametricCurve),
}

impl Curve {
    /// Forward evaluation; input is clamped to [0, 1]
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Curve::Identity => x,
            Curve::Gamma(g) => x.clamp(0.0, 1.0).powf(*g),
            Curve::Sampled(table) => lut1d_interp(table, x),
            Curve::Parametric(p) => p.eval(x),
        }
    }

    /// Inverse evaluation for device-direction transforms
    pub fn eval_inverse(&self, y: f64) -> f64 {
        match self {
            Curve::Identity => y,
            Curve::Gamma(g) if g.abs() > 1e-12 => y.clamp(0.0, 1.0).powf(1.0 / g),
            Curve::Gamma(g) => bisect_inverse(|x| x.powf(*g), y),
            Curve::Sampled(table) => sampled_inverse(table, y),
            Curve::Parametric(p) => p.eval_inverse(y),
        }
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Curve::Identity => true,
            Curve::Gamma(g) => (*g - 1.0).abs() < 1e-6,
            Curve::Sampled(table) => {
                let last = (table.len().max(2) - 1) as f64;
                table
                    .iter()
                    .enumerate()
                    .all(|(i, v)| (v - i as f64 / last).abs() < 0.5 / 65535.0)
            }
            Curve::Parametric(p) => {
                p.curve_type == ParametricCurveType::Gamma && (p.g - 1.0).abs() < 1e-6
            }
        }
    }
}

/// Inverse of a piecewise-linear table, assumed monotonic in either direction
fn sampled_inverse(table: &[f64], y: f64) -> f64 {
    let n = table.len();
    if n < 2 {
        return y;
    }
    let last = (n - 1) as f64;
    let descending = table[0] > table[n - 1];
    let key = |v: f64| if descending { -v } else { v };
    let target = key(y);

    if target <= key(table[0]) {
        return 0.0;
    }
    if target >= key(table[n - 1]) {
        return 1.0;
    }

    // First index whose value reaches the target
    let hi = table.partition_point(|v| key(*v) < target);
    let lo = hi - 1;
    let (v0, v1) = (key(table[lo]), key(table[hi]));
    let t = if v1 > v0 { (target - v0) / (v1 - v0) } else { 0.0 };
    (lo as f64 + t) / last
}

/// Decode a `curv` or `para` tag body, returning the curve and the bytes it
/// occupies (not padded).
pub fn decode_curve(data: &[u8]) -> Result<(Curve, usize)> {
    match read_signature(data, 0)? {
        Signature::CURVE_TYPE => decode_curv(data),
        Signature::PARAMETRIC_TYPE => decode_para(data),
        other => Err(Error::UnsupportedTagType(other)),
    }
}

fn decode_curv(data: &[u8]) -> Result<(Curve, usize)> {
    let count = read_u32(data, 8)? as usize;
    match count {
        0 => Ok((Curve::Identity, 12)),
        1 => {
            let gamma = U8Fixed8(read_u16(data, 12)?).decode();
            Ok((Curve::Gamma(gamma), 14))
        }
        _ => {
            let needed = count
                .checked_mul(2)
                .and_then(|n| n.checked_add(12))
                .ok_or_else(|| Error::too_short(usize::MAX, data.len()))?;
            ensure_len(data, needed)?;
            let table = data[12..needed]
                .chunks_exact(2)
                .map(|b| u16::from_be_bytes([b[0], b[1]]) as f64 / 65535.0)
                .collect();
            Ok((Curve::Sampled(table), needed))
        }
    }
}

fn decode_para(data: &[u8]) -> Result<(Curve, usize)> {
    let function = read_u16(data, 8)?;
    let curve_type = ParametricCurveType::from_icc(function).ok_or_else(|| {
        Error::inconsistent(format!("unknown parametric function type {}", function))
    })?;

    let count = curve_type.param_count();
    let needed = 12 + count * 4;
    ensure_len(data, needed)?;
    let params = (0..count)
        .map(|i| read_s15f16(data, 12 + i * 4).map(|v| v.decode()))
        .collect::<Result<Vec<_>>>()?;

    if curve_type == ParametricCurveType::IEC61966_3 && params[1] == 0.0 {
        return Err(Error::DegenerateParameter(
            "parametric type 2 with a = 0".to_string(),
        ));
    }

    let curve = ParametricCurve::from_params(curve_type, &params)
        .ok_or_else(|| Error::inconsistent("parametric curve parameter count"))?;
    tracing::trace!(function, "Decoded parametric curve");
    Ok((Curve::Parametric(curve), needed))
}

/// Decode `count` curves stored back to back, each starting on a 4-byte
/// boundary. Returns the curves and the total aligned size.
pub fn decode_curve_set(data: &[u8], offset: usize, count: usize) -> Result<(Vec<Curve>, usize)> {
    let mut curves = Vec::with_capacity(count);
    let mut pos = offset;
    for _ in 0..count {
        let body = data
            .get(pos..)
            .ok_or_else(|| Error::too_short(pos, data.len()))?;
        let (curve, used) = decode_curve(body)?;
        curves.push(curve);
        pos += used.next_multiple_of(4);
    }
    Ok((curves, pos - offset))
}
