//! Transfer functions
//!
//! - sRGB companding (IEC 61966-2-1)
//! - ICC parametric curve types 0-4, forward and analytic inverse

/// sRGB decode (encoded → linear)
#[inline]
pub fn srgb_gamma_decode(encoded: f64) -> f64 {
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB encode (linear → encoded)
#[inline]
pub fn srgb_gamma_encode(linear: f64) -> f64 {
    if linear <= 0.0031308 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    }
}

/// ICC Parametric Curve Type, ICC.1:2022 Section 10.18
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParametricCurveType {
    /// Type 0: Y = X^g
    Gamma,
    /// Type 1: Y = (aX + b)^g  if X >= -b/a, else 0
    CIE122,
    /// Type 2: Y = (aX + b)^g + c  if X >= -b/a, else c
    IEC61966_3,
    /// Type 3: Y = (aX + b)^g  if X >= d, else cX
    IEC61966_2_1,
    /// Type 4: Y = (aX + b)^g + e  if X >= d, else cX + f
    Full,
}

impl ParametricCurveType {
    pub fn from_icc(function_type: u16) -> Option<Self> {
        match function_type {
            0 => Some(Self::Gamma),
            1 => Some(Self::CIE122),
            2 => Some(Self::IEC61966_3),
            3 => Some(Self::IEC61966_2_1),
            4 => Some(Self::Full),
            _ => None,
        }
    }

    /// Number of s15Fixed16 parameters stored in the tag
    pub fn param_count(&self) -> usize {
        match self {
            Self::Gamma => 1,
            Self::CIE122 => 3,
            Self::IEC61966_3 => 4,
            Self::IEC61966_2_1 => 5,
            Self::Full => 7,
        }
    }
}

/// ICC parametric curve; unused parameters keep their neutral values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCurve {
    pub curve_type: ParametricCurveType,
    pub g: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl ParametricCurve {
    pub fn gamma(g: f64) -> Self {
        Self {
            curve_type: ParametricCurveType::Gamma,
            g,
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 0.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// The sRGB decoding curve as a type 3 parametric
    pub fn srgb() -> Self {
        Self {
            curve_type: ParametricCurveType::IEC61966_2_1,
            g: 2.4,
            a: 1.0 / 1.055,
            b: 0.055 / 1.055,
            c: 1.0 / 12.92,
            d: 0.04045,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Assign `params` (g first) in ICC order. Returns None when too few.
    pub fn from_params(curve_type: ParametricCurveType, params: &[f64]) -> Option<Self> {
        if params.len() < curve_type.param_count() {
            return None;
        }
        let mut curve = Self::gamma(params[0]);
        curve.curve_type = curve_type;

        let slots: [&mut f64; 6] = [
            &mut curve.a,
            &mut curve.b,
            &mut curve.c,
            &mut curve.d,
            &mut curve.e,
            &mut curve.f,
        ];
        for (slot, value) in slots.into_iter().zip(&params[1..curve_type.param_count()]) {
            *slot = *value;
        }
        Some(curve)
    }

    /// Forward evaluation, input clamped to [0, 1]
    pub fn eval(&self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        let power = |x: f64| (self.a * x + self.b).max(0.0).powf(self.g);

        match self.curve_type {
            ParametricCurveType::Gamma => x.powf(self.g),
            ParametricCurveType::CIE122 => {
                if x >= self.zero_crossing() {
                    power(x)
                } else {
                    0.0
                }
            }
            ParametricCurveType::IEC61966_3 => {
                if x >= self.zero_crossing() {
                    power(x) + self.c
                } else {
                    self.c
                }
            }
            ParametricCurveType::IEC61966_2_1 => {
                if x >= self.d {
                    power(x)
                } else {
                    self.c * x
                }
            }
            ParametricCurveType::Full => {
                if x >= self.d {
                    power(x) + self.e
                } else {
                    self.c * x + self.f
                }
            }
        }
    }

    /// Analytic inverse. Falls back to bisection when a coefficient needed
    /// by the closed form is zero.
    pub fn eval_inverse(&self, y: f64) -> f64 {
        if self.g.abs() < 1e-12 || self.a.abs() < 1e-12 {
            return bisect_inverse(|x| self.eval(x), y);
        }
        let unpower = |v: f64| ((v.max(0.0).powf(1.0 / self.g) - self.b) / self.a).clamp(0.0, 1.0);

        match self.curve_type {
            ParametricCurveType::Gamma => y.max(0.0).powf(1.0 / self.g).clamp(0.0, 1.0),
            ParametricCurveType::CIE122 => {
                if y <= 0.0 {
                    self.zero_crossing().clamp(0.0, 1.0)
                } else {
                    unpower(y)
                }
            }
            ParametricCurveType::IEC61966_3 => {
                if y <= self.c {
                    self.zero_crossing().clamp(0.0, 1.0)
                } else {
                    unpower(y - self.c)
                }
            }
            ParametricCurveType::IEC61966_2_1 => {
                let threshold = (self.a * self.d + self.b).max(0.0).powf(self.g);
                if y >= threshold || self.c.abs() < 1e-12 {
                    unpower(y)
                } else {
                    (y / self.c).clamp(0.0, 1.0)
                }
            }
            ParametricCurveType::Full => {
                let threshold = (self.a * self.d + self.b).max(0.0).powf(self.g) + self.e;
                if y >= threshold || self.c.abs() < 1e-12 {
                    unpower(y - self.e)
                } else {
                    ((y - self.f) / self.c).clamp(0.0, 1.0)
                }
            }
        }
    }

    /// X where aX + b = 0
    fn zero_crossing(&self) -> f64 {
        if self.a.abs() > 1e-12 { -self.b / self.a } else { 0.0 }
    }
}

/// Invert a monotonic non-decreasing function on [0, 1] by bisection
pub fn bisect_inverse(f: impl Fn(f64) -> f64, y: f64) -> f64 {
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    if y <= f(lo) {
        return lo;
    }
    if y >= f(hi) {
        return hi;
    }
    for _ in 0..60 {
        let mid = 0.5 * (lo + hi);
        if f(mid) < y {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
