//! Interpolation kernels for curve tables and CLUT grids
//!
//! Grids are stored row-major with the last input channel varying fastest,
//! each grid point holding `outputs` consecutive samples.

/// Most input dimensions a CLUT may have
pub const MAX_INPUT_DIMS: usize = 4;

/// Clamp to [0, 1]; NaN becomes 0
#[inline]
pub fn clamp_unit(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Split a normalised coordinate into (base index, fraction) on a grid of
/// `points` samples. The top edge uses index `points - 2` with weight 1 so
/// the upper neighbour is always in range.
#[inline]
pub fn grid_position(x: f64, points: usize) -> (usize, f64) {
    debug_assert!(points >= 2);
    let x = clamp_unit(x);
    let mut pos = x * (points - 1) as f64;
    // k / (n - 1) * (n - 1) can land one ulp below k
    let nearest = pos.round();
    if (pos - nearest).abs() < 1e-9 {
        pos = nearest;
    }
    let idx = pos as usize;
    if idx >= points - 1 {
        (points - 2, 1.0)
    } else {
        (idx, pos - idx as f64)
    }
}

/// Piecewise-linear lookup in a uniformly sampled 1D table
pub fn lut1d_interp(table: &[f64], x: f64) -> f64 {
    match table.len() {
        0 => x,
        1 => table[0],
        n => {
            let (idx, t) = grid_position(x, n);
            lerp(table[idx], table[idx + 1], t)
        }
    }
}

/// Element strides of each input dimension, descending radix
fn strides(grid: &[usize], outputs: usize) -> [usize; MAX_INPUT_DIMS] {
    let mut strides = [0usize; MAX_INPUT_DIMS];
    let mut stride = outputs;
    for d in (0..grid.len()).rev() {
        strides[d] = stride;
        stride *= grid[d];
    }
    strides
}

/// N-linear interpolation over up to four input dimensions
///
/// Accumulates all 2^N hypercube corners. `out` receives `outputs` values.
pub fn nlinear_interp(grid: &[usize], outputs: usize, table: &[f64], input: &[f64], out: &mut [f64]) {
    let dims = grid.len();
    debug_assert!(dims >= 1 && dims <= MAX_INPUT_DIMS);
    debug_assert!(input.len() >= dims && out.len() >= outputs);

    let strides = strides(grid, outputs);
    let mut base = 0usize;
    let mut frac = [0.0f64; MAX_INPUT_DIMS];
    for d in 0..dims {
        let (idx, t) = grid_position(input[d], grid[d]);
        base += idx * strides[d];
        frac[d] = t;
    }

    let out = &mut out[..outputs];
    out.fill(0.0);
    for corner in 0..(1usize << dims) {
        let mut weight = 1.0;
        let mut offset = base;
        for d in 0..dims {
            // Bit for dimension d, most significant first
            if corner & (1 << (dims - 1 - d)) != 0 {
                weight *= frac[d];
                offset += strides[d];
            } else {
                weight *= 1.0 - frac[d];
            }
        }
        if weight == 0.0 {
            continue;
        }
        for (o, v) in out.iter_mut().zip(&table[offset..offset + outputs]) {
            *o += weight * v;
        }
    }
}

/// Tetrahedral interpolation over a 3D grid
///
/// Each cube is split into 6 tetrahedra by the ordering of the fractions,
/// so only 4 corners are read per output.
pub fn tetrahedral_interp(grid: [usize; 3], outputs: usize, table: &[f64], input: [f64; 3], out: &mut [f64]) {
    let strides = strides(&grid, outputs);
    let (x0, rx) = grid_position(input[0], grid[0]);
    let (y0, ry) = grid_position(input[1], grid[1]);
    let (z0, rz) = grid_position(input[2], grid[2]);

    let base = x0 * strides[0] + y0 * strides[1] + z0 * strides[2];
    let (sx, sy, sz) = (strides[0], strides[1], strides[2]);

    // Corner offsets along the path 000 -> c1 -> c2 -> 111, with weights
    let (c1, c2, w) = if rx >= ry {
        if ry >= rz {
            (sx, sx + sy, [rx, ry, rz])
        } else if rx >= rz {
            (sx, sx + sz, [rx, rz, ry])
        } else {
            (sz, sx + sz, [rz, rx, ry])
        }
    } else if ry >= rz {
        if rx >= rz {
            (sy, sx + sy, [ry, rx, rz])
        } else {
            (sy, sy + sz, [ry, rz, rx])
        }
    } else {
        (sz, sy + sz, [rz, ry, rx])
    };
    let c3 = sx + sy + sz;

    // Barycentric weights of the four corners
    let b = [1.0 - w[0], w[0] - w[1], w[1] - w[2], w[2]];
    for (o, v) in out[..outputs].iter_mut().enumerate() {
        *v = b[0] * table[base + o]
            + b[1] * table[base + c1 + o]
            + b[2] * table[base + c2 + o]
            + b[3] * table[base + c3 + o];
    }
}
