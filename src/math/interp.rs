//! Linear interpolation over strictly increasing axes.
//!
//! Everything in the fitting pipeline that samples a tabulated quantity goes
//! through these three primitives:
//!
//! - `bracket`: locate the bracketing index pair and in-segment weight for a
//!   query value, clamping to the boundary node outside the axis range
//! - `interp_clamped` / `resample_linear`: piecewise-linear lookup with the
//!   same clamping policy
//! - `interp_extrapolated`: piecewise-linear lookup that extends the end
//!   segments (used for the sparsely tabulated nebular emissivities)
//!
//! Clamping rather than extrapolating is a deliberate policy for the model
//! grids: population-synthesis models are meaningless outside the computed
//! node range, so the nearest boundary node is the least-wrong answer.

/// Bracketing indices and interpolation weight for `x` on a strictly
/// increasing axis.
///
/// Returns `(lo, hi, t)` such that the interpolated value is
/// `(1 - t) * y[lo] + t * y[hi]`. Outside the axis range, and exactly on a
/// node, `lo == hi` and `t == 0.0`, so the degenerate pair never divides by
/// the zero segment length.
///
/// # Panics
/// Panics if `axis` is empty. Callers validate axis length up front.
pub fn bracket(axis: &[f64], x: f64) -> (usize, usize, f64) {
    let n = axis.len();
    if x <= axis[0] {
        return (0, 0, 0.0);
    }
    if x >= axis[n - 1] {
        return (n - 1, n - 1, 0.0);
    }

    // First index with axis[hi] >= x; the guards above ensure 1 <= hi <= n-1.
    let hi = axis.partition_point(|&v| v < x);
    if axis[hi] == x {
        return (hi, hi, 0.0);
    }
    let lo = hi - 1;
    let t = (x - axis[lo]) / (axis[hi] - axis[lo]);
    (lo, hi, t)
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, clamped to the end
/// values outside the tabulated range.
pub fn interp_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let (lo, hi, t) = bracket(xs, x);
    (1.0 - t) * ys[lo] + t * ys[hi]
}

/// Piecewise-linear interpolation of `(xs, ys)` at `x`, extending the first
/// and last segments beyond the tabulated range.
pub fn interp_extrapolated(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let n = xs.len();
    let (lo, hi) = if x <= xs[0] {
        (0, 1)
    } else if x >= xs[n - 1] {
        (n - 2, n - 1)
    } else {
        let (lo, hi, t) = bracket(xs, x);
        if lo == hi {
            return ys[lo];
        }
        return (1.0 - t) * ys[lo] + t * ys[hi];
    };
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Resample `(src_x, src_y)` onto `dst_x` by linear interpolation, clamping to
/// the edge values outside the source coverage.
pub fn resample_linear(src_x: &[f64], src_y: &[f64], dst_x: &[f64]) -> Vec<f64> {
    dst_x
        .iter()
        .map(|&x| interp_clamped(src_x, src_y, x))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracket_clamps_and_hits_nodes() {
        let axis = [1.0, 2.0, 4.0];
        assert_eq!(bracket(&axis, 0.5), (0, 0, 0.0));
        assert_eq!(bracket(&axis, 9.0), (2, 2, 0.0));
        assert_eq!(bracket(&axis, 2.0), (1, 1, 0.0));

        let (lo, hi, t) = bracket(&axis, 3.0);
        assert_eq!((lo, hi), (1, 2));
        assert!((t - 0.5).abs() < 1e-12);
    }

    #[test]
    fn interp_clamped_matches_segments() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 30.0];
        assert!((interp_clamped(&xs, &ys, 0.5) - 5.0).abs() < 1e-12);
        assert!((interp_clamped(&xs, &ys, 1.5) - 20.0).abs() < 1e-12);
        // Clamped outside.
        assert!((interp_clamped(&xs, &ys, -1.0) - 0.0).abs() < 1e-12);
        assert!((interp_clamped(&xs, &ys, 5.0) - 30.0).abs() < 1e-12);
    }

    #[test]
    fn interp_extrapolated_extends_end_segments() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 10.0, 30.0];
        assert!((interp_extrapolated(&xs, &ys, -1.0) + 10.0).abs() < 1e-12);
        assert!((interp_extrapolated(&xs, &ys, 3.0) - 50.0).abs() < 1e-12);
        // Interior agrees with the clamped version.
        assert!((interp_extrapolated(&xs, &ys, 1.5) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn resample_identity_on_same_grid() {
        let xs = [3.0, 4.0, 5.5];
        let ys = [1.0, -2.0, 7.0];
        let out = resample_linear(&xs, &ys, &xs);
        for (a, b) in out.iter().zip(ys.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }
}
