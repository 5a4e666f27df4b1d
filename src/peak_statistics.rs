//! Summary statistics over noise traces and peak parameters.
use num_traits::{Float, FromPrimitive};

use crate::arrayops::minmax;

pub fn _isclose<T>(x: T, y: T, rtol: T, atol: T) -> bool
where
    T: Float,
{
    (x - y).abs() <= (atol + rtol * y.abs())
}

pub fn isclose<T>(x: T, y: T) -> bool
where
    T: Float + FromPrimitive,
{
    _isclose(
        x,
        y,
        T::from_f64(1e-5).unwrap_or_else(T::epsilon),
        T::from_f64(1e-8).unwrap_or_else(T::epsilon),
    )
}

/// The peak-to-peak amplitude, `max - min`, of `values`.
///
/// Returns `None` for an empty slice.
pub fn peak_to_peak<T: Float>(values: &[T]) -> Option<T> {
    minmax(values).map(|(lo, hi)| hi - lo)
}

/// The pharmacopoeia signal-to-noise formula, `k * height / noise` where `k` is
/// `2` when the noise can swing both above and below zero (`sub_zero`) and `1`
/// otherwise.
///
/// No clamping is applied: a zero `noise` yields an infinite (or NaN) ratio, so
/// callers must reject degenerate noise first.
pub fn signal_to_noise_ratio(height: f64, noise: f64, sub_zero: bool) -> f64 {
    let scale = if sub_zero { 2.0 } else { 1.0 };
    scale * height / noise
}
