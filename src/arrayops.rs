use num_traits::{Float, ToPrimitive};

/// Produce an evenly spaced grid from `start` up to, but not including, `end`.
pub fn gridspace<T: Float + ToPrimitive>(start: T, end: T, step: T) -> Vec<T> {
    let distance = end - start;
    let steps = (distance / step).round().to_usize().unwrap_or_default();
    let mut result = Vec::with_capacity(steps);
    for i in 0..steps {
        result.push(start + T::from(i).unwrap_or_else(T::zero) * step);
    }
    result
}

/// Check if the values in `it` are strictly increasing
pub fn is_increasing<F: Float>(it: &[F]) -> bool {
    it.windows(2).all(|w| w[0] < w[1])
}

/// Find the smallest and largest value in `it`, skipping NaN.
///
/// Returns `None` when `it` holds no comparable values.
pub fn minmax<F: Float>(it: &[F]) -> Option<(F, F)> {
    it.iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
