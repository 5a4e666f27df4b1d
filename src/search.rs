//! Nearest-index lookups on sorted coordinate arrays.
//!
//! Windows are resolved by snapping each time boundary to the sample whose
//! coordinate is closest to it, never by interpolation. A boundary outside of
//! the array's range snaps to the first or last index.
use std::ops::Range;

use num_traits::Float;

/// Find the first index `i` where `array[i] >= q`, or `array.len()` if there is none.
pub fn binsearch<T: Float>(array: &[T], q: T) -> usize {
    array.partition_point(|x| *x < q)
}

/// Find the index of the value in the sorted array `vec` closest to `target_val`.
///
/// When `target_val` lies exactly halfway between two samples, the lower index
/// wins. An empty array yields `0`.
pub fn nearest<T: Float>(vec: &[T], target_val: T) -> usize {
    let n = vec.len();
    if n == 0 {
        return 0;
    }
    let i = binsearch(vec, target_val);
    if i == 0 {
        return 0;
    }
    if i >= n {
        return n - 1;
    }
    let below = target_val - vec[i - 1];
    let above = vec[i] - target_val;
    if above < below {
        i
    } else {
        i - 1
    }
}

/// Map the closed time interval `[start, end]` onto an end-exclusive index range
/// using [`nearest`] for both boundaries.
///
/// The returned range may be empty (or inverted, in which case it is collapsed to
/// an empty range at `start`) when both boundaries snap to the same sample.
pub fn nearest_window<T: Float>(vec: &[T], start: T, end: T) -> Range<usize> {
    let i = nearest(vec, start);
    let j = nearest(vec, end);
    if j < i {
        i..i
    } else {
        i..j
    }
}
