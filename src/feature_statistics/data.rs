use std::{
    borrow::Cow,
    iter::FusedIterator,
    ops::{Deref, Range},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::minmax;
use crate::search::nearest_window;

/// A copying iterator over the `(time, intensity)` pairs of a [`PeakFitArgs`]
pub struct PeakFitArgsIter<'a> {
    inner: std::iter::Zip<
        std::iter::Copied<std::slice::Iter<'a, f64>>,
        std::iter::Copied<std::slice::Iter<'a, f64>>,
    >,
}

impl<'a> Iterator for PeakFitArgsIter<'a> {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> FusedIterator for PeakFitArgsIter<'a> {}

impl<'a> ExactSizeIterator for PeakFitArgsIter<'a> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a> PeakFitArgsIter<'a> {
    pub fn new(
        inner: std::iter::Zip<
            std::iter::Copied<std::slice::Iter<'a, f64>>,
            std::iter::Copied<std::slice::Iter<'a, f64>>,
        >,
    ) -> Self {
        Self { inner }
    }
}

/// Represent an array pair for signal-over-time data
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakFitArgs<'a> {
    /// The time axis of the signal
    pub time: Cow<'a, [f64]>,
    /// The paired signal intensity to fit against
    pub intensity: Cow<'a, [f64]>,
}

impl<'a> PeakFitArgs<'a> {
    pub fn new(time: Cow<'a, [f64]>, intensity: Cow<'a, [f64]>) -> Self {
        assert_eq!(
            time.len(),
            intensity.len(),
            "time array length ({}) must equal intensity length ({})",
            time.len(),
            intensity.len()
        );
        Self { time, intensity }
    }

    /// Find the end-exclusive index range spanning the samples nearest to `start` and `end`.
    ///
    /// See [`nearest_window`]
    pub fn find_window(&self, start: f64, end: f64) -> Range<usize> {
        nearest_window(&self.time, start, end)
    }

    /// Select a sub-region of the signal given by `iv`
    ///
    /// The returned instance will borrow the data from `self`
    pub fn slice(&self, iv: Range<usize>) -> PeakFitArgs<'_> {
        let x = &self.time[iv.clone()];
        let y = &self.intensity[iv];
        (x, y).into()
    }

    /// The largest intensity value, or `None` if there is no data
    pub fn max_intensity(&self) -> Option<f64> {
        minmax(&self.intensity).map(|(_, hi)| hi)
    }

    /// The time range as `(min, max)`
    pub fn time_range(&self) -> Option<(f64, f64)> {
        minmax(&self.time)
    }

    /// The length of the arrays
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Create a new [`PeakFitArgs`] from this one that borrows its data from this one
    pub fn borrow(&self) -> PeakFitArgs<'_> {
        PeakFitArgs::new(
            Cow::Borrowed(self.time.deref()),
            Cow::Borrowed(self.intensity.deref()),
        )
    }

    /// Compute the simple linear model residuals $`\sum_i{(y_i - (\beta_{1}x_{i} + \beta_0))^2}`$
    pub fn linear_residuals(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let (xsum, ysum) = self
            .iter()
            .reduce(|(xa, ya), (x, y)| (xa + x, ya + y))
            .unwrap_or_default();

        let xmean = xsum / self.len() as f64;
        let ymean = ysum / self.len() as f64;

        let mut tss = 0.0;
        let mut hat = 0.0;

        for (x, y) in self.iter() {
            let delta_x = x - xmean;
            tss += delta_x.powi(2);
            hat += delta_x * (y - ymean);
        }

        let beta = if tss > 0.0 { hat / tss } else { 0.0 };
        let alpha = ymean - beta * xmean;

        self.iter()
            .map(|(x, y)| (y - ((x * beta) + alpha)).powi(2))
            .sum()
    }

    /// Create a [`PeakFitArgsIter`] over the `(time, intensity)` pairs
    pub fn iter(&self) -> PeakFitArgsIter<'_> {
        PeakFitArgsIter::new(
            self.time
                .iter()
                .copied()
                .zip(self.intensity.iter().copied()),
        )
    }
}

impl<'a> From<(Cow<'a, [f64]>, Cow<'a, [f64]>)> for PeakFitArgs<'a> {
    fn from(pair: (Cow<'a, [f64]>, Cow<'a, [f64]>)) -> PeakFitArgs<'a> {
        PeakFitArgs::new(pair.0, pair.1)
    }
}

impl<'a> From<(&'a [f64], &'a [f64])> for PeakFitArgs<'a> {
    fn from(pair: (&'a [f64], &'a [f64])) -> PeakFitArgs<'a> {
        PeakFitArgs::new(Cow::Borrowed(pair.0), Cow::Borrowed(pair.1))
    }
}

impl From<(Vec<f64>, Vec<f64>)> for PeakFitArgs<'static> {
    fn from(pair: (Vec<f64>, Vec<f64>)) -> PeakFitArgs<'static> {
        PeakFitArgs::new(Cow::Owned(pair.0), Cow::Owned(pair.1))
    }
}
