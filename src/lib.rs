//! `peaksnr` computes the signal-to-noise ratio of a single chromatographic peak
//! the way the European Pharmacopoeia defines it: twice the height of the peak
//! divided by the peak-to-peak amplitude of a blank trace, measured over a window
//! twenty times the width of the peak at half height.
//!
//! The peak height and width come from least squares fits of a Gaussian and a
//! Lorentzian peak shape to the signal inside a caller supplied time window, see
//! [`crate::feature_statistics`]. Either fitted model can be chosen through
//! [`LineShape`] to drive the computation.
//!
//! # Usage
//! ```
//! use peaksnr::{LineShape, SignalToNoiseEstimator};
//! use peaksnr::feature_statistics::{LorentzianPeakShape, PeakShapeModel};
//!
//! let time: Vec<f64> = (0..=1000).map(|i| i as f64 / 100.0).collect();
//! let signal = LorentzianPeakShape::new(5.0, 0.4, 40.0).predict(&time);
//! let noise: Vec<f64> = (0..time.len()).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
//!
//! let estimator = SignalToNoiseEstimator::builder()
//!     .line_shape(LineShape::Lorentzian)
//!     .build();
//! let report = estimator.estimate(&time, &signal, &noise, (3.0, 7.0)).unwrap();
//! assert!((report.signal_to_noise - 80.0).abs() < 1e-4);
//! ```
//!
//! ## Diagnostics
//! With the `plot` feature enabled, setting [`DiagnosticsConfig::enabled`] draws the
//! windowed trace with both fitted curves using `plotters`. Any other
//! [`diagnostics::DiagnosticRenderer`] can be supplied through
//! [`SignalToNoiseEstimator::estimate_with`].
pub mod arrayops;
pub mod diagnostics;
pub mod feature_statistics;
pub mod peak_statistics;
pub mod search;
pub mod snr;

#[cfg(feature = "plot")]
pub mod plot;

#[cfg(test)]
mod test_data;

pub use crate::feature_statistics::{FitConfig, FitError, LineShape, PeakShape};
pub use crate::snr::{
    signal_to_noise, DiagnosticsConfig, SignalToNoiseError, SignalToNoiseEstimator,
    SignalToNoiseEstimatorBuilder, SignalToNoiseReport, SnrConfig, TraceRegion,
    NOISE_WINDOW_HALF_WIDTHS,
};
