//! Signal-to-noise estimation for a single isolated peak following the
//! European Pharmacopoeia convention.
//!
//! A [`GaussianPeakShape`] and a [`LorentzianPeakShape`] are both fit to the
//! signal inside a caller supplied time window. The selected shape's fitted
//! height is the signal, and the peak-to-peak amplitude of a blank trace over
//! twenty half-height widths around the fitted center is the noise:
//!
//! ```math
//! S/N = \frac{k H}{h}
//! ```
//!
//! where $`H`$ is the fitted height, $`h`$ the peak-to-peak noise and $`k`$ is
//! `2` when the noise can take values below zero, `1` otherwise.
//!
//! # Usage
//! ```
//! use peaksnr::{signal_to_noise, SnrConfig};
//! use peaksnr::feature_statistics::{GaussianPeakShape, PeakShapeModel};
//!
//! let time: Vec<f64> = (0..=1000).map(|i| i as f64 / 100.0).collect();
//! let signal = GaussianPeakShape::new(5.0, 0.5, 100.0).predict(&time);
//! let mut noise = vec![0.0; time.len()];
//! noise[450] = 6.0;
//! noise[550] = -4.0;
//!
//! let snr = signal_to_noise(&time, &signal, &noise, (3.0, 7.0), &SnrConfig::default()).unwrap();
//! assert!((snr - 20.0).abs() < 1e-6);
//! ```
use std::fmt::Display;
use std::ops::Range;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::arrayops::is_increasing;
use crate::diagnostics::{default_renderer, DiagnosticRenderer, SnrDiagnostic};
use crate::feature_statistics::{
    FitConfig, FitError, GaussianPeakShape, LineShape, LorentzianPeakShape, ModelFitResult,
    PeakFitArgs, PeakShape, PeakShapeModel,
};
use crate::peak_statistics::{peak_to_peak, signal_to_noise_ratio};
use crate::search::nearest_window;

/// The noise window extends this many fitted widths to either side of the peak center
pub const NOISE_WINDOW_HALF_WIDTHS: f64 = 10.0;

/// Which trace a window was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TraceRegion {
    Signal,
    Noise,
}

impl Display for TraceRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceRegion::Signal => f.write_str("signal"),
            TraceRegion::Noise => f.write_str("noise"),
        }
    }
}

/// All the ways estimating a signal-to-noise ratio can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalToNoiseError {
    #[error("the time range ({start}, {end}) must be finite with start < end")]
    InvalidRange { start: f64, end: f64 },
    #[error("the trace lengths differ: time has {time}, signal has {signal}, noise has {noise}")]
    LengthMismatch {
        time: usize,
        signal: usize,
        noise: usize,
    },
    #[error("the time array is not strictly increasing")]
    TimeNotSorted,
    #[error("the {region} window between {start} and {end} selects no data points")]
    InsufficientData {
        region: TraceRegion,
        start: f64,
        end: f64,
    },
    #[error("failed to fit a {shape} peak shape: {source}")]
    FitConvergence {
        shape: LineShape,
        #[source]
        source: FitError,
    },
    #[error("the noise between {start} and {end} has zero peak-to-peak amplitude")]
    DegenerateNoise { start: f64, end: f64 },
    #[error("diagnostic rendering failed: {0}")]
    Diagnostics(String),
}

/// Whether and how to draw the fitted peak shapes
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DiagnosticsConfig {
    pub enabled: bool,
    /// Save the figure here, if set
    pub path: Option<PathBuf>,
    pub title: String,
}

impl DiagnosticsConfig {
    /// Request a diagnostic figure with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            enabled: true,
            path: None,
            title: title.into(),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Options controlling the signal-to-noise computation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SnrConfig {
    /// The peak shape whose fitted parameters define the signal and noise window
    pub line_shape: LineShape,
    /// Whether the noise trace can swing below zero, doubling the ratio
    pub sub_zero: bool,
    pub diagnostics: DiagnosticsConfig,
    pub fit: FitConfig,
}

impl Default for SnrConfig {
    fn default() -> Self {
        Self {
            line_shape: LineShape::Gaussian,
            sub_zero: true,
            diagnostics: DiagnosticsConfig::default(),
            fit: FitConfig::default(),
        }
    }
}

impl SnrConfig {
    pub fn line_shape(mut self, line_shape: LineShape) -> Self {
        self.line_shape = line_shape;
        self
    }

    pub fn sub_zero(mut self, sub_zero: bool) -> Self {
        self.sub_zero = sub_zero;
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn fit(mut self, fit: FitConfig) -> Self {
        self.fit = fit;
        self
    }
}

/// Everything computed en route to a signal-to-noise ratio
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SignalToNoiseReport {
    pub line_shape: LineShape,
    pub sub_zero: bool,
    /// The index range of the fitted signal region
    pub fit_window: Range<usize>,
    pub gaussian: GaussianPeakShape,
    pub gaussian_fit: ModelFitResult,
    pub lorentzian: LorentzianPeakShape,
    pub lorentzian_fit: ModelFitResult,
    /// The time interval spanning [`NOISE_WINDOW_HALF_WIDTHS`] widths either side of the center
    pub noise_time_window: (f64, f64),
    /// The index range of the noise trace the noise was measured over
    pub noise_window: Range<usize>,
    /// The fitted peak height
    pub signal: f64,
    /// The peak-to-peak noise amplitude
    pub noise: f64,
    pub signal_to_noise: f64,
}

impl SignalToNoiseReport {
    /// The fitted model matching [`SignalToNoiseReport::line_shape`]
    pub fn selected(&self) -> PeakShape {
        match self.line_shape {
            LineShape::Gaussian => self.gaussian.into(),
            LineShape::Lorentzian => self.lorentzian.into(),
        }
    }

    /// The absolute fitted width of the selected model
    pub fn width(&self) -> f64 {
        self.selected().width().abs()
    }
}

/// Computes signal-to-noise ratios with a fixed [`SnrConfig`]
#[derive(Debug, Clone, Default)]
pub struct SignalToNoiseEstimator {
    pub config: SnrConfig,
}

/// A builder for configuring [`SignalToNoiseEstimator`]
#[derive(Debug, Clone, Default)]
pub struct SignalToNoiseEstimatorBuilder {
    config: SnrConfig,
}

impl SignalToNoiseEstimatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_shape(mut self, line_shape: LineShape) -> Self {
        self.config.line_shape = line_shape;
        self
    }

    pub fn sub_zero(mut self, sub_zero: bool) -> Self {
        self.config.sub_zero = sub_zero;
        self
    }

    pub fn diagnostics(mut self, diagnostics: DiagnosticsConfig) -> Self {
        self.config.diagnostics = diagnostics;
        self
    }

    pub fn fit_config(mut self, fit: FitConfig) -> Self {
        self.config.fit = fit;
        self
    }

    pub fn build(self) -> SignalToNoiseEstimator {
        SignalToNoiseEstimator::new(self.config)
    }
}

impl From<SignalToNoiseEstimatorBuilder> for SignalToNoiseEstimator {
    fn from(value: SignalToNoiseEstimatorBuilder) -> Self {
        value.build()
    }
}

fn validate_inputs(
    time: &[f64],
    signal: &[f64],
    noise: &[f64],
    time_range: (f64, f64),
) -> Result<(), SignalToNoiseError> {
    let (start, end) = time_range;
    if !(start.is_finite() && end.is_finite()) || start >= end {
        return Err(SignalToNoiseError::InvalidRange { start, end });
    }
    if time.len() != signal.len() || time.len() != noise.len() {
        return Err(SignalToNoiseError::LengthMismatch {
            time: time.len(),
            signal: signal.len(),
            noise: noise.len(),
        });
    }
    if !is_increasing(time) {
        return Err(SignalToNoiseError::TimeNotSorted);
    }
    Ok(())
}

fn fit_shape<T: PeakShapeModel>(
    shape: LineShape,
    data: &PeakFitArgs,
    time_range: (f64, f64),
    config: &FitConfig,
) -> Result<(T, ModelFitResult), SignalToNoiseError> {
    let mut model = T::guess(data, time_range);
    let fit = model
        .fit_with(data.borrow(), config)
        .map_err(|source| SignalToNoiseError::FitConvergence { shape, source })?;
    debug!("Fit {shape} peak shape {model:?}: {fit:?}");
    Ok((model, fit))
}

/// Measure the peak-to-peak amplitude of `noise` over [`NOISE_WINDOW_HALF_WIDTHS`]
/// multiples of `width` either side of `center`.
///
/// Returns the time interval, the index range it maps to on `time` and the amplitude.
fn measure_noise(
    time: &[f64],
    noise: &[f64],
    center: f64,
    width: f64,
) -> Result<((f64, f64), Range<usize>, f64), SignalToNoiseError> {
    let width = width.abs();
    let noise_time_window = (
        center - NOISE_WINDOW_HALF_WIDTHS * width,
        center + NOISE_WINDOW_HALF_WIDTHS * width,
    );
    let noise_window = nearest_window(time, noise_time_window.0, noise_time_window.1);
    debug!("Measuring noise over {noise_window:?} for {noise_time_window:?}");

    let noise_amplitude = peak_to_peak(&noise[noise_window.clone()]).ok_or(
        SignalToNoiseError::InsufficientData {
            region: TraceRegion::Noise,
            start: noise_time_window.0,
            end: noise_time_window.1,
        },
    )?;
    if !(noise_amplitude > 0.0) {
        return Err(SignalToNoiseError::DegenerateNoise {
            start: noise_time_window.0,
            end: noise_time_window.1,
        });
    }
    Ok((noise_time_window, noise_window, noise_amplitude))
}

impl SignalToNoiseEstimator {
    pub fn new(config: SnrConfig) -> Self {
        Self { config }
    }

    pub fn builder() -> SignalToNoiseEstimatorBuilder {
        SignalToNoiseEstimatorBuilder::new()
    }

    /// Estimate the signal-to-noise ratio of the single peak in `signal` between
    /// `time_range.0` and `time_range.1`, measuring noise on `noise`.
    ///
    /// `time`, `signal` and `noise` must have the same length and `time` must be
    /// strictly increasing.
    ///
    /// When diagnostics are enabled, the [`default_renderer`] is used.
    pub fn estimate(
        &self,
        time: &[f64],
        signal: &[f64],
        noise: &[f64],
        time_range: (f64, f64),
    ) -> Result<SignalToNoiseReport, SignalToNoiseError> {
        self.estimate_with(time, signal, noise, time_range, None)
    }

    /// As [`SignalToNoiseEstimator::estimate`], drawing diagnostics with `renderer`
    /// when they are enabled.
    pub fn estimate_with(
        &self,
        time: &[f64],
        signal: &[f64],
        noise: &[f64],
        time_range: (f64, f64),
        renderer: Option<&mut dyn DiagnosticRenderer>,
    ) -> Result<SignalToNoiseReport, SignalToNoiseError> {
        validate_inputs(time, signal, noise, time_range)?;

        let trace = PeakFitArgs::from((time, signal));
        let fit_window = trace.find_window(time_range.0, time_range.1);
        if fit_window.is_empty() {
            return Err(SignalToNoiseError::InsufficientData {
                region: TraceRegion::Signal,
                start: time_range.0,
                end: time_range.1,
            });
        }
        let data = trace.slice(fit_window.clone());
        debug!(
            "Fitting {} points in {fit_window:?} for {time_range:?}",
            data.len()
        );

        let (gaussian, gaussian_fit) = fit_shape::<GaussianPeakShape>(
            LineShape::Gaussian,
            &data,
            time_range,
            &self.config.fit,
        )?;
        let (lorentzian, lorentzian_fit) = fit_shape::<LorentzianPeakShape>(
            LineShape::Lorentzian,
            &data,
            time_range,
            &self.config.fit,
        )?;

        let selected: PeakShape = match self.config.line_shape {
            LineShape::Gaussian => gaussian.into(),
            LineShape::Lorentzian => lorentzian.into(),
        };
        let center = selected.center();
        let width = selected.width().abs();
        let signal_height = selected.height();
        debug!(
            "Using the {} fit, center {center}, width {width}, height {signal_height}",
            selected.line_shape()
        );

        let (noise_time_window, noise_window, noise_amplitude) =
            measure_noise(time, noise, center, width)?;

        let ratio = signal_to_noise_ratio(signal_height, noise_amplitude, self.config.sub_zero);
        debug!("Signal {signal_height}, noise {noise_amplitude}, S/N {ratio}");

        let report = SignalToNoiseReport {
            line_shape: self.config.line_shape,
            sub_zero: self.config.sub_zero,
            fit_window,
            gaussian,
            gaussian_fit,
            lorentzian,
            lorentzian_fit,
            noise_time_window,
            noise_window,
            signal: signal_height,
            noise: noise_amplitude,
            signal_to_noise: ratio,
        };

        if self.config.diagnostics.enabled {
            self.render_diagnostics(&report, &data, renderer)?;
        }

        Ok(report)
    }

    fn render_diagnostics(
        &self,
        report: &SignalToNoiseReport,
        data: &PeakFitArgs,
        renderer: Option<&mut dyn DiagnosticRenderer>,
    ) -> Result<(), SignalToNoiseError> {
        let diagnostics = &self.config.diagnostics;
        let diagnostic = SnrDiagnostic {
            time: data.time.as_ref(),
            intensity: data.intensity.as_ref(),
            lorentzian: report.lorentzian,
            gaussian: report.gaussian,
            signal_to_noise: report.signal_to_noise,
            title: &diagnostics.title,
            path: diagnostics.path.as_deref(),
        };
        let result = match renderer {
            Some(renderer) => renderer.render(&diagnostic),
            None => match default_renderer() {
                Some(mut renderer) => renderer.render(&diagnostic),
                None => {
                    return Err(SignalToNoiseError::Diagnostics(
                        "no diagnostic renderer available, supply one or enable the `plot` feature"
                            .to_string(),
                    ))
                }
            },
        };
        result.map_err(|e| SignalToNoiseError::Diagnostics(e.to_string()))
    }
}

/// Compute the signal-to-noise ratio of the single peak in `signal` between
/// `time_range.0` and `time_range.1`, measuring noise on the blank `noise` trace.
///
/// See [`SignalToNoiseEstimator::estimate`] for the full report.
pub fn signal_to_noise(
    time: &[f64],
    signal: &[f64],
    noise: &[f64],
    time_range: (f64, f64),
    config: &SnrConfig,
) -> Result<f64, SignalToNoiseError> {
    SignalToNoiseEstimator::new(config.clone())
        .estimate(time, signal, noise, time_range)
        .map(|report| report.signal_to_noise)
}

#[cfg(test)]
mod test {
    use std::error::Error;

    use super::*;
    use crate::test_data::{chromatogram, Chromatogram};

    #[derive(Debug, Default)]
    struct RecordingRenderer {
        captions: Vec<String>,
        points: usize,
        fail: bool,
    }

    impl DiagnosticRenderer for RecordingRenderer {
        fn render(&mut self, diagnostic: &SnrDiagnostic<'_>) -> Result<(), Box<dyn Error>> {
            if self.fail {
                return Err("disk full".into());
            }
            self.captions.push(diagnostic.caption());
            self.points = diagnostic.time.len();
            assert_eq!(diagnostic.gaussian_curve().len(), self.points);
            assert_eq!(diagnostic.lorentzian_curve().len(), self.points);
            Ok(())
        }
    }

    #[rstest::fixture]
    fn trace() -> Chromatogram {
        chromatogram()
    }

    #[test_log::test]
    fn test_end_to_end() {
        let trace = chromatogram();
        let estimator = SignalToNoiseEstimator::default();
        let report = estimator
            .estimate(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0))
            .unwrap();
        assert_eq!(report.fit_window, 300..700);
        assert_eq!(report.noise_window, 0..1000);
        assert!((report.signal - 100.0).abs() < 1e-6);
        assert!((report.width() - 0.5).abs() < 1e-6);
        assert_eq!(report.noise, 10.0);
        assert!((report.signal_to_noise - 20.0).abs() < 1e-6);
        assert!(report.gaussian_fit.converged);
        assert!(report.lorentzian_fit.converged);
    }

    #[rstest::rstest]
    fn test_sub_zero_doubles(trace: Chromatogram) {
        let two_sided = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default().sub_zero(true),
        )
        .unwrap();
        let one_sided = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default().sub_zero(false),
        )
        .unwrap();
        assert_eq!(two_sided, 2.0 * one_sided);
        assert!((one_sided - 10.0).abs() < 1e-6);
    }

    #[rstest::rstest]
    fn test_lorentzian_selection(trace: Chromatogram) {
        let estimator = SignalToNoiseEstimator::builder()
            .line_shape(LineShape::Lorentzian)
            .build();
        let report = estimator
            .estimate(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0))
            .unwrap();
        assert_eq!(report.line_shape, LineShape::Lorentzian);
        assert_eq!(report.selected(), PeakShape::Lorentzian(report.lorentzian));
        assert_eq!(report.signal, report.lorentzian.height);
        let expected = 2.0 * report.lorentzian.height / report.noise;
        assert_eq!(report.signal_to_noise, expected);
        let width = report.lorentzian.width.abs();
        assert!((report.noise_time_window.1 - report.noise_time_window.0 - 20.0 * width).abs() < 1e-9);
    }

    #[rstest::rstest]
    #[case((7.0, 3.0))]
    #[case((5.0, 5.0))]
    #[case((f64::NAN, 7.0))]
    #[case((3.0, f64::INFINITY))]
    fn test_invalid_range(trace: Chromatogram, #[case] time_range: (f64, f64)) {
        let mut renderer = RecordingRenderer::default();
        let estimator = SignalToNoiseEstimator::builder()
            .diagnostics(DiagnosticsConfig::new("never drawn"))
            .build();
        let err = estimator
            .estimate_with(
                &trace.time,
                &trace.signal,
                &trace.noise,
                time_range,
                Some(&mut renderer),
            )
            .unwrap_err();
        assert!(matches!(err, SignalToNoiseError::InvalidRange { .. }), "{err}");
        assert!(renderer.captions.is_empty());
    }

    #[rstest::rstest]
    fn test_length_mismatch(trace: Chromatogram) {
        let err = signal_to_noise(
            &trace.time,
            &trace.signal[1..],
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SignalToNoiseError::LengthMismatch {
                time: 1001,
                signal: 1000,
                noise: 1001
            }
        );
    }

    #[rstest::rstest]
    fn test_unsorted_time(mut trace: Chromatogram) {
        trace.time.swap(10, 11);
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, SignalToNoiseError::TimeNotSorted);
    }

    #[rstest::rstest]
    fn test_degenerate_noise(mut trace: Chromatogram) {
        trace.noise.iter_mut().for_each(|e| *e = 3.0);
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SignalToNoiseError::DegenerateNoise { .. }), "{err}");
    }

    #[rstest::rstest]
    fn test_window_collapses(trace: Chromatogram) {
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.001, 3.002),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SignalToNoiseError::InsufficientData {
                region: TraceRegion::Signal,
                start: 3.001,
                end: 3.002
            }
        );
    }

    #[rstest::rstest]
    fn test_too_few_points_to_fit(trace: Chromatogram) {
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 3.02),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SignalToNoiseError::FitConvergence {
                shape: LineShape::Gaussian,
                source: FitError::Underdetermined { points: 2, params: 3 }
            }
        );
        assert!(err.to_string().contains("gaussian"));
        assert!(err.source().is_some());
    }

    #[rstest::rstest]
    fn test_noise_window_collapses(trace: Chromatogram) {
        let err = measure_noise(&trace.time, &trace.noise, 5.0, 1e-4).unwrap_err();
        assert!(
            matches!(
                err,
                SignalToNoiseError::InsufficientData {
                    region: TraceRegion::Noise,
                    ..
                }
            ),
            "{err}"
        );

        let (window, iv, amplitude) = measure_noise(&trace.time, &trace.noise, 5.0, -0.5).unwrap();
        assert_eq!(window, (0.0, 10.0));
        assert_eq!(iv, 0..1000);
        assert_eq!(amplitude, 10.0);
    }

    #[rstest::rstest]
    fn test_non_finite_signal(mut trace: Chromatogram) {
        trace.signal[500] = f64::NAN;
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SignalToNoiseError::FitConvergence {
                shape: LineShape::Gaussian,
                source: FitError::NonFinite { iteration: 0 }
            }
        );
    }

    #[rstest::rstest]
    fn test_wandering_fit_is_an_error(mut trace: Chromatogram) {
        trace.signal = GaussianPeakShape::new(4.3, 0.08, 50.0).predict(&trace.time);
        let err = signal_to_noise(
            &trace.time,
            &trace.signal,
            &trace.noise,
            (3.0, 7.0),
            &SnrConfig::default(),
        )
        .unwrap_err();
        assert!(
            matches!(
                err,
                SignalToNoiseError::FitConvergence {
                    shape: LineShape::Gaussian,
                    source: FitError::Diverged { .. }
                }
            ),
            "{err}"
        );
    }

    #[rstest::rstest]
    fn test_iteration_cap_surfaces(trace: Chromatogram) {
        let config = SnrConfig::default().fit(FitConfig::default().max_iter(2));
        let err = signal_to_noise(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0), &config)
            .unwrap_err();
        assert!(
            matches!(
                err,
                SignalToNoiseError::FitConvergence {
                    shape: LineShape::Gaussian,
                    source: FitError::MaxIterations { max_iter: 2 }
                }
            ),
            "{err}"
        );
    }

    #[rstest::rstest]
    fn test_diagnostics_rendered_once(trace: Chromatogram) {
        let mut renderer = RecordingRenderer::default();
        let estimator = SignalToNoiseEstimator::builder()
            .diagnostics(DiagnosticsConfig::new("Peak A"))
            .build();
        let report = estimator
            .estimate_with(
                &trace.time,
                &trace.signal,
                &trace.noise,
                (3.0, 7.0),
                Some(&mut renderer),
            )
            .unwrap();
        assert_eq!(renderer.captions, vec!["Peak A S/N:    20.00".to_string()]);
        assert_eq!(renderer.points, report.fit_window.len());
    }

    #[rstest::rstest]
    fn test_diagnostics_disabled(trace: Chromatogram) {
        let mut renderer = RecordingRenderer::default();
        let estimator = SignalToNoiseEstimator::builder()
            .diagnostics(DiagnosticsConfig::new("Peak A").enabled(false))
            .build();
        estimator
            .estimate_with(
                &trace.time,
                &trace.signal,
                &trace.noise,
                (3.0, 7.0),
                Some(&mut renderer),
            )
            .unwrap();
        assert!(renderer.captions.is_empty());
    }

    #[rstest::rstest]
    fn test_diagnostics_failure(trace: Chromatogram) {
        let mut renderer = RecordingRenderer {
            fail: true,
            ..Default::default()
        };
        let estimator = SignalToNoiseEstimator::builder()
            .diagnostics(DiagnosticsConfig::new("Peak A"))
            .build();
        let err = estimator
            .estimate_with(
                &trace.time,
                &trace.signal,
                &trace.noise,
                (3.0, 7.0),
                Some(&mut renderer),
            )
            .unwrap_err();
        assert_eq!(err, SignalToNoiseError::Diagnostics("disk full".into()));
    }

    #[cfg(not(feature = "plot"))]
    #[rstest::rstest]
    fn test_diagnostics_without_renderer(trace: Chromatogram) {
        let config = SnrConfig::default().diagnostics(DiagnosticsConfig::new("Peak A"));
        let err = signal_to_noise(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0), &config)
            .unwrap_err();
        assert!(matches!(err, SignalToNoiseError::Diagnostics(_)));
    }

    #[rstest::rstest]
    fn test_deterministic(trace: Chromatogram) {
        let estimator = SignalToNoiseEstimator::default();
        let a = estimator
            .estimate(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0))
            .unwrap();
        let b = estimator
            .estimate(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0))
            .unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "serde")]
    #[rstest::rstest]
    fn test_report_serialization(trace: Chromatogram) {
        let report = SignalToNoiseEstimator::default()
            .estimate(&trace.time, &trace.signal, &trace.noise, (3.0, 7.0))
            .unwrap();
        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains("\"line_shape\":\"gaussian\""));
        let dup: SignalToNoiseReport = serde_json::from_str(&text).unwrap();
        assert_eq!(dup.fit_window, report.fit_window);
    }
}
