//! The optional diagnostic figure collaborator.
//!
//! The signal-to-noise computation never draws anything itself. When diagnostics
//! are requested it hands a [`SnrDiagnostic`] to a [`DiagnosticRenderer`] exactly
//! once, after the ratio is known.
use std::error::Error;
use std::path::Path;

use cfg_if::cfg_if;

use crate::arrayops::minmax;
use crate::feature_statistics::{GaussianPeakShape, LorentzianPeakShape, PeakShapeModel};

pub const X_LABEL: &str = "Retention time / min";
pub const Y_LABEL: &str = "Intensity";
pub const LEGEND: [&str; 3] = ["Experimental", "Lorentzian fit", "Gaussian fit"];

/// Headroom above the tallest observed point on the intensity axis
const Y_HEADROOM: f64 = 1.2;

/// Everything needed to draw the windowed trace with both fitted curves overlaid
#[derive(Debug, Clone, Copy)]
pub struct SnrDiagnostic<'a> {
    /// The time points within the fitting window
    pub time: &'a [f64],
    /// The observed signal within the fitting window
    pub intensity: &'a [f64],
    pub lorentzian: LorentzianPeakShape,
    pub gaussian: GaussianPeakShape,
    pub signal_to_noise: f64,
    pub title: &'a str,
    /// Where the figure should be saved, if anywhere
    pub path: Option<&'a Path>,
}

impl<'a> SnrDiagnostic<'a> {
    /// The figure title annotated with the signal-to-noise ratio
    pub fn caption(&self) -> String {
        format!("{} S/N: {:8.2}", self.title, self.signal_to_noise)
    }

    pub fn lorentzian_curve(&self) -> Vec<f64> {
        self.lorentzian.predict(self.time)
    }

    pub fn gaussian_curve(&self) -> Vec<f64> {
        self.gaussian.predict(self.time)
    }

    /// The horizontal extent, spanning the windowed time points
    pub fn x_range(&self) -> (f64, f64) {
        minmax(self.time).unwrap_or((0.0, 1.0))
    }

    /// The vertical extent, from the lowest observed point to 20% above the highest
    pub fn y_range(&self) -> (f64, f64) {
        minmax(self.intensity)
            .map(|(lo, hi)| (lo, hi * Y_HEADROOM))
            .unwrap_or((0.0, 1.0))
    }
}

/// Draws a [`SnrDiagnostic`], persisting it when [`SnrDiagnostic::path`] is set
pub trait DiagnosticRenderer {
    fn render(&mut self, diagnostic: &SnrDiagnostic<'_>) -> Result<(), Box<dyn Error>>;
}

cfg_if! {
    if #[cfg(feature = "plot")] {
        /// The renderer used when diagnostics are enabled but the caller did not supply one.
        pub fn default_renderer() -> Option<Box<dyn DiagnosticRenderer>> {
            Some(Box::new(crate::plot::PlottersRenderer::default()))
        }
    } else {
        /// The renderer used when diagnostics are enabled but the caller did not supply one.
        ///
        /// Always `None` without the `plot` feature.
        pub fn default_renderer() -> Option<Box<dyn DiagnosticRenderer>> {
            None
        }
    }
}
