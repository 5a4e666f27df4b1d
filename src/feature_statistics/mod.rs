//! Least squares fitting of symmetric peak shape models to signal-over-time data.
//!
//! The supported peak shape types:
//! - [`GaussianPeakShape`]
//! - [`LorentzianPeakShape`]
//!
//! and the [`PeakShape`] type that dispatches over either when the shape is chosen
//! at runtime through [`LineShape`].
//!
//! Both models share the same parameterization, `(center, width, height)`, where
//! `width` is the full width at half maximum and `height` the value at `center`.
//! Both are even in `width`, so a fit may legitimately produce a negative width.
//!
//! Most of the fitting methods expect to work with [`PeakFitArgs`] which
//! can be created from borrowed signal-over-time data.
//!
//! # Example
//!
//! ```rust
//! use peaksnr::feature_statistics::{GaussianPeakShape, PeakFitArgs, PeakShapeModel};
//!
//! let time: Vec<f64> = (0..=400).map(|i| 3.0 + i as f64 / 100.0).collect();
//! let truth = GaussianPeakShape::new(5.0, 0.5, 100.0);
//! let intensity = truth.predict(&time);
//! let args = PeakFitArgs::from((time.as_slice(), intensity.as_slice()));
//!
//! let mut model = GaussianPeakShape::guess(&args, (3.0, 7.0));
//! let result = model.fit(args.borrow()).unwrap();
//! assert!(result.converged);
//! assert!((model.width.abs() - 0.5).abs() < 1e-6);
//! ```
//!
//! # Model Fit Evaluation
//!
//! All peak shape models are optimized by minimizing the sum of squared residuals with a
//! Levenberg-Marquardt solver using the analytic Jacobian of each model.
//!
//! A peak shape fit isn't just about minimizing the residual error, it's about there actually being a peak, so
//! for diagnostic purposes, we provide a [`PeakShapeModel::score`] method which compares the squared error of the model
//! to a straight line linear model of the form $`y = \alpha + \beta\times x`$.

mod data;
mod fitter;
mod multishapes;
mod shapes;
mod utils;

pub use data::{PeakFitArgs, PeakFitArgsIter};
pub use fitter::PeakShapeFitter;
pub use multishapes::{LineShape, ParseLineShapeError, PeakShape};
pub use shapes::{GaussianPeakShape, LorentzianPeakShape, HALF_MAX_EXPONENT};
pub use utils::{
    FitConfig, FitError, ModelFitResult, PeakShapeModel, DEFAULT_TOLERANCE, N_PARAMS,
};
