use std::fmt::Debug;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{PeakFitArgs, PeakShapeFitter};

/// The default tolerance of the least squares solver, `sqrt(f64::EPSILON)`
pub const DEFAULT_TOLERANCE: f64 = 1.49012e-8;

/// Hyperparameters for fitting a peak shape model
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FitConfig {
    /// The maximum number of model evaluations to attempt when fitting a peak model
    pub max_iter: usize,
    /// Stop when the relative reduction of the sum of squares falls below this value
    pub ftol: f64,
    /// Stop when the relative change of every parameter falls below this value
    pub xtol: f64,
    /// Stop when the largest component of the gradient falls below this value
    pub gtol: f64,
    /// The starting Levenberg-Marquardt damping factor
    pub initial_damping: f64,
}

impl FitConfig {
    /// The maximum number of model evaluations to attempt when fitting a peak model
    pub fn max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn ftol(mut self, ftol: f64) -> Self {
        self.ftol = ftol;
        self
    }

    pub fn xtol(mut self, xtol: f64) -> Self {
        self.xtol = xtol;
        self
    }

    pub fn gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    pub fn initial_damping(mut self, initial_damping: f64) -> Self {
        self.initial_damping = initial_damping;
        self
    }
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            max_iter: 200 * (N_PARAMS + 1),
            ftol: DEFAULT_TOLERANCE,
            xtol: DEFAULT_TOLERANCE,
            gtol: DEFAULT_TOLERANCE,
            initial_damping: 1e-3,
        }
    }
}

/// Describe a model fitting procedure's output
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ModelFitResult {
    /// The sum of squared residuals at the end of the optimization run
    pub cost: f64,
    /// The number of accepted parameter updates
    pub iterations: usize,
    /// The number of model evaluations
    pub evaluations: usize,
    /// Whether or not the model converged within the specified number of evaluations
    pub converged: bool,
    /// See [`PeakShapeModel::score`]
    pub score: f64,
}

impl ModelFitResult {
    pub fn new(cost: f64, iterations: usize, evaluations: usize, converged: bool, score: f64) -> Self {
        Self {
            cost,
            iterations,
            evaluations,
            converged,
            score,
        }
    }
}

/// All the ways the least squares solver can fail
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FitError {
    #[error("{points} data points cannot constrain {params} free parameters")]
    Underdetermined { points: usize, params: usize },
    #[error("the normal equations are singular at iteration {iteration}")]
    SingularMatrix { iteration: usize },
    #[error("the model produced a non-finite value at iteration {iteration}")]
    NonFinite { iteration: usize },
    #[error("no parameter update could reduce the residuals at iteration {iteration}")]
    Stalled { iteration: usize },
    #[error("the fit wandered away from the data by iteration {iteration}")]
    Diverged { iteration: usize },
    #[error("failed to converge within {max_iter} model evaluations")]
    MaxIterations { max_iter: usize },
}

/// The number of free parameters of every supported peak shape: center, width, height
pub const N_PARAMS: usize = 3;

/// A symmetric peak shape model parameterized by its center, full width at half
/// maximum and height, which can be estimated by nonlinear least squares.
pub trait PeakShapeModel: Clone + Debug {
    /// Build a model from `[center, width, height]`
    fn from_params(params: [f64; N_PARAMS]) -> Self;

    /// The model parameters as `[center, width, height]`
    fn params(&self) -> [f64; N_PARAMS];

    /// Compute the theoretical intensity at a specified coordinate
    ///
    /// # See also
    /// [`PeakShapeModel::predict`]
    /// [`PeakShapeModel::predict_iter`]
    fn density(&self, x: f64) -> f64;

    /// The partial derivatives of [`PeakShapeModel::density`] at `x` with respect to
    /// `[center, width, height]`
    fn jacobian(&self, x: f64) -> [f64; N_PARAMS];

    fn center(&self) -> f64 {
        self.params()[0]
    }

    /// The fitted width, which may carry either sign
    fn width(&self) -> f64 {
        self.params()[1]
    }

    fn height(&self) -> f64 {
        self.params()[2]
    }

    /// Given a coordinate sequence, produce the complementary sequence of theoretical intensities
    ///
    /// # See also
    /// [`PeakShapeModel::density`]
    /// [`PeakShapeModel::predict_iter`]
    fn predict(&self, times: &[f64]) -> Vec<f64> {
        times.iter().map(|t| self.density(*t)).collect()
    }

    /// Given a coordinate iterator, produce the complementary iterator of theoretical intensities
    ///
    /// # See also
    /// [`PeakShapeModel::density`]
    /// [`PeakShapeModel::predict`]
    fn predict_iter<I: IntoIterator<Item = f64>>(&self, times: I) -> impl Iterator<Item = f64> {
        times.into_iter().map(|t| self.density(t))
    }

    /// Compute the sum of squared residuals against `data`
    fn loss(&self, data: &PeakFitArgs) -> f64 {
        data.iter()
            .map(|(t, i)| (i - self.density(t)).powi(2))
            .sum::<f64>()
    }

    /// Compute the difference between the observed signal and the theoretical signal
    fn residuals(&self, data: &PeakFitArgs) -> Vec<f64> {
        data.iter().map(|(t, i)| i - self.density(t)).collect()
    }

    /// Compute the 1 - ratio of the peak shape model squared error to
    /// a straight line linear model squared error.
    ///
    /// This value is 0 when the ordinary linear model is much better than the peak
    /// shape model, and approaches 1.0 when the peak shape model is a much better fit
    /// of the data than straight line model.
    ///
    /// *NOTE*: The function output is clamped to the $`[0, 1]`$ range for consistency
    fn score(&self, data: &PeakFitArgs) -> f64 {
        let linear_resid = data.linear_residuals();
        let shape_resid = self.loss(data);

        let line_test = shape_resid
            / (if linear_resid > 0.0 {
                linear_resid
            } else {
                1.0
            });
        (1.0 - line_test.max(1e-5)).clamp(0.0, 1.0)
    }

    /// The initial parameters used before fitting: the center of the search window
    /// `time_range`, a unit width and the largest observed intensity.
    fn guess(data: &PeakFitArgs, time_range: (f64, f64)) -> Self {
        let center = (time_range.0 + time_range.1) / 2.0;
        let height = data.max_intensity().unwrap_or(1.0);
        Self::from_params([center, 1.0, height])
    }

    /// Fit the peak shape model to some data using the default
    /// [`FitConfig`] settings.
    fn fit(&mut self, data: PeakFitArgs) -> Result<ModelFitResult, FitError> {
        self.fit_with(data, &FitConfig::default())
    }

    /// Fit the peak shape model to some data using `config` options, updating
    /// `self` in place on success.
    fn fit_with(&mut self, args: PeakFitArgs, config: &FitConfig) -> Result<ModelFitResult, FitError> {
        let mut fitter = PeakShapeFitter::new(args);
        fitter.fit_model(self, config)
    }
}
