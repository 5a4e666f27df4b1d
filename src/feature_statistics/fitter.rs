use std::{borrow::Cow, fmt::Debug};

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{FitConfig, FitError, ModelFitResult, PeakFitArgs, PeakShapeModel, N_PARAMS};

/// Damping factors beyond this mean the solver can no longer make progress
const MAX_DAMPING: f64 = 1e16;
const MIN_DAMPING: f64 = 1e-12;
const DAMPING_FACTOR: f64 = 10.0;

/// The Gauss-Newton normal equations $`J^TJ`$ and $`J^Tr`$ at a parameter point
struct NormalEquations {
    jtj: Matrix3<f64>,
    jtr: Vector3<f64>,
}

/// Fit a single [`PeakShapeModel`] type by Levenberg-Marquardt least squares
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakShapeFitter<'a, T: PeakShapeModel> {
    pub data: PeakFitArgs<'a>,
    pub model: Option<T>,
}

impl<'a, T: PeakShapeModel> PeakShapeFitter<'a, T> {
    pub fn new(data: PeakFitArgs<'a>) -> Self {
        Self { data, model: None }
    }

    fn normal_equations(&self, model: &T) -> NormalEquations {
        let mut jtj = Matrix3::zeros();
        let mut jtr = Vector3::zeros();
        for (x, y) in self.data.iter() {
            let row = Vector3::from(model.jacobian(x));
            let resid = y - model.density(x);
            jtj += row * row.transpose();
            jtr += row * resid;
        }
        NormalEquations { jtj, jtr }
    }

    /// Solve $`(J^TJ + \lambda\,\mathrm{diag}(J^TJ))\delta = J^Tr`$ for the parameter step
    fn damped_step(normal: &NormalEquations, damping: f64) -> Option<Vector3<f64>> {
        let mut a = normal.jtj;
        for i in 0..N_PARAMS {
            a[(i, i)] += damping * normal.jtj[(i, i)];
        }
        let step = a.cholesky()?.solve(&normal.jtr);
        if step.iter().all(|s| s.is_finite()) {
            Some(step)
        } else {
            None
        }
    }

    /// A fitted model must have finite parameters, a non-zero width and a center
    /// inside the observed time span
    fn describes_data(&self, model: &T) -> bool {
        let [center, width, height] = model.params();
        if !(center.is_finite() && width.is_finite() && height.is_finite()) || width == 0.0 {
            return false;
        }
        match self.data.time_range() {
            Some((start, end)) => start <= center && center <= end,
            None => false,
        }
    }

    fn step_within_tolerance(step: &Vector3<f64>, params: &Vector3<f64>, xtol: f64) -> bool {
        step.iter()
            .zip(params.iter())
            .all(|(s, p)| s.abs() <= xtol * (p.abs() + xtol))
    }

    /// Do the actual model fitting on the enclosed data, minimizing the sum of squared
    /// residuals starting from `model_params`.
    ///
    /// On success, `model_params` holds the best parameters found. On failure, including
    /// a fit whose center leaves the observed time span, it is left untouched.
    pub fn fit_model(
        &mut self,
        model_params: &mut T,
        config: &FitConfig,
    ) -> Result<ModelFitResult, FitError> {
        let n = self.data.len();
        if n < N_PARAMS {
            return Err(FitError::Underdetermined {
                points: n,
                params: N_PARAMS,
            });
        }

        let mut params = Vector3::from(model_params.params());
        let mut model = T::from_params(params.into());
        let mut cost = model.loss(&self.data);
        let mut evaluations = 1;
        let mut damping = config.initial_damping;
        let mut converged = false;
        let mut iteration = 0;

        if !cost.is_finite() {
            return Err(FitError::NonFinite { iteration });
        }

        while !converged {
            if cost == 0.0 {
                log::trace!("{iteration}: Exact fit");
                converged = true;
                break;
            }

            let normal = self.normal_equations(&model);
            if normal.jtr.iter().any(|g| !g.is_finite()) {
                return Err(FitError::NonFinite { iteration });
            }
            if normal.jtr.amax() <= config.gtol {
                log::trace!("{iteration}: Gradient below tolerance");
                converged = true;
                break;
            }

            loop {
                let step = match Self::damped_step(&normal, damping) {
                    Some(step) => step,
                    None => {
                        damping *= DAMPING_FACTOR;
                        if damping > MAX_DAMPING {
                            return Err(FitError::SingularMatrix { iteration });
                        }
                        continue;
                    }
                };

                if evaluations >= config.max_iter {
                    log::warn!(
                        "Peak shape fit exhausted {} evaluations at {model:?}",
                        config.max_iter
                    );
                    return Err(FitError::MaxIterations {
                        max_iter: config.max_iter,
                    });
                }

                let candidate_params = params + step;
                let candidate = T::from_params(candidate_params.into());
                let candidate_cost = candidate.loss(&self.data);
                evaluations += 1;

                log::trace!(
                    "{iteration}: Cost = {cost:0.6e} -> {candidate_cost:0.6e}, Damping = {damping:0.3e}"
                );

                let small_step = Self::step_within_tolerance(&step, &params, config.xtol);

                if candidate_cost.is_finite() && candidate_cost < cost {
                    let reduction = cost - candidate_cost;
                    params = candidate_params;
                    model = candidate;
                    cost = candidate_cost;
                    damping = (damping / DAMPING_FACTOR).max(MIN_DAMPING);
                    iteration += 1;
                    if reduction <= config.ftol * (cost + reduction) || small_step {
                        converged = true;
                    }
                    break;
                }

                if small_step {
                    log::trace!("{iteration}: Step below tolerance");
                    converged = true;
                    break;
                }

                damping *= DAMPING_FACTOR;
                if damping > MAX_DAMPING {
                    return Err(FitError::Stalled { iteration });
                }
            }
        }

        if !self.describes_data(&model) {
            log::debug!("{iteration}: Fit left the data at {model:?}");
            return Err(FitError::Diverged { iteration });
        }

        let score = model.score(&self.data);
        self.model = Some(model.clone());
        *model_params = model;
        Ok(ModelFitResult::new(
            cost,
            iteration,
            evaluations,
            converged,
            score,
        ))
    }

    /// Compute the model residuals over the observed time axis, if a model has been fit
    pub fn residuals(&self) -> Option<Vec<f64>> {
        self.model.as_ref().map(|m| m.residuals(&self.data))
    }

    /// Create a synthetic signal profile using the observed time axis but use the model predicted signal
    /// magnitude.
    pub fn predicted(&self) -> Option<PeakFitArgs<'_>> {
        let model = self.model.as_ref()?;
        let mut dup = self.data.borrow();
        dup.intensity = Cow::Owned(model.predict(&self.data.time));
        Some(dup)
    }

    /// Compute the fitted model's score on the observed data
    ///
    /// # See also
    /// [`PeakShapeModel::score`]
    pub fn score(&self) -> Option<f64> {
        self.model.as_ref().map(|m| m.score(&self.data))
    }
}
