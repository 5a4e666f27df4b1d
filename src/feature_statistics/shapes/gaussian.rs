#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{PeakShapeModel, N_PARAMS};

/// The exponent coefficient placing half of the peak height at `center ± width / 2`,
/// approximately $`\ln 2`$.
pub const HALF_MAX_EXPONENT: f64 = 0.693;

/// Gaussian peak shape model parameterized by its full width at half maximum
///
/// ```math
/// y = h\exp\left(-0.693\left(\frac{2(c - x)}{w}\right)^2\right)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianPeakShape {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

impl GaussianPeakShape {
    pub fn new(center: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    #[inline]
    fn scaled_offset(&self, x: f64) -> f64 {
        2.0 * (self.center - x) / self.width
    }

    pub fn density(&self, x: f64) -> f64 {
        let u = self.scaled_offset(x);
        self.height * (-HALF_MAX_EXPONENT * u.powi(2)).exp()
    }

    /// Compute the partial derivatives w.r.t. center $`c`$, width $`w`$ and height $`h`$
    ///
    /// ```math
    /// \frac{\partial y}{\partial c} = -\frac{4 k u y}{w} \quad
    /// \frac{\partial y}{\partial w} = \frac{2 k u^2 y}{w} \quad
    /// \frac{\partial y}{\partial h} = e^{-k u^2}
    /// ```
    ///
    /// where $`u = 2(c - x) / w`$ and $`k = 0.693`$
    pub fn jacobian(&self, x: f64) -> [f64; N_PARAMS] {
        let u = self.scaled_offset(x);
        let shape = (-HALF_MAX_EXPONENT * u.powi(2)).exp();
        let y = self.height * shape;
        let d_center = -4.0 * HALF_MAX_EXPONENT * u * y / self.width;
        let d_width = 2.0 * HALF_MAX_EXPONENT * u.powi(2) * y / self.width;
        [d_center, d_width, shape]
    }
}

impl PeakShapeModel for GaussianPeakShape {
    fn from_params(params: [f64; N_PARAMS]) -> Self {
        Self::new(params[0], params[1], params[2])
    }

    fn params(&self) -> [f64; N_PARAMS] {
        [self.center, self.width, self.height]
    }

    fn density(&self, x: f64) -> f64 {
        self.density(x)
    }

    fn jacobian(&self, x: f64) -> [f64; N_PARAMS] {
        self.jacobian(x)
    }
}
