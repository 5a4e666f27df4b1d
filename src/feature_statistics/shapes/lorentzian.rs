#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{PeakShapeModel, N_PARAMS};

/// Lorentzian peak shape model parameterized by its full width at half maximum
///
/// ```math
/// y = \frac{h}{1 + \left(\frac{2(c - x)}{w}\right)^2}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LorentzianPeakShape {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

impl LorentzianPeakShape {
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
        self.height / (1.0 + u.powi(2))
    }

    /// Compute the partial derivatives w.r.t. center $`c`$, width $`w`$ and height $`h`$
    ///
    /// ```math
    /// \frac{\partial y}{\partial c} = -\frac{4 h u}{w (1 + u^2)^2} \quad
    /// \frac{\partial y}{\partial w} = \frac{2 h u^2}{w (1 + u^2)^2} \quad
    /// \frac{\partial y}{\partial h} = \frac{1}{1 + u^2}
    /// ```
    ///
    /// where $`u = 2(c - x) / w`$
    pub fn jacobian(&self, x: f64) -> [f64; N_PARAMS] {
        let u = self.scaled_offset(x);
        let denom = 1.0 + u.powi(2);
        let shape = 1.0 / denom;
        let scale = self.height / (self.width * denom.powi(2));
        [-4.0 * u * scale, 2.0 * u.powi(2) * scale, shape]
    }
}

impl PeakShapeModel for LorentzianPeakShape {
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
