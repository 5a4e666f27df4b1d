use super::{PeakShapeModel, N_PARAMS};

mod gaussian;
mod lorentzian;

pub use gaussian::{GaussianPeakShape, HALF_MAX_EXPONENT};
pub use lorentzian::LorentzianPeakShape;
