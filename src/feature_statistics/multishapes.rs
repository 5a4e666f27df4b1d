use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{GaussianPeakShape, LorentzianPeakShape};

/// The peak shape used to derive the signal height and noise window
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LineShape {
    #[default]
    Gaussian,
    Lorentzian,
}

impl LineShape {
    pub const fn name(&self) -> &'static str {
        match self {
            LineShape::Gaussian => "gaussian",
            LineShape::Lorentzian => "lorentzian",
        }
    }
}

impl Display for LineShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown line shape {0:?}, expected \"gaussian\" or \"lorentzian\"")]
pub struct ParseLineShapeError(pub String);

impl FromStr for LineShape {
    type Err = ParseLineShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaussian" => Ok(LineShape::Gaussian),
            "lorentzian" => Ok(LineShape::Lorentzian),
            _ => Err(ParseLineShapeError(s.to_string())),
        }
    }
}

/// A dispatching peak shape model that can represent either supported peak shape.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PeakShape {
    Gaussian(GaussianPeakShape),
    Lorentzian(LorentzianPeakShape),
}

macro_rules! dispatch_peak {
    ($d:ident, $r:ident, $e:expr) => {
        match $d {
            PeakShape::Gaussian($r) => $e,
            PeakShape::Lorentzian($r) => $e,
        }
    };
}

impl From<GaussianPeakShape> for PeakShape {
    fn from(value: GaussianPeakShape) -> Self {
        Self::Gaussian(value)
    }
}

impl From<LorentzianPeakShape> for PeakShape {
    fn from(value: LorentzianPeakShape) -> Self {
        Self::Lorentzian(value)
    }
}

impl PeakShape {
    pub fn line_shape(&self) -> LineShape {
        match self {
            PeakShape::Gaussian(_) => LineShape::Gaussian,
            PeakShape::Lorentzian(_) => LineShape::Lorentzian,
        }
    }

    /// Compute the theoretical intensity at a specified coordinate
    pub fn density(&self, x: f64) -> f64 {
        dispatch_peak!(self, p, p.density(x))
    }

    pub fn center(&self) -> f64 {
        dispatch_peak!(self, p, p.center)
    }

    /// The fitted width, which may carry either sign
    pub fn width(&self) -> f64 {
        dispatch_peak!(self, p, p.width)
    }

    pub fn height(&self) -> f64 {
        dispatch_peak!(self, p, p.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_line_shape() {
        assert_eq!("gaussian".parse::<LineShape>().unwrap(), LineShape::Gaussian);
        assert_eq!(
            " Lorentzian".parse::<LineShape>().unwrap(),
            LineShape::Lorentzian
        );
        let err = "voigt".parse::<LineShape>().unwrap_err();
        assert_eq!(err, ParseLineShapeError("voigt".into()));
        assert_eq!(LineShape::default(), LineShape::Gaussian);
        assert_eq!(LineShape::Lorentzian.to_string(), "lorentzian");
    }

    #[test]
    fn test_dispatch() {
        let shape = PeakShape::from(LorentzianPeakShape::new(2.0, -0.4, 8.0));
        assert_eq!(shape.line_shape(), LineShape::Lorentzian);
        assert_eq!(shape.center(), 2.0);
        assert_eq!(shape.width(), -0.4);
        assert_eq!(shape.density(2.0), 8.0);
    }
}
