use crate::feature_statistics::{GaussianPeakShape, PeakShapeModel};

/// A synthetic chromatographic run with a blank injection
#[derive(Debug, Clone)]
pub struct Chromatogram {
    pub time: Vec<f64>,
    pub signal: Vec<f64>,
    pub noise: Vec<f64>,
}

/// A Gaussian peak at 5.0 min with a width of 0.5 min and a height of 100 sampled
/// every 0.01 min over 0-10 min.
///
/// The blank trace is flat except for a +6 spike at 4.5 min and a -4 spike at 5.5 min,
/// for a peak-to-peak noise of 10, plus a large spike on the very last sample which
/// lies just outside the end-exclusive noise window.
pub fn chromatogram() -> Chromatogram {
    let time: Vec<f64> = (0..=1000).map(|i| i as f64 / 100.0).collect();
    let signal = GaussianPeakShape::new(5.0, 0.5, 100.0).predict(&time);
    let mut noise = vec![0.0; time.len()];
    noise[450] = 6.0;
    noise[550] = -4.0;
    noise[1000] = 500.0;
    Chromatogram {
        time,
        signal,
        noise,
    }
}
