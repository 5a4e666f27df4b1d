//! Render [`SnrDiagnostic`] figures with `plotters`.
use std::error::Error;
use std::path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::diagnostics::{DiagnosticRenderer, SnrDiagnostic, LEGEND, X_LABEL, Y_LABEL};

/// Draws the experimental trace and both fitted curves.
///
/// Paths ending in `.svg` are written as SVG, anything else as a raster image
/// whose format follows the extension. Without a path, the figure is drawn
/// into [`PlottersRenderer::last_frame`] as an RGB buffer.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    pub size: (u32, u32),
    pub last_frame: Vec<u8>,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            size: (640, 480),
            last_frame: Vec::new(),
        }
    }
}

impl PlottersRenderer {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            last_frame: Vec::new(),
        }
    }
}

impl DiagnosticRenderer for PlottersRenderer {
    fn render(&mut self, diagnostic: &SnrDiagnostic<'_>) -> Result<(), Box<dyn Error>> {
        match diagnostic.path {
            Some(path) => draw_file(diagnostic, path, self.size),
            None => {
                let (width, height) = self.size;
                let mut buffer = vec![0u8; width as usize * height as usize * 3];
                {
                    let backend = BitMapBackend::with_buffer(&mut buffer, self.size);
                    draw_on(diagnostic, backend.into_drawing_area())?;
                }
                self.last_frame = buffer;
                Ok(())
            }
        }
    }
}

pub fn draw_file<P>(
    diagnostic: &SnrDiagnostic<'_>,
    path: P,
    size: (u32, u32),
) -> Result<(), Box<dyn Error>>
where
    P: AsRef<path::Path>,
{
    let is_svg = path
        .as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("svg"))
        .unwrap_or_default();
    log::debug!("Writing diagnostic figure to {}", path.as_ref().display());
    if is_svg {
        let backend = SVGBackend::new(&path, size);
        draw_on(diagnostic, backend.into_drawing_area())
    } else {
        let backend = BitMapBackend::new(&path, size);
        draw_on(diagnostic, backend.into_drawing_area())
    }
}

pub fn draw_on<DB>(
    diagnostic: &SnrDiagnostic<'_>,
    root: DrawingArea<DB, Shift>,
) -> Result<(), Box<dyn Error>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (xmin, xmax) = diagnostic.x_range();
    let (ymin, ymax) = diagnostic.y_range();

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(diagnostic.caption(), ("sans-serif", 20).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(xmin..xmax, ymin..ymax)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(X_LABEL)
        .axis_desc_style(("sans-serif", 16).into_font())
        .y_desc(Y_LABEL)
        .draw()?;

    let curves = [
        (diagnostic.intensity.to_vec(), BLACK),
        (diagnostic.lorentzian_curve(), RED),
        (diagnostic.gaussian_curve(), BLUE),
    ];

    for ((ys, color), label) in curves.into_iter().zip(LEGEND) {
        let points: Vec<(f64, f64)> = diagnostic.time.iter().copied().zip(ys).collect();
        chart
            .draw_series(LineSeries::new(points, color.stroke_width(1)))?
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
            });
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE)
        .border_style(&WHITE)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::feature_statistics::{GaussianPeakShape, LorentzianPeakShape, PeakShapeModel};

    #[test]
    fn test_render_to_buffer() -> Result<(), Box<dyn Error>> {
        let time: Vec<f64> = (300..700).map(|i| i as f64 / 100.0).collect();
        let gaussian = GaussianPeakShape::new(5.0, 0.5, 100.0);
        let intensity = gaussian.predict(&time);
        let diagnostic = SnrDiagnostic {
            time: &time,
            intensity: &intensity,
            lorentzian: LorentzianPeakShape::new(5.0, 0.45, 98.0),
            gaussian,
            signal_to_noise: 20.0,
            title: "Synthetic",
            path: None,
        };
        let mut renderer = PlottersRenderer::new((320, 240));
        renderer.render(&diagnostic)?;
        assert_eq!(renderer.last_frame.len(), 320 * 240 * 3);
        assert!(renderer.last_frame.iter().any(|b| *b != 255));
        Ok(())
    }
}
