use crate::error::Result;
use crate::plot::render_error;
use plotters::coord::Shift;
use plotters::prelude::*;

// hue of the last color of the map (magenta)
const MAX_HUE: f64 = 0.83;
const STEPS: usize = 64;

/// Continuous rainbow colormap (red, yellow, green, cyan, blue, magenta)
/// normalized over `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colormap {
    min: f64,
    max: f64,
}

impl Colormap {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Colormap spanning all `values`. With no values, it spans `[0, 1]`.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
                (min.min(value), max.max(value))
            });
        if min > max {
            Self::new(0.0, 1.0)
        } else {
            Self::new(min, max)
        }
    }

    /// Position of `value` in the map, clamped to `[0, 1]`. All values map to
    /// the start of the map if it spans a single value.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color(&self, value: f64) -> HSLColor {
        HSLColor(MAX_HUE * self.normalize(value), 1.0, 0.5)
    }

    /// Draws a vertical color scale, with `min` at the bottom and `max` at the
    /// top, labeled with the values it spans.
    pub fn draw_scale<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<()> {
        let (low, high) = if self.max > self.min {
            (self.min, self.max)
        } else {
            (self.min - 0.5, self.min + 0.5)
        };
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(40)
            .build_cartesian_2d(0f64..1f64, low..high)
            .map_err(render_error)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .disable_x_axis()
            .y_labels(5)
            .draw()
            .map_err(render_error)?;

        let step = (high - low) / STEPS as f64;
        chart
            .draw_series((0..STEPS).map(|i| {
                let bottom = low + step * i as f64;
                let top = bottom + step;
                let color = self.color((bottom + top) / 2.0);
                Rectangle::new([(0.0, bottom), (1.0, top)], color.filled())
            }))
            .map_err(render_error)?;
        Ok(())
    }
}
