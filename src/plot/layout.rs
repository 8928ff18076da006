use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{PlotError, PlotResult};
use crate::plot::PlotLayout;

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        (self.left + self.right) / 2.0
    }

    #[must_use]
    pub fn center_y(self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Canvas split into the plot area and the two axis strips.
///
/// ```text
///  gutter
///  +--------+----------------------+
///  | axis_y |        plot          |
///  +--------+----------------------+
///           |        axis_x        |
///           +----------------------+
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotAreas {
    pub plot: Rect,
    pub axis_x: Rect,
    pub axis_y: Rect,
}

impl PlotAreas {
    pub fn resolve(viewport: Viewport, layout: PlotLayout) -> PlotResult<Self> {
        if !viewport.is_valid() {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        let x_start = layout.gutter_px;
        let y_start = layout.gutter_px;
        let x_end = f64::from(viewport.width) - layout.gutter_px;
        let y_end = f64::from(viewport.height) - layout.gutter_px;
        let plot_x_start = x_start + layout.axis_size_px;
        let plot_y_end = y_end - layout.axis_size_px;

        if plot_x_start >= x_end || y_start >= plot_y_end {
            return Err(PlotError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            plot: Rect::new(plot_x_start, y_start, x_end, plot_y_end),
            axis_x: Rect::new(plot_x_start, plot_y_end, x_end, y_end),
            axis_y: Rect::new(x_start, y_start, plot_x_start, plot_y_end),
        })
    }
}
