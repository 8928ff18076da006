use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_WINDOW_MS;
use crate::error::{PlotError, PlotResult};
use crate::render::Color;

pub const DEFAULT_REDRAW_INTERVAL_MS: u64 = 1_000 / 60;
pub const DEFAULT_RANGE_BUFFER: f64 = 1.0;
pub const DEFAULT_POINT_RADIUS_PX: f64 = 10.0;

/// Pixel geometry of the axis gutters around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotLayout {
    /// Outer margin on every side of the canvas.
    pub gutter_px: f64,
    /// Width of the value-axis strip and height of the time-axis strip.
    pub axis_size_px: f64,
    pub tick_length_px: f64,
    pub text_padding_px: f64,
    pub label_font_size_px: f64,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            gutter_px: 50.0,
            axis_size_px: 200.0,
            tick_length_px: 24.0,
            text_padding_px: 10.0,
            label_font_size_px: 48.0,
        }
    }
}

/// Axis, label and grid styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    pub time_axis_title: String,
    pub value_axis_title: String,
    pub axis_color: Color,
    pub label_color: Color,
    pub grid_color: Color,
    pub axis_line_width_px: f64,
    pub grid_line_width_px: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            time_axis_title: "Time (ms)".to_owned(),
            value_axis_title: "Data".to_owned(),
            axis_color: Color::GRAY,
            label_color: Color::DARK_GRAY,
            grid_color: Color::LIGHT_GRAY,
            axis_line_width_px: 2.0,
            grid_line_width_px: 1.0,
        }
    }
}

/// Chart configuration.
///
/// Serializable so hosts can keep chart setup next to their own settings.
/// Missing fields fall back to defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Window used for series created through the host.
    pub window_ms: i64,
    pub redraw_interval_ms: u64,
    /// Padding added above and below each series' value range.
    pub range_buffer: f64,
    pub point_radius_px: f64,
    pub connector_width_px: f64,
    pub show_legend: bool,
    pub layout: PlotLayout,
    pub style: PlotStyle,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            redraw_interval_ms: DEFAULT_REDRAW_INTERVAL_MS,
            range_buffer: DEFAULT_RANGE_BUFFER,
            point_radius_px: DEFAULT_POINT_RADIUS_PX,
            connector_width_px: 3.0,
            show_legend: false,
            layout: PlotLayout::default(),
            style: PlotStyle::default(),
        }
    }
}

impl PlotConfig {
    #[must_use]
    pub fn with_window_ms(mut self, window_ms: i64) -> Self {
        self.window_ms = window_ms;
        self
    }

    #[must_use]
    pub fn with_redraw_interval_ms(mut self, redraw_interval_ms: u64) -> Self {
        self.redraw_interval_ms = redraw_interval_ms;
        self
    }

    #[must_use]
    pub fn with_range_buffer(mut self, range_buffer: f64) -> Self {
        self.range_buffer = range_buffer;
        self
    }

    #[must_use]
    pub fn with_point_radius_px(mut self, point_radius_px: f64) -> Self {
        self.point_radius_px = point_radius_px;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: PlotLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: PlotStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_legend(mut self, show_legend: bool) -> Self {
        self.show_legend = show_legend;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if self.window_ms <= 0 {
            return Err(PlotError::InvalidConfig(
                "window must be > 0 ms".to_owned(),
            ));
        }
        if self.redraw_interval_ms == 0 {
            return Err(PlotError::InvalidConfig(
                "redraw interval must be > 0 ms".to_owned(),
            ));
        }
        if !self.range_buffer.is_finite() || self.range_buffer < 0.0 {
            return Err(PlotError::InvalidConfig(
                "range buffer must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("point radius", self.point_radius_px),
            ("connector width", self.connector_width_px),
            ("label font size", self.layout.label_font_size_px),
            ("axis line width", self.style.axis_line_width_px),
            ("grid line width", self.style.grid_line_width_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "{name} must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("gutter", self.layout.gutter_px),
            ("axis size", self.layout.axis_size_px),
            ("tick length", self.layout.tick_length_px),
            ("text padding", self.layout.text_padding_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        for color in [
            self.style.axis_color,
            self.style.label_color,
            self.style.grid_color,
        ] {
            color
                .validate()
                .map_err(|err| PlotError::InvalidConfig(err.to_string()))?;
        }
        Ok(())
    }

    pub fn from_json_str(input: &str) -> PlotResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| PlotError::InvalidConfig(format!("failed to parse plot config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> PlotResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            PlotError::InvalidConfig(format!("failed to serialize plot config: {e}"))
        })
    }
}

/// Colors used for the raw series and its mean and variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPalette {
    pub raw: Color,
    pub mean: Color,
    pub variance: Color,
}

impl Default for SeriesPalette {
    fn default() -> Self {
        Self {
            raw: Color::rgb8(0x23, 0xaf, 0x00),
            mean: Color::rgb8(0x26, 0x55, 0xff),
            variance: Color::rgb8(0xff, 0xe7, 0x32),
        }
    }
}
