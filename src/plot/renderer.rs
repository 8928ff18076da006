use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Interval, TimeSeries, Timestamp, Viewport};
use crate::error::PlotResult;
use crate::plot::{AxisMapping, PlotAreas, PlotConfig, generate_ticks};
use crate::render::{
    CirclePrimitive, Color, LinePrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive,
};

/// Rotation applied to the value-axis title so it reads bottom-to-top.
const VALUE_AXIS_TITLE_ROTATION_DEG: f64 = 270.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesEntryId(u64);

/// A series registered for plotting. The renderer only reads the series.
#[derive(Debug, Clone)]
pub struct PlotSeriesEntry {
    pub series: TimeSeries,
    pub color: Color,
}

/// Multi-series strip chart.
///
/// Every frame recomputes the shared domain and range from the registered
/// series, lays out both axes with their ticks, and plots each series in
/// registration order so later series are drawn on top.
#[derive(Debug)]
pub struct PlotRenderer {
    config: PlotConfig,
    viewport: Viewport,
    entries: IndexMap<SeriesEntryId, PlotSeriesEntry>,
    next_entry_id: u64,
}

impl PlotRenderer {
    pub fn new(viewport: Viewport, config: PlotConfig) -> PlotResult<Self> {
        config.validate()?;
        PlotAreas::resolve(viewport, config.layout)?;
        Ok(Self {
            config,
            viewport,
            entries: IndexMap::new(),
            next_entry_id: 0,
        })
    }

    #[must_use]
    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Resizes the canvas. The layout must still leave room for the plot area.
    pub fn set_viewport(&mut self, viewport: Viewport) -> PlotResult<()> {
        PlotAreas::resolve(viewport, self.config.layout)?;
        self.viewport = viewport;
        Ok(())
    }

    pub fn add_series(&mut self, series: TimeSeries, color: Color) -> PlotResult<SeriesEntryId> {
        color.validate()?;
        let id = SeriesEntryId(self.next_entry_id);
        self.next_entry_id += 1;
        debug!(series = %series.title(), ?id, "add plot series");
        self.entries.insert(id, PlotSeriesEntry { series, color });
        Ok(id)
    }

    /// Removes a series, keeping the draw order of the others.
    pub fn remove_series(&mut self, id: SeriesEntryId) -> Option<PlotSeriesEntry> {
        let removed = self.entries.shift_remove(&id);
        if removed.is_some() {
            debug!(?id, "remove plot series");
        }
        removed
    }

    #[must_use]
    pub fn series_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (SeriesEntryId, &PlotSeriesEntry)> {
        self.entries.iter().map(|(id, entry)| (*id, entry))
    }

    /// Union of every series' `[0, window]` domain, or the empty sentinel
    /// when nothing is registered.
    #[must_use]
    pub fn compute_domain(&self) -> Interval<i64> {
        self.entries
            .values()
            .fold(Interval::<i64>::EMPTY, |acc, entry| {
                acc.union(entry.series.domain())
            })
    }

    /// Union of every series' value range widened by the range buffer.
    /// Series without data contribute nothing.
    #[must_use]
    pub fn compute_range(&self) -> Interval<f64> {
        let buffer = self.config.range_buffer;
        self.entries
            .values()
            .fold(Interval::<f64>::EMPTY, |acc, entry| {
                acc.union(entry.series.range().padded(buffer))
            })
    }

    /// Coordinate mapping for the current data.
    pub fn axis_mapping(&self) -> PlotResult<AxisMapping> {
        let areas = PlotAreas::resolve(self.viewport, self.config.layout)?;
        Ok(AxisMapping::new(
            areas.plot,
            self.compute_domain().to_f64(),
            self.compute_range(),
        ))
    }

    /// Lays out a complete frame as seen at `now`.
    pub fn build_frame(&self, now: Timestamp) -> PlotResult<RenderFrame> {
        let areas = PlotAreas::resolve(self.viewport, self.config.layout)?;
        let domain = self.compute_domain().to_f64();
        let range = self.compute_range();
        let mapping = AxisMapping::new(areas.plot, domain, range);

        let mut frame = RenderFrame::new(self.viewport);
        self.draw_time_axis(&mut frame, &areas, &mapping);
        self.draw_value_axis(&mut frame, &areas, &mapping);
        let plotted = self.draw_series(&mut frame, &mapping, now);
        if self.config.show_legend {
            self.draw_legend(&mut frame, &areas);
        }

        trace!(
            now,
            series = self.entries.len(),
            plotted,
            commands = frame.commands.len(),
            "build frame"
        );
        Ok(frame)
    }

    pub fn render_frame<R: Renderer + ?Sized>(
        &self,
        now: Timestamp,
        renderer: &mut R,
    ) -> PlotResult<()> {
        let frame = self.build_frame(now)?;
        renderer.render(&frame)
    }

    fn draw_time_axis(&self, frame: &mut RenderFrame, areas: &PlotAreas, mapping: &AxisMapping) {
        let style = &self.config.style;
        let layout = &self.config.layout;
        let axis = areas.axis_x;
        frame.push_line(LinePrimitive::new(
            axis.left,
            axis.top,
            axis.right,
            axis.top,
            style.axis_line_width_px,
            style.axis_color,
        ));

        let domain = mapping.domain();
        if !domain.is_empty() {
            let labels = with_bounds(domain, generate_ticks(domain.min, domain.max));
            for age in labels {
                let x = mapping.map_x(age);
                frame.push_line(LinePrimitive::new(
                    x,
                    areas.plot.top,
                    x,
                    areas.plot.bottom + layout.tick_length_px,
                    style.grid_line_width_px,
                    style.grid_color,
                ));
                frame.push_text(TextPrimitive::new(
                    format_age_label(age),
                    x,
                    axis.top + layout.tick_length_px + layout.text_padding_px
                        + layout.label_font_size_px,
                    layout.label_font_size_px,
                    style.label_color,
                    TextHAlign::Center,
                ));
            }
        }

        push_title(
            frame,
            &style.time_axis_title,
            axis.center_x(),
            axis.bottom,
            layout.label_font_size_px,
            style.label_color,
            0.0,
        );
    }

    fn draw_value_axis(&self, frame: &mut RenderFrame, areas: &PlotAreas, mapping: &AxisMapping) {
        let style = &self.config.style;
        let layout = &self.config.layout;
        let axis = areas.axis_y;
        frame.push_line(LinePrimitive::new(
            axis.right,
            axis.top,
            axis.right,
            axis.bottom,
            style.axis_line_width_px,
            style.axis_color,
        ));

        let range = mapping.range();
        if !range.is_empty() {
            let ticks = generate_ticks(range.min.floor(), range.max.ceil());
            let labels = with_bounds(range, ticks);
            for value in labels {
                let y = mapping.map_y(value);
                frame.push_line(LinePrimitive::new(
                    areas.plot.left - layout.tick_length_px,
                    y,
                    areas.plot.right,
                    y,
                    style.grid_line_width_px,
                    style.grid_color,
                ));
                frame.push_text(TextPrimitive::new(
                    format_value_label(value),
                    axis.right - layout.tick_length_px - layout.text_padding_px,
                    y + layout.label_font_size_px / 2.0,
                    layout.label_font_size_px,
                    style.label_color,
                    TextHAlign::Right,
                ));
            }
        }

        push_title(
            frame,
            &style.value_axis_title,
            axis.left,
            axis.center_y(),
            layout.label_font_size_px,
            style.label_color,
            VALUE_AXIS_TITLE_ROTATION_DEG,
        );
    }

    /// Plots markers and connectors. A point older than its series' window
    /// is skipped and breaks the connector chain, so no line ever spans an
    /// expiry gap. Returns the number of markers drawn.
    fn draw_series(&self, frame: &mut RenderFrame, mapping: &AxisMapping, now: Timestamp) -> usize {
        let mut plotted = 0;
        for entry in self.entries.values() {
            let oldest_visible = now.saturating_sub(entry.series.window_ms());
            let mut previous: Option<(f64, f64)> = None;

            for point in entry.series.data() {
                if point.timestamp < oldest_visible {
                    previous = None;
                    continue;
                }

                let x = mapping.map_x(point.age_ms(now) as f64);
                let y = mapping.map_y(point.value);
                frame.push_circle(CirclePrimitive::new(
                    x,
                    y,
                    self.config.point_radius_px,
                    entry.color,
                ));
                if let Some((previous_x, previous_y)) = previous {
                    frame.push_line(LinePrimitive::new(
                        previous_x,
                        previous_y,
                        x,
                        y,
                        self.config.connector_width_px,
                        entry.color,
                    ));
                }
                previous = Some((x, y));
                plotted += 1;
            }
        }
        plotted
    }

    fn draw_legend(&self, frame: &mut RenderFrame, areas: &PlotAreas) {
        let layout = &self.config.layout;
        let mut baseline = areas.plot.top + layout.text_padding_px;
        for entry in self.entries.values() {
            baseline += layout.label_font_size_px;
            if entry.series.title().is_empty() {
                continue;
            }
            frame.push_text(TextPrimitive::new(
                entry.series.title(),
                areas.plot.right - layout.text_padding_px,
                baseline,
                layout.label_font_size_px,
                entry.color,
                TextHAlign::Right,
            ));
        }
    }
}

/// Skips empty titles, which would fail frame validation.
fn push_title(
    frame: &mut RenderFrame,
    title: &str,
    x: f64,
    y: f64,
    font_size_px: f64,
    color: Color,
    rotation_deg: f64,
) {
    if title.is_empty() {
        return;
    }
    frame.push_text(
        TextPrimitive::new(title, x, y, font_size_px, color, TextHAlign::Center)
            .rotated(rotation_deg),
    );
}

/// Bound labels first, then every tick inside the interval that does not
/// coincide with a bound.
fn with_bounds(interval: Interval<f64>, ticks: Vec<f64>) -> Vec<f64> {
    let mut labels = Vec::with_capacity(ticks.len() + 2);
    labels.push(interval.min);
    if interval.max != interval.min {
        labels.push(interval.max);
    }
    labels.extend(ticks.into_iter().filter(|tick| {
        interval.contains(*tick) && *tick != interval.min && *tick != interval.max
    }));
    labels
}

fn format_age_label(age_ms: f64) -> String {
    let rounded = age_ms.round();
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("-{rounded:.0}")
    }
}

fn format_value_label(value: f64) -> String {
    let rounded = value.round();
    if rounded == 0.0 {
        "0".to_owned()
    } else {
        format!("{rounded:.0}")
    }
}
