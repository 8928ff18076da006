mod config;
mod layout;
mod mapping;
mod renderer;
mod ticks;

pub use config::{
    DEFAULT_POINT_RADIUS_PX, DEFAULT_RANGE_BUFFER, DEFAULT_REDRAW_INTERVAL_MS, PlotConfig,
    PlotLayout, PlotStyle, SeriesPalette,
};
pub use layout::{PlotAreas, Rect};
pub use mapping::AxisMapping;
pub use renderer::{PlotRenderer, PlotSeriesEntry, SeriesEntryId};
pub use ticks::generate_ticks;
