pub mod clock;
pub mod derived;
pub mod interval;
pub mod time_series;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use derived::DerivedStatistic;
pub use interval::Interval;
pub use time_series::{
    DEFAULT_SERIES_TITLE, DEFAULT_WINDOW_MS, ListenerId, SeriesSnapshot, TimeSeries,
    TimeSeriesListener,
};
pub use types::{DataPoint, Timestamp, Viewport};
