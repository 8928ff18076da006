//! sensor-plot: live windowed time series with derived statistics, rendered
//! as an auto-scaling strip chart.
//!
//! Samples flow into a [`core::TimeSeries`], which expires points older than
//! its window, keeps a running mean, and notifies listeners. Mean and
//! variance series derived from it are listeners themselves. A
//! [`plot::PlotRenderer`] turns any set of series into a backend-agnostic
//! [`render::RenderFrame`], and [`host::ChartHost`] repaints on a fixed
//! cadence so the chart keeps scrolling without new data.

pub mod core;
pub mod error;
pub mod host;
pub mod plot;
pub mod render;
pub mod telemetry;

pub use core::{DataPoint, Interval, TimeSeries};
pub use error::{PlotError, PlotResult};
pub use plot::{PlotConfig, PlotRenderer};
