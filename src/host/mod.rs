mod chart_host;
mod ticker;

pub use chart_host::ChartHost;
pub use ticker::RedrawTicker;
