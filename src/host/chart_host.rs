use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::core::{Clock, TimeSeries};
use crate::error::PlotResult;
use crate::host::RedrawTicker;
use crate::plot::{PlotRenderer, SeriesEntryId, SeriesPalette};
use crate::render::{Color, Renderer};

struct HostState<R> {
    plot: PlotRenderer,
    renderer: R,
    frames_rendered: u64,
    failed_frames: u64,
}

/// Owns a plot and its drawing surface and repaints it on a fixed cadence,
/// whether or not new samples arrived, so the strip chart keeps scrolling.
///
/// Series are shared handles: ingestion may keep pushing into them from any
/// thread while the host redraws. Dropping the host stops its ticker.
pub struct ChartHost<R: Renderer + Send + 'static> {
    state: Arc<Mutex<HostState<R>>>,
    clock: Arc<dyn Clock>,
    redraw_interval: Duration,
    ticker: Option<RedrawTicker>,
}

impl<R: Renderer + Send + 'static> ChartHost<R> {
    #[must_use]
    pub fn new(plot: PlotRenderer, renderer: R, clock: Arc<dyn Clock>) -> Self {
        let redraw_interval = Duration::from_millis(plot.config().redraw_interval_ms);
        Self {
            state: Arc::new(Mutex::new(HostState {
                plot,
                renderer,
                frames_rendered: 0,
                failed_frames: 0,
            })),
            clock,
            redraw_interval,
            ticker: None,
        }
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub fn redraw_interval(&self) -> Duration {
        self.redraw_interval
    }

    /// Creates an unregistered series using the configured window.
    pub fn create_series(&self, title: impl Into<String>) -> PlotResult<TimeSeries> {
        let window_ms = lock(&self.state).plot.config().window_ms;
        TimeSeries::with_window(title, window_ms)
    }

    pub fn add_series(&self, series: TimeSeries, color: Color) -> PlotResult<SeriesEntryId> {
        lock(&self.state).plot.add_series(series, color)
    }

    pub fn remove_series(&self, id: SeriesEntryId) -> bool {
        lock(&self.state).plot.remove_series(id).is_some()
    }

    /// Creates a raw series plus its mean and variance series and plots all
    /// three. Returns the raw series, which is where samples go.
    pub fn add_sensor_series(
        &self,
        title: impl Into<String>,
        palette: SeriesPalette,
    ) -> PlotResult<TimeSeries> {
        let raw = self.create_series(title)?;
        let mean = raw.derive_mean();
        let variance = raw.derive_variance();

        let mut state = lock(&self.state);
        state.plot.add_series(raw.clone(), palette.raw)?;
        state.plot.add_series(mean, palette.mean)?;
        state.plot.add_series(variance, palette.variance)?;
        debug!(series = %raw.title(), "add sensor series");
        Ok(raw)
    }

    /// Paints one frame at the clock's current time.
    pub fn redraw_now(&self) -> PlotResult<()> {
        redraw(&self.state, self.clock.as_ref())
    }

    /// Starts the periodic redraw. Does nothing when already running.
    pub fn start(&mut self) -> PlotResult<()> {
        if self.is_running() {
            return Ok(());
        }
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let ticker = RedrawTicker::spawn(self.redraw_interval, move || {
            if let Err(err) = redraw(&state, clock.as_ref()) {
                warn!(error = %err, "scheduled redraw failed");
            }
        })?;
        self.ticker = Some(ticker);
        Ok(())
    }

    /// Cancels the periodic redraw and waits for an in-flight frame.
    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(RedrawTicker::is_running)
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        lock(&self.state).frames_rendered
    }

    #[must_use]
    pub fn failed_frames(&self) -> u64 {
        lock(&self.state).failed_frames
    }

    pub fn with_plot<T>(&self, f: impl FnOnce(&mut PlotRenderer) -> T) -> T {
        f(&mut lock(&self.state).plot)
    }

    pub fn with_renderer<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut lock(&self.state).renderer)
    }
}

impl<R: Renderer + Send + 'static> Drop for ChartHost<R> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn redraw<R: Renderer>(state: &Mutex<HostState<R>>, clock: &dyn Clock) -> PlotResult<()> {
    let now = clock.now_ms();
    let mut guard = lock(state);
    let state = &mut *guard;
    match state.plot.render_frame(now, &mut state.renderer) {
        Ok(()) => {
            state.frames_rendered += 1;
            Ok(())
        }
        Err(err) => {
            state.failed_frames += 1;
            Err(err)
        }
    }
}

fn lock<R>(state: &Mutex<HostState<R>>) -> MutexGuard<'_, HostState<R>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
