use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::debug;

use crate::error::{PlotError, PlotResult};

/// Background thread that invokes a callback at a fixed cadence until it is
/// stopped or dropped.
///
/// Each tick is scheduled `interval` after the previous callback returned, so
/// a slow callback delays the next tick instead of queueing ticks up.
#[derive(Debug)]
pub struct RedrawTicker {
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl RedrawTicker {
    pub fn spawn<F>(interval: Duration, mut on_tick: F) -> PlotResult<Self>
    where
        F: FnMut() + Send + 'static,
    {
        if interval.is_zero() {
            return Err(PlotError::InvalidConfig(
                "redraw interval must be > 0".to_owned(),
            ));
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("sensor-plot-redraw".to_owned())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => on_tick(),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
            .map_err(|err| PlotError::Backend(format!("failed to spawn redraw ticker: {err}")))?;

        debug!(interval_ms = interval.as_millis() as u64, "redraw ticker started");
        Ok(Self {
            interval,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancels future ticks and waits for the thread to exit. A tick that is
    /// already running completes first. Calling `stop` from inside the tick
    /// callback cancels without joining.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() != thread::current().id() {
            let _ = handle.join();
        }
        debug!("redraw ticker stopped");
    }
}

impl Drop for RedrawTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
