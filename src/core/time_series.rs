use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::core::derived::{DerivedSeriesListener, DerivedStatistic};
use crate::core::{Clock, DataPoint, Interval, Timestamp};
use crate::error::{PlotError, PlotResult};

pub const DEFAULT_WINDOW_MS: i64 = 5_000;
pub const DEFAULT_SERIES_TITLE: &str = "Data";

/// Observer notified after every accepted point.
///
/// `stats` are the aggregates of `source` taken in the same critical section
/// that added `point` and expired stale samples, so they stay tied to this
/// point even when other threads keep writing to `source`. No series lock is
/// held while this runs, so implementations may read `source` or push into
/// other series freely.
pub trait TimeSeriesListener: Send + Sync {
    fn point_added(
        &self,
        source: &TimeSeries,
        point: DataPoint,
        stats: &SeriesSnapshot,
        now: Timestamp,
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(u64);

/// Consistent view of a series' aggregates, taken under one lock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesSnapshot {
    pub len: usize,
    pub mean: f64,
    pub variance: f64,
    pub range: Interval<f64>,
}

#[derive(Debug)]
struct SeriesState {
    points: VecDeque<DataPoint>,
    mean: f64,
}

impl SeriesState {
    fn new() -> Self {
        Self {
            points: VecDeque::new(),
            mean: 0.0,
        }
    }

    fn push(&mut self, point: DataPoint) {
        self.points.push_back(point);
        let n = self.points.len();
        if n == 1 {
            self.mean = point.value;
            return;
        }
        let n = n as f64;
        self.mean = self.mean * (n - 1.0) / n + point.value / n;
    }

    /// Drops every point older than `threshold`, wherever it sits in the
    /// sequence. Returns the number of expired points.
    ///
    /// Each removal walks the mean back incrementally; a call that removed
    /// anything then recomputes it from the retained points, since the
    /// inverse step cancels badly once a large outlier leaves the window.
    fn expire_before(&mut self, threshold: Timestamp) -> usize {
        let mut expired = 0;
        let mut index = 0;
        while index < self.points.len() {
            if self.points[index].timestamp >= threshold {
                index += 1;
                continue;
            }
            if let Some(point) = self.points.remove(index) {
                self.remove_from_mean(point.value);
                expired += 1;
            }
        }
        if expired > 0 {
            self.resync_mean();
        }
        expired
    }

    fn remove_from_mean(&mut self, value: f64) {
        match self.points.len() {
            0 => self.mean = 0.0,
            1 => self.mean = self.points[0].value,
            n => {
                let n = n as f64;
                self.mean = self.mean * (n + 1.0) / n - value / n;
            }
        }
    }

    fn resync_mean(&mut self) {
        if self.points.is_empty() {
            self.mean = 0.0;
            return;
        }
        let sum: f64 = self.points.iter().map(|point| point.value).sum();
        self.mean = sum / self.points.len() as f64;
    }

    fn snapshot(&self) -> SeriesSnapshot {
        SeriesSnapshot {
            len: self.points.len(),
            mean: self.mean(),
            variance: self.variance(),
            range: self.range(),
        }
    }

    fn mean(&self) -> f64 {
        if self.points.is_empty() { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        let sum_of_squares: f64 = self.points.iter().map(|p| p.value * p.value).sum();
        let mean = self.mean();
        (sum_of_squares / self.points.len() as f64 - mean * mean).max(0.0)
    }

    fn range(&self) -> Interval<f64> {
        let min = self.points.iter().map(|p| OrderedFloat(p.value)).min();
        let max = self.points.iter().map(|p| OrderedFloat(p.value)).max();
        match (min, max) {
            (Some(min), Some(max)) => Interval::new(min.0, max.0),
            _ => Interval::<f64>::EMPTY,
        }
    }
}

struct ListenerEntry {
    id: ListenerId,
    listener: Arc<dyn TimeSeriesListener>,
}

/// Link from a derived series back to the series it observes.
struct Derivation {
    parent: Weak<SeriesShared>,
    statistic: DerivedStatistic,
    listener_id: ListenerId,
}

struct SeriesShared {
    title: String,
    window_ms: i64,
    derivation: Option<Derivation>,
    state: Mutex<SeriesState>,
    listeners: Mutex<Vec<ListenerEntry>>,
    next_listener_id: AtomicU64,
}

impl SeriesShared {
    fn new(title: String, window_ms: i64, derivation: Option<Derivation>) -> Self {
        Self {
            title,
            window_ms,
            derivation,
            state: Mutex::new(SeriesState::new()),
            listeners: Mutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }
}

/// Time-expiring sequence of samples with a running mean.
///
/// `TimeSeries` is a shared handle: clones observe and mutate the same
/// underlying series. Each public operation takes the series lock for its own
/// duration only, and listeners run after the lock is released. With several
/// writers on one series, derived series may receive points out of timestamp
/// order; each derived value still belongs to the point that produced it.
#[derive(Clone)]
pub struct TimeSeries {
    shared: Arc<SeriesShared>,
}

impl TimeSeries {
    /// Creates a series with the default 5 s window.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self::from_shared(SeriesShared::new(title.into(), DEFAULT_WINDOW_MS, None))
    }

    pub fn with_window(title: impl Into<String>, window_ms: i64) -> PlotResult<Self> {
        if window_ms <= 0 {
            return Err(PlotError::InvalidConfig(format!(
                "series window must be > 0 ms, got {window_ms}"
            )));
        }
        Ok(Self::from_shared(SeriesShared::new(
            title.into(),
            window_ms,
            None,
        )))
    }

    fn from_shared(shared: SeriesShared) -> Self {
        Self {
            shared: Arc::new(shared),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.shared.title
    }

    #[must_use]
    pub fn window_ms(&self) -> i64 {
        self.shared.window_ms
    }

    /// Returns `true` when both handles refer to the same series.
    #[must_use]
    pub fn same_series(&self, other: &TimeSeries) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Stamps `value` with `clock`'s current time and adds it.
    pub fn add_value(&self, value: f64, clock: &dyn Clock) {
        let now = clock.now_ms();
        self.add_point(DataPoint::new(value, now), now);
    }

    /// Appends `point`, expires everything older than `now - window`, then
    /// notifies listeners in registration order.
    ///
    /// A point that is already older than the expiry threshold is accepted,
    /// expired in the same call, and still reported to listeners exactly once.
    /// Non-finite values are dropped without notification.
    pub fn add_point(&self, point: DataPoint, now: Timestamp) {
        if !point.value.is_finite() {
            warn!(
                series = %self.shared.title,
                timestamp = point.timestamp,
                "dropping non-finite sample"
            );
            return;
        }
        let listeners = self.listener_snapshot();
        let threshold = now.saturating_sub(self.shared.window_ms);
        let (retained, expired, stats) = {
            let mut state = self.lock_state();
            state.push(point);
            let expired = state.expire_before(threshold);
            let stats = (!listeners.is_empty()).then(|| state.snapshot());
            (state.points.len(), expired, stats)
        };
        trace!(
            series = %self.shared.title,
            value = point.value,
            timestamp = point.timestamp,
            retained,
            expired,
            "add point"
        );
        if let Some(stats) = stats {
            for listener in listeners {
                listener.point_added(self, point, &stats, now);
            }
        }
    }

    /// Running mean of the retained points, `0.0` when empty.
    #[must_use]
    pub fn average(&self) -> f64 {
        self.lock_state().mean()
    }

    /// Population variance `mean(x²) - mean(x)²` of the retained points,
    /// `0.0` when empty.
    #[must_use]
    pub fn variance(&self) -> f64 {
        self.lock_state().variance()
    }

    /// Plotted time domain in milliseconds-before-now: always `[0, window]`.
    #[must_use]
    pub fn domain(&self) -> Interval<i64> {
        Interval::new(0, self.shared.window_ms)
    }

    /// Min/max of retained values, or [`Interval::EMPTY`] for an empty series.
    #[must_use]
    pub fn range(&self) -> Interval<f64> {
        self.lock_state().range()
    }

    /// Copy of the retained points in insertion order.
    #[must_use]
    pub fn data(&self) -> Vec<DataPoint> {
        self.lock_state().points.iter().copied().collect()
    }

    #[must_use]
    pub fn latest(&self) -> Option<DataPoint> {
        self.lock_state().points.back().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().points.is_empty()
    }

    #[must_use]
    pub fn snapshot(&self) -> SeriesSnapshot {
        self.lock_state().snapshot()
    }

    pub fn add_listener(&self, listener: Arc<dyn TimeSeriesListener>) -> ListenerId {
        let id = self.allocate_listener_id();
        self.insert_listener(id, listener);
        id
    }

    /// Unregisters a listener. Returns `true` when it was registered.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock_listeners();
        if let Some(position) = listeners.iter().position(|entry| entry.id == id) {
            listeners.remove(position);
            debug!(series = %self.shared.title, ?id, "remove listener");
            return true;
        }
        false
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock_listeners().len()
    }

    /// Creates a series fed with `statistic` of this series after every
    /// accepted point. The returned series is already registered as a
    /// listener and shares this series' window.
    #[must_use]
    pub fn derive(&self, statistic: DerivedStatistic) -> TimeSeries {
        let listener_id = self.allocate_listener_id();
        let derived = Self::from_shared(SeriesShared::new(
            format!("{} {}", self.shared.title, statistic.label()),
            self.shared.window_ms,
            Some(Derivation {
                parent: Arc::downgrade(&self.shared),
                statistic,
                listener_id,
            }),
        ));
        self.insert_listener(
            listener_id,
            Arc::new(DerivedSeriesListener::new(derived.clone(), statistic)),
        );
        debug!(
            parent = %self.shared.title,
            derived = %derived.shared.title,
            ?statistic,
            "derive series"
        );
        derived
    }

    #[must_use]
    pub fn derive_mean(&self) -> TimeSeries {
        self.derive(DerivedStatistic::Mean)
    }

    #[must_use]
    pub fn derive_variance(&self) -> TimeSeries {
        self.derive(DerivedStatistic::Variance)
    }

    /// Statistic this series is derived from, if any.
    #[must_use]
    pub fn statistic(&self) -> Option<DerivedStatistic> {
        self.shared.derivation.as_ref().map(|link| link.statistic)
    }

    /// Series this one is derived from, while it is still alive.
    #[must_use]
    pub fn parent(&self) -> Option<TimeSeries> {
        self.shared
            .derivation
            .as_ref()
            .and_then(|link| link.parent.upgrade())
            .map(|shared| TimeSeries { shared })
    }

    /// Stops this derived series from receiving further updates. Returns
    /// `false` for root series or when the parent is already gone.
    pub fn detach(&self) -> bool {
        let Some(link) = self.shared.derivation.as_ref() else {
            return false;
        };
        match self.parent() {
            Some(parent) => parent.remove_listener(link.listener_id),
            None => false,
        }
    }

    fn allocate_listener_id(&self) -> ListenerId {
        ListenerId(self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed))
    }

    fn insert_listener(&self, id: ListenerId, listener: Arc<dyn TimeSeriesListener>) {
        let mut listeners = self.lock_listeners();
        listeners.push(ListenerEntry { id, listener });
        debug!(
            series = %self.shared.title,
            ?id,
            count = listeners.len(),
            "add listener"
        );
    }

    /// Listeners registered right now, in registration order. A listener
    /// added while a point is being ingested first sees the next point.
    fn listener_snapshot(&self) -> SmallVec<[Arc<dyn TimeSeriesListener>; 4]> {
        self.lock_listeners()
            .iter()
            .map(|entry| Arc::clone(&entry.listener))
            .collect()
    }

    fn lock_state(&self) -> MutexGuard<'_, SeriesState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_listeners(&self) -> MutexGuard<'_, Vec<ListenerEntry>> {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::new(DEFAULT_SERIES_TITLE)
    }
}

impl fmt::Debug for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeSeries")
            .field("title", &self.shared.title)
            .field("window_ms", &self.shared.window_ms)
            .field("statistic", &self.statistic())
            .field("len", &self.len())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
