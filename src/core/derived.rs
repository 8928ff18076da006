use serde::{Deserialize, Serialize};

use crate::core::{DataPoint, SeriesSnapshot, TimeSeries, TimeSeriesListener, Timestamp};

/// Aggregate of a parent series that a derived series records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedStatistic {
    Mean,
    Variance,
}

impl DerivedStatistic {
    #[must_use]
    pub fn sample(self, stats: &SeriesSnapshot) -> f64 {
        match self {
            Self::Mean => stats.mean,
            Self::Variance => stats.variance,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Variance => "variance",
        }
    }
}

/// Listener installed on a parent by [`TimeSeries::derive`].
///
/// Holds the derived series strongly; the derived series only keeps a weak
/// link back to the parent, so the parent owns the chain.
pub(crate) struct DerivedSeriesListener {
    target: TimeSeries,
    statistic: DerivedStatistic,
}

impl DerivedSeriesListener {
    pub(crate) fn new(target: TimeSeries, statistic: DerivedStatistic) -> Self {
        Self { target, statistic }
    }
}

impl TimeSeriesListener for DerivedSeriesListener {
    fn point_added(
        &self,
        _source: &TimeSeries,
        point: DataPoint,
        stats: &SeriesSnapshot,
        now: Timestamp,
    ) {
        let value = self.statistic.sample(stats);
        self.target
            .add_point(DataPoint::new(value, point.timestamp), now);
    }
}
