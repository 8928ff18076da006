use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One immutable scalar sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub value: f64,
    pub timestamp: Timestamp,
}

impl DataPoint {
    #[must_use]
    pub fn new(value: f64, timestamp: Timestamp) -> Self {
        Self { value, timestamp }
    }

    /// Stamps `value` with the current wall-clock time.
    #[must_use]
    pub fn now(value: f64) -> Self {
        Self::at(value, Utc::now())
    }

    #[must_use]
    pub fn at(value: f64, time: DateTime<Utc>) -> Self {
        Self {
            value,
            timestamp: time.timestamp_millis(),
        }
    }

    /// Age of the point relative to `now`, in milliseconds.
    #[must_use]
    pub fn age_ms(self, now: Timestamp) -> i64 {
        now.saturating_sub(self.timestamp)
    }
}
