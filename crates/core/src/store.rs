//! HealthStore trait — the abstraction over the platform health-data store.
//!
//! The store is a read-only external capability with two query shapes: a
//! daily-bucketed aggregate query for quantity metrics, and a sample
//! enumeration query for sleep intervals. Implementations: an on-device
//! store behind a platform bridge, or the in-memory synthetic store used
//! by tests and the offline demo.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::HealthDataError;
use crate::metric::QuantitySpec;

/// An inclusive calendar-day range. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The last `n` days ending today: `[today - n, today]`.
    ///
    /// `n` must be at least 1; callers clamp user input before this point,
    /// but a zero slips through as a single-day range rather than an
    /// inverted one.
    pub fn last_days(today: NaiveDate, n: u64) -> Self {
        let start = today
            .checked_sub_days(Days::new(n.max(1)))
            .unwrap_or(today);
        Self { start, end: today }
    }

    /// Resolve a pair of day-offsets from `today` (0 = today) into a range.
    ///
    /// Offsets are order-independent: the larger offset becomes the
    /// chronological start, the smaller the end, so callers may supply
    /// them in either order.
    pub fn from_offsets(today: NaiveDate, a: u64, b: u64) -> Self {
        let start = today
            .checked_sub_days(Days::new(a.max(b)))
            .unwrap_or(today);
        let end = today
            .checked_sub_days(Days::new(a.min(b)))
            .unwrap_or(today);
        Self { start, end }
    }

    /// Iterate every calendar day in the range, inclusive on both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        let mut current = Some(self.start);
        std::iter::from_fn(move || {
            let d = current?;
            if d > end {
                return None;
            }
            current = d.succ_opt();
            Some(d)
        })
    }

    /// Number of calendar days in the range, inclusive.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One day's aggregated value for a quantity metric.
///
/// A day with no store data carries `0.0` — gaps are neither dropped nor
/// fabricated into errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyDataPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One "sleep night" attributed to the day it ends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SleepDataPoint {
    pub date: NaiveDate,
    pub hours: f64,
}

/// A raw `(start, end)` interval returned by the sample enumeration query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl IntervalSample {
    /// Interval length in seconds. Inverted samples count as zero.
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds().max(0)
    }
}

/// The category of interval samples to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleKind {
    /// Samples classified as asleep (any sleep stage).
    Asleep,
}

/// The core HealthStore trait.
///
/// Read-only: it requires no locking and supports unlimited concurrent
/// queries, which is what lets tool calls in the same turn run in
/// parallel. No implementation retries internally; retry policy belongs
/// to the caller.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Daily-bucketed aggregate query for a quantity metric.
    ///
    /// Anchored at the start-of-day of `range.start`, one bucket per day
    /// through `range.end`. Implementations must return exactly one point
    /// per day in ascending order; a day with no samples yields `0.0`.
    async fn fetch_daily_aggregate(
        &self,
        spec: &QuantitySpec,
        range: DateRange,
    ) -> std::result::Result<Vec<DailyDataPoint>, HealthDataError>;

    /// Enumerate interval samples whose **end** falls within
    /// `[window_start, window_end)` — strict-end semantics: a sample that
    /// starts before the window but ends inside it counts; one that ends
    /// exactly at `window_end` does not.
    async fn fetch_interval_samples(
        &self,
        kind: SampleKind,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> std::result::Result<Vec<IntervalSample>, HealthDataError>;
}
