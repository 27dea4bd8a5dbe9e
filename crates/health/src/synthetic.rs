//! Synthetic health store — deterministic in-memory data.
//!
//! Produces plausible per-day values from a seeded hash of the sample
//! type and date, so chat flows can be exercised end-to-end without a
//! real device data store. Also the test double for the data access
//! layer: tests inject fixed sleep samples or force failures, and the
//! query counters make the quantity-vs-sleep dispatch path observable.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};

use vitalchat_core::error::HealthDataError;
use vitalchat_core::metric::QuantitySpec;
use vitalchat_core::store::{
    DailyDataPoint, DateRange, HealthStore, IntervalSample, SampleKind,
};

/// A deterministic in-memory [`HealthStore`].
pub struct SyntheticStore {
    seed: u64,
    fixed_sleep: Option<Vec<IntervalSample>>,
    fixed_value: Option<f64>,
    fail: bool,
    aggregate_queries: AtomicUsize,
    interval_queries: AtomicUsize,
}

impl SyntheticStore {
    /// Store generating hash-derived values from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            fixed_sleep: None,
            fixed_value: None,
            fail: false,
            aggregate_queries: AtomicUsize::new(0),
            interval_queries: AtomicUsize::new(0),
        }
    }

    /// Store whose interval queries return exactly the samples that fall
    /// in the requested window, from the given fixed set.
    pub fn with_sleep_samples(samples: Vec<IntervalSample>) -> Self {
        let mut store = Self::new(0);
        store.fixed_sleep = Some(samples);
        store
    }

    /// Store where every day bucket carries the same value.
    pub fn with_constant_value(value: f64) -> Self {
        let mut store = Self::new(0);
        store.fixed_value = Some(value);
        store
    }

    /// Store where every query fails with a `ProviderFailure`.
    pub fn failing() -> Self {
        let mut store = Self::new(0);
        store.fail = true;
        store
    }

    /// How many daily-aggregate queries have been issued.
    pub fn aggregate_queries(&self) -> usize {
        self.aggregate_queries.load(Ordering::Relaxed)
    }

    /// How many interval-sample queries have been issued.
    pub fn interval_queries(&self) -> usize {
        self.interval_queries.load(Ordering::Relaxed)
    }

    /// Deterministic hash for (sample type, date), varied by seed.
    fn day_hash(&self, provider_id: &str, date: NaiveDate) -> u64 {
        let mut h = self.seed.wrapping_mul(31).wrapping_add(17);
        for b in provider_id.bytes() {
            h = h.wrapping_mul(31).wrapping_add(u64::from(b));
        }
        h.wrapping_mul(31)
            .wrapping_add(u64::from(date.num_days_from_ce().unsigned_abs()))
    }

    /// A plausible daily value for the given sample type.
    fn synthetic_value(&self, provider_id: &str, date: NaiveDate) -> f64 {
        let h = self.day_hash(provider_id, date);
        match provider_id {
            "stepCount" => (3000 + h % 9000) as f64,
            "activeEnergyBurned" => (200 + h % 700) as f64,
            "exerciseTime" => (h % 75) as f64,
            "bodyMass" => 70.0 + ((h % 60) as f64 / 10.0) - 3.0,
            "restingHeartRate" => (52 + h % 16) as f64,
            _ => (h % 100) as f64,
        }
    }

    /// A plausible sleep night ending on the day the window closes on.
    fn synthetic_night(&self, window_end: NaiveDateTime) -> IntervalSample {
        let date = window_end.date();
        let h = self.day_hash("sleepAnalysis", date);
        let bed_minute = (h % 120) as i64; // 22:30 .. 00:30
        let wake_minute = (h / 7 % 90) as i64; // 06:00 .. 07:30
        let prev = date.pred_opt().unwrap_or(date);
        let start = prev
            .and_hms_opt(22, 30, 0)
            .unwrap_or_else(|| window_end - chrono::Duration::hours(9))
            + chrono::Duration::minutes(bed_minute);
        let end = date
            .and_hms_opt(6, 0, 0)
            .unwrap_or(window_end)
            + chrono::Duration::minutes(wake_minute);
        IntervalSample { start, end }
    }
}

#[async_trait]
impl HealthStore for SyntheticStore {
    async fn fetch_daily_aggregate(
        &self,
        spec: &QuantitySpec,
        range: DateRange,
    ) -> Result<Vec<DailyDataPoint>, HealthDataError> {
        self.aggregate_queries.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(HealthDataError::ProviderFailure(
                "synthetic store configured to fail".into(),
            ));
        }

        Ok(range
            .days()
            .map(|date| DailyDataPoint {
                date,
                value: self
                    .fixed_value
                    .unwrap_or_else(|| self.synthetic_value(spec.provider_id, date)),
            })
            .collect())
    }

    async fn fetch_interval_samples(
        &self,
        _kind: SampleKind,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
    ) -> Result<Vec<IntervalSample>, HealthDataError> {
        self.interval_queries.fetch_add(1, Ordering::Relaxed);
        if self.fail {
            return Err(HealthDataError::ProviderFailure(
                "synthetic store configured to fail".into(),
            ));
        }

        if let Some(fixed) = &self.fixed_sleep {
            // Strict-end predicate: a sample counts iff its end is inside
            // the half-open window.
            return Ok(fixed
                .iter()
                .copied()
                .filter(|s| s.end >= window_start && s.end < window_end)
                .collect());
        }

        Ok(vec![self.synthetic_night(window_end)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn same_seed_gives_identical_data() {
        let a = SyntheticStore::new(7);
        let b = SyntheticStore::new(7);
        let spec = vitalchat_core::metric::HealthMetric::Steps
            .quantity_spec()
            .unwrap();
        let range = DateRange {
            start: d(2026, 8, 21),
            end: d(2026, 8, 28),
        };

        let series_a = a.fetch_daily_aggregate(&spec, range).await.unwrap();
        let series_b = b.fetch_daily_aggregate(&spec, range).await.unwrap();
        assert_eq!(series_a, series_b);
    }

    #[tokio::test]
    async fn values_are_in_plausible_ranges() {
        let store = SyntheticStore::new(99);
        let range = DateRange {
            start: d(2026, 8, 1),
            end: d(2026, 8, 28),
        };
        for metric in vitalchat_core::metric::HealthMetric::ALL {
            let Some(spec) = metric.quantity_spec() else {
                continue;
            };
            let series = store.fetch_daily_aggregate(&spec, range).await.unwrap();
            for point in &series {
                assert!(point.value >= 0.0, "{metric}: negative value");
                assert!(point.value < 20_000.0, "{metric}: implausible value");
            }
        }
    }

    #[tokio::test]
    async fn synthetic_nights_land_in_the_window() {
        let store = SyntheticStore::new(3);
        let ws = d(2026, 8, 20).and_hms_opt(15, 0, 0).unwrap();
        let we = d(2026, 8, 21).and_hms_opt(15, 0, 0).unwrap();
        let samples = store
            .fetch_interval_samples(SampleKind::Asleep, ws, we)
            .await
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert!(samples[0].end >= ws && samples[0].end < we);
        assert!(samples[0].duration_secs() > 5 * 3600);
        assert!(samples[0].duration_secs() < 11 * 3600);
    }

    #[tokio::test]
    async fn query_counters_record_dispatch() {
        let store = SyntheticStore::new(1);
        assert_eq!(store.aggregate_queries(), 0);
        let spec = vitalchat_core::metric::HealthMetric::BodyWeight
            .quantity_spec()
            .unwrap();
        let range = DateRange {
            start: d(2026, 8, 27),
            end: d(2026, 8, 28),
        };
        store.fetch_daily_aggregate(&spec, range).await.unwrap();
        assert_eq!(store.aggregate_queries(), 1);
        assert_eq!(store.interval_queries(), 0);
    }
}
