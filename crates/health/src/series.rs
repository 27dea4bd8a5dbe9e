//! Daily series queries over a [`HealthStore`].
//!
//! Quantity metrics and sleep use structurally different store queries:
//! quantity metrics are a single daily-bucketed aggregate query, sleep is
//! a day-by-day loop over interval samples. The loop is inherent to the
//! 15:00-boundary sleep-night convention — the store's native aggregation
//! cannot express it.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use vitalchat_core::error::HealthDataError;
use vitalchat_core::metric::QuantitySpec;
use vitalchat_core::store::{
    DailyDataPoint, DateRange, HealthStore, SampleKind, SleepDataPoint,
};

/// Hour of day bounding a sleep night: intervals ending between 15:00 on
/// one day and 15:00 on the next are attributed to the second day.
pub const SLEEP_WINDOW_HOUR: u32 = 15;

/// Fetch a daily-bucketed series for a quantity metric.
///
/// One point per calendar day in `range`, ascending; days with no store
/// data carry `0.0`. Store failures (permission denial, I/O) propagate
/// unretried — retry policy belongs to the caller.
pub async fn fetch_quantity_series(
    store: &dyn HealthStore,
    spec: &QuantitySpec,
    range: DateRange,
) -> Result<Vec<DailyDataPoint>, HealthDataError> {
    debug!(
        provider_id = spec.provider_id,
        start = %range.start,
        end = %range.end,
        "Fetching quantity series"
    );
    store.fetch_daily_aggregate(spec, range).await
}

/// Fetch the sleep-night series for every day in `range`.
///
/// For each day `d`, sums the durations of asleep-classified intervals
/// whose end falls in `[d-1 15:00, d 15:00)` and converts seconds to
/// hours. A day whose window cannot be computed yields `0.0` hours rather
/// than aborting the whole range; a store failure for a day's query does
/// abort, since partial data would silently misrepresent the range.
pub async fn fetch_sleep_series(
    store: &dyn HealthStore,
    range: DateRange,
) -> Result<Vec<SleepDataPoint>, HealthDataError> {
    let mut points = Vec::with_capacity(range.num_days().max(0) as usize);

    for date in range.days() {
        let Some((window_start, window_end)) = sleep_window(date) else {
            warn!(%date, "Could not compute sleep window, recording zero hours");
            points.push(SleepDataPoint { date, hours: 0.0 });
            continue;
        };

        let samples = store
            .fetch_interval_samples(SampleKind::Asleep, window_start, window_end)
            .await?;

        let total_secs: i64 = samples.iter().map(|s| s.duration_secs()).sum();
        points.push(SleepDataPoint {
            date,
            hours: total_secs as f64 / 3600.0,
        });
    }

    Ok(points)
}

/// The sleep-night window ending on `date`: `[date-1 15:00, date 15:00)`.
fn sleep_window(date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let prev = date.pred_opt()?;
    let start = prev.and_hms_opt(SLEEP_WINDOW_HOUR, 0, 0)?;
    let end = date.and_hms_opt(SLEEP_WINDOW_HOUR, 0, 0)?;
    Some((start, end))
}
