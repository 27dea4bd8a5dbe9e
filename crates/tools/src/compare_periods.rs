//! `compare_periods` — compare a metric's average across two periods.
//!
//! Periods arrive as day-offsets from today (0 = today). Each pair of
//! offsets is order-independent: the larger offset is taken as the
//! period's chronological start. Averages of empty series are 0, and the
//! percent change against a zero baseline is reported as 0 — the output
//! never contains NaN or infinity.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use vitalchat_core::error::ToolError;
use vitalchat_core::metric::HealthMetric;
use vitalchat_core::store::{DateRange, HealthStore};
use vitalchat_core::tool::{Tool, ToolResult};
use vitalchat_health::{fetch_quantity_series, fetch_sleep_series};

pub struct ComparePeriodsTool {
    store: Arc<dyn HealthStore>,
}

impl ComparePeriodsTool {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    async fn period_average(
        &self,
        metric: HealthMetric,
        range: DateRange,
    ) -> std::result::Result<Result<f64, ToolResult>, ToolError> {
        // Sleep vs quantity dispatch mirrors get_health_metric.
        let values: Vec<f64> = if metric == HealthMetric::Sleep {
            match fetch_sleep_series(self.store.as_ref(), range).await {
                Ok(series) => series.iter().map(|p| p.hours).collect(),
                Err(e) => return crate::data_error_to_result(self.name(), e).map(Err),
            }
        } else {
            let Some(spec) = metric.quantity_spec() else {
                return Ok(Err(ToolResult::error_text("Error: Unsupported metric.")));
            };
            match fetch_quantity_series(self.store.as_ref(), &spec, range).await {
                Ok(series) => series.iter().map(|p| p.value).collect(),
                Err(e) => return crate::data_error_to_result(self.name(), e).map(Err),
            }
        };
        Ok(Ok(mean(&values)))
    }

    /// Run against an explicit `today`, so tests are date-stable.
    pub async fn run_for_date(
        &self,
        arguments: &serde_json::Value,
        today: NaiveDate,
    ) -> std::result::Result<ToolResult, ToolError> {
        let metric = crate::get_metric::parse_metric(&arguments["metric"]);

        let offsets = [
            parse_offset(&arguments["period1Start"]),
            parse_offset(&arguments["period1End"]),
            parse_offset(&arguments["period2Start"]),
            parse_offset(&arguments["period2End"]),
        ];
        let [Some(p1a), Some(p1b), Some(p2a), Some(p2b)] = offsets else {
            return Ok(ToolResult::error_text(
                "Error: All four period offsets must be whole numbers of days.",
            ));
        };

        let period1 = DateRange::from_offsets(today, p1a, p1b);
        let period2 = DateRange::from_offsets(today, p2a, p2b);

        let avg1 = match self.period_average(metric, period1).await? {
            Ok(avg) => avg,
            Err(result) => return Ok(result),
        };
        let avg2 = match self.period_average(metric, period2).await? {
            Ok(avg) => avg,
            Err(result) => return Ok(result),
        };

        let unit = metric.unit_label();
        let difference = avg1 - avg2;
        let percent = if avg2 == 0.0 {
            0.0
        } else {
            difference / avg2 * 100.0
        };

        let output = format!(
            "{} comparison:\nPeriod 1 ({}): average {:.1} {}\nPeriod 2 ({}): average {:.1} {}\nDifference: {:+.1} {} ({:+.1}%)",
            metric.display_name(),
            label(period1),
            avg1,
            unit,
            label(period2),
            avg2,
            unit,
            difference,
            unit,
            percent,
        );
        Ok(ToolResult::ok(output))
    }
}

#[async_trait]
impl Tool for ComparePeriodsTool {
    fn name(&self) -> &str {
        "compare_periods"
    }

    fn description(&self) -> &str {
        "Compare the average of one health metric across two time periods. Periods are given as day offsets from today (0 = today, 7 = a week ago); each pair of offsets may be passed in either order."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "metric": {
                    "type": "string",
                    "enum": ["steps", "activeEnergy", "exerciseMinutes", "bodyWeight", "restingHeartRate", "sleep"],
                    "description": "Which health metric to compare"
                },
                "period1Start": {
                    "type": "integer",
                    "description": "Days ago the first period starts (e.g. 7 for one week ago)"
                },
                "period1End": {
                    "type": "integer",
                    "description": "Days ago the first period ends (e.g. 0 for today)"
                },
                "period2Start": {
                    "type": "integer",
                    "description": "Days ago the second period starts (e.g. 14)"
                },
                "period2End": {
                    "type": "integer",
                    "description": "Days ago the second period ends (e.g. 7)"
                }
            },
            "required": ["metric", "period1Start", "period1End", "period2Start", "period2End"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let today = chrono::Local::now().date_naive();
        self.run_for_date(&arguments, today).await
    }
}

/// Short month-day label for a period, e.g. "Aug 21 - Aug 28".
fn label(range: DateRange) -> String {
    format!(
        "{} - {}",
        range.start.format("%b %-d"),
        range.end.format("%b %-d")
    )
}

/// Arithmetic mean; 0 for an empty series, never a division by zero.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Lenient offset parsing: integers, floats with integral value, and
/// numeric strings all work. Negative offsets (the future) clamp to today.
fn parse_offset(value: &serde_json::Value) -> Option<u64> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }?;
    Some(n.max(0) as u64)
}
