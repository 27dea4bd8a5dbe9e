//! `get_health_metric` — fetch one metric's daily values over N days.
//!
//! Arguments are LLM-generated and lenient by design: an unrecognized
//! metric key falls back to `steps` (tolerating minor model mistakes, at
//! the cost of masking them — a deliberate trade-off), and `days` accepts
//! any string or number, defaulting to 7 and clamping to [1, 90].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::warn;

use vitalchat_core::error::ToolError;
use vitalchat_core::metric::HealthMetric;
use vitalchat_core::store::{DateRange, HealthStore};
use vitalchat_core::tool::{Tool, ToolResult};
use vitalchat_health::{fetch_quantity_series, fetch_sleep_series};

pub const MIN_DAYS: u64 = 1;
pub const MAX_DAYS: u64 = 90;
pub const DEFAULT_DAYS: u64 = 7;

pub struct GetHealthMetricTool {
    store: Arc<dyn HealthStore>,
}

impl GetHealthMetricTool {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Run against an explicit `today`, so tests are date-stable.
    pub async fn run_for_date(
        &self,
        arguments: &serde_json::Value,
        today: NaiveDate,
    ) -> std::result::Result<ToolResult, ToolError> {
        let metric = parse_metric(&arguments["metric"]);
        let days = parse_days(&arguments["days"]);
        let range = DateRange::last_days(today, days);

        let mut lines = vec![format!(
            "{} for the last {} days:",
            metric.display_name(),
            days
        )];

        // Sleep uses interval samples, everything else the aggregate query.
        if metric == HealthMetric::Sleep {
            let series = match fetch_sleep_series(self.store.as_ref(), range).await {
                Ok(series) => series,
                Err(e) => return crate::data_error_to_result(self.name(), e),
            };
            for point in series {
                lines.push(format!("{}: {:.1} hours", point.date, point.hours));
            }
        } else {
            // Unreachable under correct catalog construction, but a broken
            // tool call must surface as text, not crash the session.
            let Some(spec) = metric.quantity_spec() else {
                return Ok(ToolResult::error_text("Error: Unsupported metric."));
            };
            let series = match fetch_quantity_series(self.store.as_ref(), &spec, range).await {
                Ok(series) => series,
                Err(e) => return crate::data_error_to_result(self.name(), e),
            };
            for point in series {
                lines.push(format!("{}: {:.1} {}", point.date, point.value, spec.unit));
            }
        }

        Ok(ToolResult::ok(lines.join("\n")))
    }
}

#[async_trait]
impl Tool for GetHealthMetricTool {
    fn name(&self) -> &str {
        "get_health_metric"
    }

    fn description(&self) -> &str {
        "Fetch daily values for one health metric over the last N days. Returns one line per day in ascending date order."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "metric": {
                    "type": "string",
                    "enum": ["steps", "activeEnergy", "exerciseMinutes", "bodyWeight", "restingHeartRate", "sleep"],
                    "description": "Which health metric to fetch"
                },
                "days": {
                    "type": "string",
                    "description": "How many days back to fetch (1-90, default 7)"
                }
            },
            "required": ["metric"]
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

/// Resolve the metric argument, falling back to `steps` for anything the
/// catalog does not recognize.
pub(crate) fn parse_metric(value: &serde_json::Value) -> HealthMetric {
    let key = value.as_str().unwrap_or_default();
    match HealthMetric::parse(key) {
        Some(metric) => metric,
        None => {
            warn!(key, "Unrecognized metric key, falling back to steps");
            HealthMetric::Steps
        }
    }
}

/// Parse the free-form `days` argument: accepts numbers or numeric
/// strings, defaults to 7 when unparseable, clamps into [1, 90].
pub(crate) fn parse_days(value: &serde_json::Value) -> u64 {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) => clamp_days(n),
        None => DEFAULT_DAYS,
    }
}

fn clamp_days(n: i64) -> u64 {
    n.clamp(MIN_DAYS as i64, MAX_DAYS as i64) as u64
}
