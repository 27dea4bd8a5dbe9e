//! `get_available_metrics` — list what the assistant can query.
//!
//! Pure and deterministic: renders the metric catalog, no store access.

use async_trait::async_trait;

use vitalchat_core::error::ToolError;
use vitalchat_core::metric::HealthMetric;
use vitalchat_core::tool::{Tool, ToolResult};

pub struct AvailableMetricsTool;

#[async_trait]
impl Tool for AvailableMetricsTool {
    fn name(&self) -> &str {
        "get_available_metrics"
    }

    fn description(&self) -> &str {
        "List all health metrics that can be queried, with a short description of each. Use this when unsure which metric to ask for."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(
        &self,
        _arguments: serde_json::Value,
    ) -> std::result::Result<ToolResult, ToolError> {
        let mut lines = vec!["Available health metrics:".to_string()];
        for metric in HealthMetric::ALL {
            lines.push(format!("- {}: {}", metric.key(), metric.description()));
        }
        Ok(ToolResult::ok(lines.join("\n")))
    }
}
