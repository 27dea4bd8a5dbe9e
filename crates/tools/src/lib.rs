//! The health data-fetch tools VitalChat exposes to the LLM.
//!
//! Three tools: list what can be queried, fetch one metric over N days,
//! and compare a metric across two periods. Inputs are LLM-generated and
//! treated as untrusted: bad metric keys and day counts are recovered into
//! model-readable text so the conversation survives and the model can
//! self-correct. Tools hold only a shared read handle to the health store
//! and may run concurrently within a turn.

pub mod available_metrics;
pub mod compare_periods;
pub mod get_metric;

use std::sync::Arc;

use vitalchat_core::error::{HealthDataError, ToolError};
use vitalchat_core::store::HealthStore;
use vitalchat_core::tool::{ToolRegistry, ToolResult};

pub use available_metrics::AvailableMetricsTool;
pub use compare_periods::ComparePeriodsTool;
pub use get_metric::GetHealthMetricTool;

/// Create the default tool registry, in the order the tools are listed to
/// the model: catalog listing first, then the two fetch tools.
pub fn default_registry(store: Arc<dyn HealthStore>) -> ToolRegistry {
    ToolRegistry::from_tools(vec![
        Box::new(AvailableMetricsTool),
        Box::new(GetHealthMetricTool::new(Arc::clone(&store))),
        Box::new(ComparePeriodsTool::new(store)),
    ])
}

/// Map a data-layer error to the tool contract: unresolved metric types
/// become model-readable text, store failures propagate to the session.
pub(crate) fn data_error_to_result(
    tool_name: &str,
    err: HealthDataError,
) -> Result<ToolResult, ToolError> {
    match err {
        HealthDataError::InvalidMetricType(_) => {
            Ok(ToolResult::error_text("Error: Unsupported metric."))
        }
        HealthDataError::ProviderFailure(reason) => Err(ToolError::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalchat_health::SyntheticStore;

    #[test]
    fn default_registry_has_the_three_tools_in_order() {
        let registry = default_registry(Arc::new(SyntheticStore::new(0)));
        assert_eq!(
            registry.names(),
            vec!["get_available_metrics", "get_health_metric", "compare_periods"]
        );
    }

    #[test]
    fn invalid_metric_type_becomes_text() {
        let result =
            data_error_to_result("get_health_metric", HealthDataError::InvalidMetricType("x".into()))
                .unwrap();
        assert!(!result.success);
        assert_eq!(result.output, "Error: Unsupported metric.");
    }

    #[test]
    fn provider_failure_propagates_as_tool_error() {
        let err = data_error_to_result(
            "compare_periods",
            HealthDataError::ProviderFailure("permission revoked".into()),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }
}
