//! `vitalchat fetch` — Run the get_health_metric tool directly.
//!
//! Useful for inspecting what the model would see, without an LLM call.

use vitalchat_config::AppConfig;
use vitalchat_core::tool::Tool;
use vitalchat_tools::GetHealthMetricTool;

pub async fn run(metric: &str, days: &str) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let store = super::build_store(&config);

    let tool = GetHealthMetricTool::new(store);
    let result = tool
        .execute(serde_json::json!({ "metric": metric, "days": days }))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", result.output);
    Ok(())
}
