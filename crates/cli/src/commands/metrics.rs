//! `vitalchat metrics` — Print the metric catalog listing.

use vitalchat_core::tool::Tool;
use vitalchat_tools::AvailableMetricsTool;

pub async fn run() -> anyhow::Result<()> {
    let result = AvailableMetricsTool
        .execute(serde_json::json!({}))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    println!("{}", result.output);
    Ok(())
}
