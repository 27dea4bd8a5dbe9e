//! `vitalchat compare` — Run the compare_periods tool directly.

use vitalchat_config::AppConfig;
use vitalchat_core::tool::Tool;
use vitalchat_tools::ComparePeriodsTool;

pub async fn run(metric: &str, p1: &[i64], p2: &[i64]) -> anyhow::Result<()> {
    let (&[p1s, p1e], &[p2s, p2e]) = (p1, p2) else {
        anyhow::bail!("--p1 and --p2 each take exactly two day offsets");
    };

    let config = AppConfig::load()?;
    let store = super::build_store(&config);

    let tool = ComparePeriodsTool::new(store);
    let result = tool
        .execute(serde_json::json!({
            "metric": metric,
            "period1Start": p1s,
            "period1End": p1e,
            "period2Start": p2s,
            "period2End": p2e,
        }))
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    println!("{}", result.output);
    Ok(())
}
