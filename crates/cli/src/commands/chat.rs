//! `vitalchat chat` — Interactive or single-message chat mode.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use vitalchat_agent::{ChatSession, DailySummary};
use vitalchat_config::AppConfig;
use vitalchat_core::message::{Conversation, Message};
use vitalchat_core::store::{DateRange, HealthStore};
use vitalchat_core::tool::Tool;
use vitalchat_health::{fetch_quantity_series, fetch_sleep_series};
use vitalchat_providers::OpenAiCompatProvider;

pub async fn run(message: Option<String>) -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load config")?;

    let Some(api_key) = config.api_key.clone() else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    VITALCHAT_API_KEY   (generic)");
        eprintln!("    OPENROUTER_API_KEY");
        eprintln!("    OPENAI_API_KEY");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        anyhow::bail!("No API key found. See above for setup instructions.");
    };

    let provider = Arc::new(
        OpenAiCompatProvider::new(&config.provider, &config.api_url, api_key)
            .context("Failed to build LLM provider")?,
    );
    let store = super::build_store(&config);

    let tools: Vec<Box<dyn Tool>> = vec![
        Box::new(vitalchat_tools::AvailableMetricsTool),
        Box::new(vitalchat_tools::GetHealthMetricTool::new(Arc::clone(&store))),
        Box::new(vitalchat_tools::ComparePeriodsTool::new(Arc::clone(&store))),
    ];

    let mut session = ChatSession::new(provider, &config.model, config.temperature, tools)
        .with_max_tokens(config.max_tokens);

    if config.prompt_mode == "legacy" {
        let today = chrono::Local::now().date_naive();
        let data = build_legacy_summaries(store.as_ref(), today)
            .await
            .context("Failed to pre-fetch the two-week data dump")?;
        session = session.with_legacy_data(data);
    }

    if let Some(msg) = message {
        let mut conv = Conversation::new();
        conv.push(Message::user(&msg));
        let response = session.process(&mut conv).await?;
        println!("{response}");
        return Ok(());
    }

    println!();
    println!("  VitalChat — ask about your health data");
    println!("  Model: {} ({})", config.model, config.provider);
    println!("  Type your message and press Enter. 'exit' or Ctrl+C to quit.");
    println!();

    let mut conv = Conversation::new();
    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        conv.push(Message::user(line));
        match session.process(&mut conv).await {
            Ok(response) => {
                println!();
                for out in response.lines() {
                    println!("  Assistant > {out}");
                }
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!("  Goodbye!");
    Ok(())
}

/// Pre-fetch the fixed 14-day bundle legacy mode embeds in the prompt.
async fn build_legacy_summaries(
    store: &dyn HealthStore,
    today: chrono::NaiveDate,
) -> anyhow::Result<Vec<DailySummary>> {
    use vitalchat_core::metric::HealthMetric;

    let range = DateRange::last_days(today, 13); // 14 days inclusive

    // All five quantity metrics have a spec; a missing one degrades to an
    // empty series rather than a panic.
    async fn quantity(
        store: &dyn HealthStore,
        metric: HealthMetric,
        range: DateRange,
    ) -> anyhow::Result<Vec<vitalchat_core::store::DailyDataPoint>> {
        match metric.quantity_spec() {
            Some(spec) => Ok(fetch_quantity_series(store, &spec, range).await?),
            None => Ok(Vec::new()),
        }
    }

    let steps = quantity(store, HealthMetric::Steps, range).await?;
    let energy = quantity(store, HealthMetric::ActiveEnergy, range).await?;
    let exercise = quantity(store, HealthMetric::ExerciseMinutes, range).await?;
    let weight = quantity(store, HealthMetric::BodyWeight, range).await?;
    let heart = quantity(store, HealthMetric::RestingHeartRate, range).await?;
    let sleep = fetch_sleep_series(store, range).await?;

    let summaries = (0..steps.len())
        .map(|i| DailySummary {
            date: steps[i].date,
            steps: Some(steps[i].value.round() as i64),
            sleep_hours: sleep.get(i).map(|p| p.hours),
            active_energy: energy.get(i).map(|p| p.value),
            exercise_minutes: exercise.get(i).map(|p| p.value),
            body_weight: weight.get(i).map(|p| p.value),
            resting_heart_rate: heart.get(i).map(|p| p.value.round() as i64),
        })
        .collect();

    Ok(summaries)
}
