//! `vitalchat doctor` — Diagnose configuration and backend reachability.

use vitalchat_config::AppConfig;
use vitalchat_core::provider::Provider;
use vitalchat_providers::OpenAiCompatProvider;

pub async fn run() -> anyhow::Result<()> {
    println!("VitalChat Doctor — diagnostics");
    println!("==============================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = if config_path.exists() {
        match AppConfig::load() {
            Ok(config) => {
                println!("  ok   Config file valid");
                Some(config)
            }
            Err(e) => {
                println!("  FAIL Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  note No config file at {} — using defaults", config_path.display());
        AppConfig::load().ok()
    };

    if let Some(config) = config {
        if config.has_api_key() {
            println!("  ok   API key configured");

            match OpenAiCompatProvider::new(
                &config.provider,
                &config.api_url,
                config.api_key.clone().unwrap_or_default(),
            ) {
                Ok(provider) => match provider.health_check().await {
                    Ok(true) => println!("  ok   LLM backend reachable ({})", config.api_url),
                    Ok(false) => {
                        println!("  warn LLM backend responded with an error status");
                        issues += 1;
                    }
                    Err(e) => {
                        println!("  FAIL LLM backend unreachable: {e}");
                        issues += 1;
                    }
                },
                Err(e) => {
                    println!("  FAIL Could not build provider: {e}");
                    issues += 1;
                }
            }
        } else {
            println!("  warn No API key — `chat` will not work until one is set");
            issues += 1;
        }

        println!("  ok   Health store: {} (seed {})", config.store, config.store_seed);
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
