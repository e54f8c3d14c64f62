//! The `skillcheck doctor` command.

use std::path::PathBuf;

use anyhow::Result;

use skillcheck_core::scoring::{DEGRADED_CONFIDENCE, FULL_CONFIDENCE};
use skillcheck_providers::config::{load_config_from, CapabilityConfig, HF_TOKEN_ENV};
use skillcheck_providers::create_capability;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    println!("Capability timeout: {}ms", config.capability_timeout_ms);
    println!("Positive label: {}", config.positive_label);
    println!("Parallelism: {}", config.parallelism);

    let Some(capability_config) = &config.capability else {
        println!("Semantic capability: not configured");
        print_degraded();
        return Ok(());
    };
    println!("Semantic capability: {capability_config:?}");

    let Some(capability) = create_capability(capability_config)? else {
        if matches!(capability_config, CapabilityConfig::HuggingFace { .. }) {
            println!("No Hugging Face token set: export {HF_TOKEN_ENV} or set api_key.");
        }
        print_degraded();
        return Ok(());
    };

    let timeout = config.evaluator_config().capability_timeout;
    match tokio::time::timeout(timeout, capability.probe()).await {
        Ok(Ok(())) => println!(
            "Capability '{}' is available: full scoring enabled (confidence {:.1}).",
            capability.name(),
            FULL_CONFIDENCE
        ),
        Ok(Err(e)) => {
            println!("Capability '{}' is unavailable: {e}", capability.name());
            if e.is_permanent() {
                println!("This will not recover on its own: check the [capability] settings.");
            } else {
                println!("This may be temporary: run `skillcheck doctor` again later.");
            }
            print_degraded();
        }
        Err(_) => {
            println!(
                "Capability '{}' did not answer within {}ms.",
                capability.name(),
                timeout.as_millis()
            );
            print_degraded();
        }
    }

    Ok(())
}

fn print_degraded() {
    println!(
        "Answers will be scored on keywords only (confidence {:.1}, max score 85).",
        DEGRADED_CONFIDENCE
    );
}
