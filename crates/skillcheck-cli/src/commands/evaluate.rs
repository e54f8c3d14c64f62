//! The `skillcheck evaluate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillcheck_core::results::ResponseRecord;
use skillcheck_core::session::InterviewSession;
use skillcheck_providers::config::load_config_from;
use skillcheck_providers::build_evaluator;

pub async fn execute(
    catalog_path: Option<PathBuf>,
    question_id: String,
    answer: String,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format: {format} (expected text or json)"
    );

    let config = load_config_from(config_path.as_deref())?;
    let catalog = super::load_catalog(catalog_path, &config)?;
    let question = catalog.question(&question_id).with_context(|| {
        format!(
            "question '{question_id}' not found in catalog '{}'",
            catalog.id
        )
    })?;

    let evaluator = build_evaluator(&config)?;
    let mut session = InterviewSession::new();
    let record = session.answer(&evaluator, question, &answer).await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&record.evaluation)?);
    } else {
        print_text(record);
    }

    Ok(())
}

fn print_text(record: &ResponseRecord) {
    let eval = &record.evaluation;
    let mode = if record.skipped {
        "skipped"
    } else if eval.confidence >= skillcheck_core::scoring::FULL_CONFIDENCE {
        "full"
    } else {
        "keywords only"
    };

    println!("Question ({}): {}", record.difficulty, record.question.text);
    println!("Score: {:.2}/100 ({})", eval.score, eval.tier());
    println!("Confidence: {:.1} ({mode})", eval.confidence);
    if !eval.keywords_found.is_empty() {
        println!("Keywords found: {}", eval.keywords_found.join(", "));
    }
    if !eval.keywords_missing.is_empty() {
        println!("Keywords missing: {}", eval.keywords_missing.join(", "));
    }
    println!("Evaluation: {}", eval.evaluation);
    println!("Suggestions: {}", eval.suggestions);
    if let Some(follow_up) = &record.question.follow_up {
        println!("Follow-up: {follow_up}");
    }
}
