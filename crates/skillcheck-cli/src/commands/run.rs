//! The `skillcheck run` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use skillcheck_core::error::InputError;
use skillcheck_core::model::{Catalog, Question};
use skillcheck_core::report::AssessmentReport;
use skillcheck_core::results::ResponseRecord;
use skillcheck_core::session::{InterviewSession, ScriptedAnswer, SessionProgress};
use skillcheck_providers::config::load_config_from;
use skillcheck_providers::build_evaluator;
use skillcheck_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl SessionProgress for ConsoleReporter {
    fn on_answer_start(&self, index: usize, question: &Question) {
        eprintln!("  Starting: #{} {}", index + 1, question.id);
    }

    fn on_answer_complete(&self, index: usize, record: &ResponseRecord) {
        let status = if record.skipped { " (skipped)" } else { "" };
        eprintln!(
            "  Done: #{} {} score {:.2} [{}]{}",
            index + 1,
            record.question.id,
            record.evaluation.score,
            record.evaluation.tier(),
            status,
        );
    }

    fn on_answer_rejected(&self, index: usize, question: &Question, error: &InputError) {
        eprintln!("  REJECTED: #{} {}: {error}", index + 1, question.id);
    }

    fn on_session_complete(&self, answered: usize, rejected: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {answered} evaluated, {rejected} rejected ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[derive(Debug, Deserialize)]
struct AnswersFile {
    #[serde(default)]
    answers: Vec<AnswerEntry>,
}

#[derive(Debug, Deserialize)]
struct AnswerEntry {
    question_id: String,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    skip: bool,
}

/// Read an answers file and resolve each entry against the catalog.
fn load_script(path: &Path, catalog: &Catalog) -> Result<Vec<ScriptedAnswer>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    let parsed: AnswersFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse answers file: {}", path.display()))?;

    parsed
        .answers
        .into_iter()
        .map(|entry| {
            let question = catalog.question(&entry.question_id).with_context(|| {
                format!(
                    "question '{}' not found in catalog '{}'",
                    entry.question_id, catalog.id
                )
            })?;
            Ok(ScriptedAnswer {
                question: question.clone(),
                answer: if entry.skip { None } else { entry.answer },
            })
        })
        .collect()
}

pub async fn execute(
    catalog_path: Option<PathBuf>,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "text", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "json" | "html" | "text" | "markdown"),
            "unknown format: {fmt}"
        );
    }

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(p) = parallelism {
        anyhow::ensure!(p >= 1, "parallelism must be at least 1");
        config.parallelism = p;
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let catalog = super::load_catalog(catalog_path, &config)?;
    let script = load_script(&answers_path, &catalog)?;
    anyhow::ensure!(!script.is_empty(), "answers file has no [[answers]] entries");

    let evaluator = build_evaluator(&config)?;
    let mode = config
        .capability
        .as_ref()
        .filter(|_| evaluator.has_capability())
        .map(|c| c.kind())
        .unwrap_or("keyword-only");
    tracing::debug!(
        parallelism = config.parallelism,
        output = %output.display(),
        "run configured"
    );

    eprintln!(
        "skillcheck v{}: evaluating {} answers from {} (scoring: {mode})",
        env!("CARGO_PKG_VERSION"),
        script.len(),
        catalog.name
    );
    eprintln!();

    let mut session = InterviewSession::new();
    session.run_answers(&evaluator, &script, &ConsoleReporter).await;
    let report = session.finish();

    print_summary(&report);

    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in &formats {
        match *fmt {
            "json" => {
                let path = output.join(format!("report-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("report-{timestamp}.html"));
                write_html_report(&report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "text" => {
                let path = output.join(format!("report-{timestamp}.txt"));
                std::fs::write(&path, report.to_text())?;
                eprintln!("Text report: {}", path.display());
            }
            "markdown" => {
                let path = output.join(format!("report-{timestamp}.md"));
                std::fs::write(&path, report.to_markdown())?;
                eprintln!("Markdown report: {}", path.display());
            }
            other => anyhow::bail!("unknown format: {other}"),
        }
    }

    Ok(())
}

fn print_summary(report: &AssessmentReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "#",
        "Question",
        "Difficulty",
        "Score",
        "Tier",
        "Confidence",
    ]);

    for (i, r) in report.records.iter().enumerate() {
        let tier = if r.skipped {
            "Skipped".to_string()
        } else {
            r.evaluation.tier().to_string()
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&r.question.id),
            Cell::new(r.difficulty),
            Cell::new(format!("{:.2}", r.evaluation.score)),
            Cell::new(tier),
            Cell::new(format!("{:.1}", r.evaluation.confidence)),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Overall: {:.2}/100 ({})",
        report.summary.overall_score,
        report.summary.tier()
    );
    if report.degraded_count > 0 {
        eprintln!(
            "{} answer(s) were scored on keywords only.",
            report.degraded_count
        );
    }
}
