//! The `skillcheck report` command.

use std::path::PathBuf;

use anyhow::Result;

use skillcheck_core::report::AssessmentReport;
use skillcheck_report::html::generate_html;

pub fn execute(input: PathBuf, format: String) -> Result<()> {
    let mut report = AssessmentReport::load_json(&input)?;
    report.recompute();

    let rendered = match format.as_str() {
        "text" => report.to_text(),
        "markdown" | "md" => report.to_markdown(),
        "json" => serde_json::to_string_pretty(&report)?,
        "html" => generate_html(&report),
        other => anyhow::bail!("unknown format: {other} (expected text, markdown, json or html)"),
    };

    println!("{rendered}");
    Ok(())
}
