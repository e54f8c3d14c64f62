//! Assessment report types with JSON persistence and text rendering.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, SessionReport};
use crate::model::Difficulty;
use crate::results::ResponseRecord;
use crate::scoring::DEGRADED_CONFIDENCE;

/// A complete assessment: every record plus the aggregate derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentReport {
    /// Session identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Individual response records, in answer order.
    pub records: Vec<ResponseRecord>,
    /// Aggregate derived from `records`.
    pub summary: SessionReport,
    /// Answered (not skipped) records that were scored without the
    /// semantic capability.
    pub degraded_count: usize,
}

impl AssessmentReport {
    pub fn new(
        id: Uuid,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        records: Vec<ResponseRecord>,
    ) -> Self {
        let summary = aggregate(&records);
        let degraded_count = count_degraded(&records);
        Self {
            id,
            created_at: Utc::now(),
            started_at,
            finished_at,
            records,
            summary,
            degraded_count,
        }
    }

    /// Rebuild the derived fields from `records`.
    ///
    /// Reports loaded from disk may have been produced by an older version or
    /// edited by hand; the records are the source of truth.
    pub fn recompute(&mut self) {
        self.summary = aggregate(&self.records);
        self.degraded_count = count_degraded(&self.records);
    }

    /// Wall-clock session length in seconds.
    pub fn duration_secs(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds().max(0)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AssessmentReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Render the full plain-text feedback report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(50);

        out.push_str("SKILLS ASSESSMENT REPORT\n");
        out.push_str(&format!("{rule}\n"));
        out.push_str(&format!(
            "Date: {}\n",
            self.finished_at.format("%Y-%m-%d %H:%M")
        ));
        out.push_str(&format!("Duration: {}s\n", self.duration_secs()));
        out.push_str(&format!("Total Questions: {}\n", self.summary.question_count));
        out.push_str(&format!(
            "Overall Score: {:.2}/100\n",
            self.summary.overall_score
        ));
        if self.degraded_count > 0 {
            out.push_str(&format!(
                "Note: {} answer(s) were scored on keywords only (confidence {:.1}).\n",
                self.degraded_count, DEGRADED_CONFIDENCE
            ));
        }

        out.push_str("\nPerformance by Difficulty Level:\n");
        for (difficulty, score) in difficulty_rows(&self.summary.per_difficulty_scores) {
            out.push_str(&format!("- {}: {:.2}/100\n", capitalize(difficulty), score));
        }

        out.push_str("\nDetailed Feedback:\n");
        for (i, r) in self.records.iter().enumerate() {
            out.push_str(&format!(
                "\nQuestion {} ({}): {}\n",
                i + 1,
                r.difficulty,
                r.question.text
            ));
            out.push_str(&format!("Score: {:.2}/100\n", r.evaluation.score));
            out.push_str(&format!("Evaluation: {}\n", r.evaluation.evaluation));
            out.push_str(&format!("Suggestions: {}\n", r.evaluation.suggestions));
        }

        out.push_str(&format!("\nOverall Assessment:\n{rule}\n"));
        out.push_str(&self.summary.narrative);
        out.push('\n');
        out
    }

    /// Render a markdown summary.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("## Skills Assessment\n\n");
        md.push_str(&format!(
            "**Overall:** {:.2}/100 ({}) over {} question(s)\n\n",
            self.summary.overall_score,
            self.summary.tier(),
            self.summary.question_count
        ));

        md.push_str("| Difficulty | Score |\n");
        md.push_str("|------------|-------|\n");
        for (difficulty, score) in difficulty_rows(&self.summary.per_difficulty_scores) {
            md.push_str(&format!("| {} | {:.2} |\n", difficulty, score));
        }
        md.push('\n');

        if !self.records.is_empty() {
            md.push_str("### Questions\n\n");
            md.push_str("| # | Question | Difficulty | Score | Missing keywords |\n");
            md.push_str("|---|----------|------------|-------|------------------|\n");
            for (i, r) in self.records.iter().enumerate() {
                md.push_str(&format!(
                    "| {} | {} | {} | {:.2} | {} |\n",
                    i + 1,
                    escape_cell(&r.question.id),
                    r.difficulty,
                    r.evaluation.score,
                    escape_cell(&r.evaluation.keywords_missing.join(", "))
                ));
            }
            md.push('\n');
        }

        if !self.summary.strengths.is_empty() {
            md.push_str(&format!(
                "**Strengths:** {}\n\n",
                self.summary.strengths.join(", ")
            ));
        }
        if !self.summary.improvements.is_empty() {
            md.push_str(&format!(
                "**Improvements:** {}\n\n",
                self.summary.improvements.join(", ")
            ));
        }

        md
    }
}

/// Escape pipes so a value cannot split a markdown table cell.
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

fn count_degraded(records: &[ResponseRecord]) -> usize {
    records
        .iter()
        .filter(|r| !r.skipped && r.evaluation.confidence <= DEGRADED_CONFIDENCE)
        .count()
}

fn difficulty_rows(scores: &BTreeMap<Difficulty, f64>) -> Vec<(Difficulty, f64)> {
    Difficulty::ALL
        .iter()
        .map(|d| (*d, scores.get(d).copied().unwrap_or(0.0)))
        .collect()
}

fn capitalize(d: Difficulty) -> String {
    let s = d.to_string();
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::Tier;
    use crate::model::Question;
    use crate::results::EvaluationResult;

    fn make_record(id: &str, difficulty: Difficulty, score: f64, confidence: f64) -> ResponseRecord {
        let tier = Tier::from_score(score);
        ResponseRecord::new(
            Question {
                id: id.into(),
                text: format!("Explain {id}."),
                difficulty,
                expected_keywords: vec!["alpha".into(), "beta".into()],
                follow_up: None,
            },
            "some answer",
            EvaluationResult {
                score,
                evaluation: tier.evaluation().into(),
                suggestions: tier.suggestions().into(),
                keywords_found: vec!["alpha".into()],
                keywords_missing: vec!["beta".into()],
                confidence,
            },
        )
    }

    fn make_report(records: Vec<ResponseRecord>) -> AssessmentReport {
        let now = Utc::now();
        AssessmentReport::new(Uuid::nil(), now, now, records)
    }

    #[test]
    fn json_roundtrip() {
        let report = make_report(vec![make_record("q1", Difficulty::Beginner, 72.5, 0.8)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");

        report.save_json(&path).unwrap();
        let loaded = AssessmentReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, Uuid::nil());
        assert_eq!(loaded.records, report.records);
        assert_eq!(loaded.summary, report.summary);
    }

    #[test]
    fn recompute_restores_summary() {
        let mut report = make_report(vec![
            make_record("q1", Difficulty::Beginner, 90.0, 0.8),
            make_record("q2", Difficulty::Advanced, 50.0, 0.5),
        ]);
        let expected = report.summary.clone();
        report.summary.overall_score = 1.0;
        report.summary.strengths.clear();

        report.recompute();
        assert_eq!(report.summary, expected);
        assert_eq!(report.summary.strengths, vec!["alpha"]);
        assert_eq!(report.degraded_count, 1);
    }

    #[test]
    fn text_report_contains_sections() {
        let report = make_report(vec![
            make_record("q1", Difficulty::Beginner, 90.0, 0.8),
            make_record("q2", Difficulty::Intermediate, 80.0, 0.8),
            make_record("q3", Difficulty::Advanced, 40.0, 0.5),
        ]);
        let text = report.to_text();
        assert!(text.contains("Total Questions: 3"));
        assert!(text.contains("Overall Score: 70.00/100"));
        assert!(text.contains("- Beginner: 90.00/100"));
        assert!(text.contains("- Advanced: 40.00/100"));
        assert!(text.contains("Question 3 (advanced): Explain q3."));
        assert!(text.contains("scored on keywords only"));
        assert!(text.contains(Tier::Good.assessment()));
    }

    #[test]
    fn markdown_lists_questions() {
        let report = make_report(vec![make_record("vlookup", Difficulty::Beginner, 61.0, 0.8)]);
        let md = report.to_markdown();
        assert!(md.contains("| 1 | vlookup | beginner | 61.00 | beta |"));
        assert!(md.contains("(Fair)"));
    }

    #[test]
    fn markdown_escapes_pipes_in_cells() {
        let mut record = make_record("a|b", Difficulty::Beginner, 61.0, 0.8);
        record.evaluation.keywords_missing = vec!["x || y".into()];
        let md = make_report(vec![record]).to_markdown();
        assert!(md.contains("| 1 | a\\|b | beginner | 61.00 | x \\|\\| y |"));
    }

    #[test]
    fn text_report_shows_duration() {
        let started = Utc::now();
        let finished = started + chrono::Duration::seconds(95);
        let report = AssessmentReport::new(
            Uuid::nil(),
            started,
            finished,
            vec![make_record("q1", Difficulty::Beginner, 90.0, 0.8)],
        );
        assert_eq!(report.duration_secs(), 95);
        assert!(report.to_text().contains("Duration: 95s"));

        let backwards = AssessmentReport::new(Uuid::nil(), finished, started, vec![]);
        assert_eq!(backwards.duration_secs(), 0);
    }

    #[test]
    fn empty_report_renders() {
        let report = make_report(vec![]);
        let text = report.to_text();
        assert!(text.contains("Total Questions: 0"));
        assert!(text.contains("No responses to evaluate."));
        assert_eq!(report.degraded_count, 0);
    }
}
