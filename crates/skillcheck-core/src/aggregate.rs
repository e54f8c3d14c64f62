//! Session-level aggregation.
//!
//! Folds a session's response records into one [`SessionReport`]: overall and
//! per-difficulty averages, recurring strengths and gaps ranked by keyword
//! frequency, and a tiered narrative.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::feedback::Tier;
use crate::model::Difficulty;
use crate::results::ResponseRecord;

/// How many strengths / improvements a report lists at most.
pub const TOP_KEYWORDS: usize = 5;
/// A keyword must recur this many times to count as a pattern.
pub const MIN_KEYWORD_FREQUENCY: usize = 2;
/// Narrative for a session with no answers.
pub const EMPTY_SESSION_NARRATIVE: &str = "No responses to evaluate.";

/// Aggregate view of one interview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub question_count: usize,
    /// Mean score over all records; 0 for an empty session.
    pub overall_score: f64,
    /// Mean score per difficulty. Every difficulty is present; levels with no
    /// records report 0.
    pub per_difficulty_scores: BTreeMap<Difficulty, f64>,
    /// Keywords found in at least two answers, most frequent first.
    pub strengths: Vec<String>,
    /// Keywords missed in at least two answers, most frequent first.
    pub improvements: Vec<String>,
    pub narrative: String,
}

impl SessionReport {
    pub fn tier(&self) -> Tier {
        Tier::from_score(self.overall_score)
    }

    /// Returns `true` if the report was built from zero records.
    pub fn is_empty(&self) -> bool {
        self.question_count == 0
    }
}

/// Aggregate a session's records. Never fails; an empty slice gives a zero
/// report.
pub fn aggregate(records: &[ResponseRecord]) -> SessionReport {
    let overall_score = mean(records.iter().map(|r| r.evaluation.score));

    let per_difficulty_scores = Difficulty::ALL
        .iter()
        .map(|&d| {
            let avg = mean(
                records
                    .iter()
                    .filter(|r| r.difficulty == d)
                    .map(|r| r.evaluation.score),
            );
            (d, avg)
        })
        .collect();

    let found = rank_keywords(records.iter().flat_map(|r| &r.evaluation.keywords_found));
    let missing = rank_keywords(records.iter().flat_map(|r| &r.evaluation.keywords_missing));

    let strengths = recurring(&found);
    let improvements = recurring(&missing);

    let narrative = if records.is_empty() {
        EMPTY_SESSION_NARRATIVE.to_string()
    } else {
        narrative(overall_score, &strengths, &improvements)
    };

    SessionReport {
        question_count: records.len(),
        overall_score,
        per_difficulty_scores,
        strengths,
        improvements,
        narrative,
    }
}

/// Count keywords and rank them by descending frequency.
///
/// Ties keep the order in which keywords were first seen, so identical input
/// always ranks identically.
pub fn rank_keywords<'a, I>(keywords: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for kw in keywords {
        match index.get(kw.as_str()) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(kw.as_str(), counts.len());
                counts.push((kw.clone(), 1));
            }
        }
    }

    // Stable sort: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn recurring(ranked: &[(String, usize)]) -> Vec<String> {
    ranked
        .iter()
        .take(TOP_KEYWORDS)
        .filter(|(_, count)| *count >= MIN_KEYWORD_FREQUENCY)
        .map(|(kw, _)| kw.clone())
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn narrative(overall_score: f64, strengths: &[String], improvements: &[String]) -> String {
    let tier = Tier::from_score(overall_score);
    let mut text = tier.assessment().to_string();

    if !strengths.is_empty() {
        text.push_str(&format!(
            "\n\nStrengths: You demonstrated strong knowledge of {}.",
            strengths.join(", ")
        ));
    }
    if !improvements.is_empty() {
        text.push_str(&format!(
            "\n\nAreas for Improvement: Focus on learning more about {}.",
            improvements.join(", ")
        ));
    }

    text.push_str(&format!("\n\nRecommendation: {}", tier.recommendation()));
    text
}
