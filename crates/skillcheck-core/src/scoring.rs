//! Lexical scoring and score blending.
//!
//! Keyword coverage and answer length never fail and are always computed.
//! When semantic scores are also available they are blended in with fixed
//! weights; otherwise the keyword score alone is scaled down to the degraded
//! ceiling. [`ScoreOutcome`] records which of the two paths produced a score.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Weight of keyword coverage in the full blend.
pub const KEYWORD_WEIGHT: f64 = 0.3;
/// Weight of question/answer similarity in the full blend.
pub const SIMILARITY_WEIGHT: f64 = 0.4;
/// Weight of the classifier quality proxy in the full blend.
pub const QUALITY_WEIGHT: f64 = 0.2;
/// Weight of the length score in the full blend.
pub const LENGTH_WEIGHT: f64 = 0.1;

/// Best possible score when only keywords could be matched.
pub const DEGRADED_CEILING: f64 = 85.0;

/// Confidence reported for full semantic scoring.
pub const FULL_CONFIDENCE: f64 = 0.8;
/// Confidence reported for keyword-only scoring.
pub const DEGRADED_CONFIDENCE: f64 = 0.5;

/// Word count at which the length score saturates.
pub const LENGTH_SATURATION_WORDS: usize = 50;

/// Result of matching an answer against expected keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub found: Vec<String>,
    pub missing: Vec<String>,
    /// Fraction of expected keywords found, in [0, 1].
    pub score: f64,
}

/// Split `expected` into keywords the answer mentions and keywords it misses.
///
/// Matching is case-insensitive substring containment. Both output lists keep
/// the order of `expected`.
pub fn match_keywords(answer: &str, expected: &[String]) -> KeywordMatch {
    let haystack = answer.to_lowercase();

    let (found, missing): (Vec<String>, Vec<String>) = expected
        .iter()
        .cloned()
        .partition(|kw| !haystack.is_empty() && haystack.contains(&kw.to_lowercase()));

    let score = if expected.is_empty() {
        0.0
    } else {
        found.len() as f64 / expected.len() as f64
    };

    KeywordMatch {
        found,
        missing,
        score,
    }
}

/// Number of whitespace-delimited tokens.
pub fn word_count(answer: &str) -> usize {
    answer.split_whitespace().count()
}

/// Completeness proxy: grows linearly with word count up to saturation.
pub fn length_score(answer: &str) -> f64 {
    (word_count(answer) as f64 / LENGTH_SATURATION_WORDS as f64).min(1.0)
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Why the semantic scores were not used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DegradeReason {
    /// No capability was injected.
    Unavailable,
    /// The capability returned an error.
    Failed(String),
    /// The capability did not answer within the configured timeout (ms).
    TimedOut(u64),
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::Unavailable => write!(f, "semantic capability unavailable"),
            DegradeReason::Failed(msg) => write!(f, "semantic scoring failed: {msg}"),
            DegradeReason::TimedOut(ms) => write!(f, "semantic scoring timed out after {ms}ms"),
        }
    }
}

/// The per-component scores behind a final score, tagged by scoring path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ScoreOutcome {
    /// Keyword, length and semantic scores blended together.
    Full {
        keyword: f64,
        similarity: f64,
        quality: f64,
        length: f64,
    },
    /// Keyword coverage only, capped at [`DEGRADED_CEILING`].
    Degraded { keyword: f64, reason: DegradeReason },
}

impl ScoreOutcome {
    /// Final 0-100 score, rounded to two places and clamped.
    pub fn final_score(&self) -> f64 {
        let raw = match self {
            ScoreOutcome::Full {
                keyword,
                similarity,
                quality,
                length,
            } => {
                100.0
                    * (KEYWORD_WEIGHT * keyword
                        + SIMILARITY_WEIGHT * similarity
                        + QUALITY_WEIGHT * quality
                        + LENGTH_WEIGHT * length)
            }
            ScoreOutcome::Degraded { keyword, .. } => DEGRADED_CEILING * keyword,
        };
        round2(raw).clamp(0.0, 100.0)
    }

    pub fn confidence(&self) -> f64 {
        match self {
            ScoreOutcome::Full { .. } => FULL_CONFIDENCE,
            ScoreOutcome::Degraded { .. } => DEGRADED_CONFIDENCE,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScoreOutcome::Degraded { .. })
    }
}
