//! Core data model types for skillcheck.
//!
//! Questions, their difficulty levels, and the catalogs that hold them.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Answer text that marks a question as skipped.
pub const SKIP_SENTINEL: &str = "I don't know";

/// How hard a question is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Beginner => write!(f, "beginner"),
            Difficulty::Intermediate => write!(f, "intermediate"),
            Difficulty::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "basic" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" | "expert" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A single knowledge question with the concepts a good answer mentions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its catalog.
    pub id: String,
    /// The question as asked.
    pub text: String,
    pub difficulty: Difficulty,
    /// Reference concepts, matched case-insensitively. Order is significant:
    /// found and missing keywords are reported in this order.
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    /// Optional follow-up prompt shown after the question is evaluated.
    #[serde(default)]
    pub follow_up: Option<String>,
}

/// Check a question against the evaluator's input contract.
pub fn validate_question(question: &Question) -> Result<(), InputError> {
    if question.text.trim().is_empty() {
        return Err(InputError::EmptyQuestionText(question.id.clone()));
    }

    let mut seen = HashSet::new();
    for keyword in &question.expected_keywords {
        if keyword.trim().is_empty() {
            return Err(InputError::EmptyKeyword(question.id.clone()));
        }
        if !seen.insert(keyword.to_lowercase()) {
            return Err(InputError::DuplicateKeyword {
                question: question.id.clone(),
                keyword: keyword.clone(),
            });
        }
    }

    Ok(())
}

/// Check that an answer is present at all.
///
/// Whitespace-only answers are rejected; callers that want to record a skip
/// must send [`SKIP_SENTINEL`] or use the explicit skip path.
pub fn validate_answer(question: &Question, answer: &str) -> Result<(), InputError> {
    if answer.trim().is_empty() {
        return Err(InputError::EmptyAnswer(question.id.clone()));
    }
    Ok(())
}

/// Returns `true` if the answer is the "I don't know" sentinel.
pub fn is_skip_answer(answer: &str) -> bool {
    let normalized = answer.trim().replace('\u{2019}', "'");
    normalized.eq_ignore_ascii_case(SKIP_SENTINEL)
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Catalog {
    /// Look up a question by ID.
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Pick up to `count` distinct questions matching `selection`.
    ///
    /// Returns fewer than `count` when the catalog does not have enough
    /// matching questions.
    pub fn select<R: Rng + ?Sized>(
        &self,
        selection: QuestionSelection,
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        let pool: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| selection.matches(q.difficulty))
            .collect();

        pool.choose_multiple(rng, count.min(pool.len()))
            .map(|q| (*q).clone())
            .collect()
    }
}

/// Which difficulty levels an interview draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionSelection {
    Mixed,
    Only(Difficulty),
}

impl QuestionSelection {
    pub fn matches(&self, difficulty: Difficulty) -> bool {
        match self {
            QuestionSelection::Mixed => true,
            QuestionSelection::Only(d) => *d == difficulty,
        }
    }
}

impl fmt::Display for QuestionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionSelection::Mixed => write!(f, "mixed"),
            QuestionSelection::Only(d) => write!(f, "{d}"),
        }
    }
}

impl FromStr for QuestionSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("mixed") {
            Ok(QuestionSelection::Mixed)
        } else {
            s.parse().map(QuestionSelection::Only)
        }
    }
}
