//! Evaluation result types.

use serde::{Deserialize, Serialize};

use crate::feedback::Tier;
use crate::model::{Difficulty, Question};

/// The outcome of evaluating one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Final score in [0, 100], rounded to two decimal places.
    pub score: f64,
    /// Qualitative evaluation text for the score's tier.
    pub evaluation: String,
    /// Suggestion text for the score's tier.
    pub suggestions: String,
    /// Expected keywords present in the answer, in catalog order.
    pub keywords_found: Vec<String>,
    /// Expected keywords absent from the answer, in catalog order.
    pub keywords_missing: Vec<String>,
    /// 0.8 for full semantic scoring, 0.5 for keyword-only scoring, 0.0 for
    /// a skipped question.
    pub confidence: f64,
}

impl EvaluationResult {
    pub fn tier(&self) -> Tier {
        Tier::from_score(self.score)
    }
}

/// One answered (or skipped) question in a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question: Question,
    pub difficulty: Difficulty,
    /// The answer exactly as given.
    pub answer: String,
    pub evaluation: EvaluationResult,
    #[serde(default)]
    pub skipped: bool,
}

impl ResponseRecord {
    pub fn new(question: Question, answer: impl Into<String>, evaluation: EvaluationResult) -> Self {
        Self {
            difficulty: question.difficulty,
            question,
            answer: answer.into(),
            evaluation,
            skipped: false,
        }
    }

    pub fn skipped(question: Question, answer: impl Into<String>, evaluation: EvaluationResult) -> Self {
        Self {
            skipped: true,
            ..Self::new(question, answer, evaluation)
        }
    }
}
