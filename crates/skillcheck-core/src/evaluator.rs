//! Single-answer evaluation.
//!
//! [`ResponseEvaluator`] turns a (question, answer) pair into an
//! [`EvaluationResult`]. It always computes keyword and length scores, tries
//! the semantic capability when one was injected, and falls back to
//! keyword-only scoring when the capability is missing, fails, or times out.
//! Capability failures never reach the caller except as a lower confidence.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::feedback::Tier;
use crate::model::Question;
use crate::results::EvaluationResult;
use crate::scoring::{length_score, match_keywords, DegradeReason, KeywordMatch, ScoreOutcome};
use crate::semantic::{SemanticScorer, DEFAULT_POSITIVE_LABEL};
use crate::traits::SemanticCapability;

/// Evaluation text for a skipped question.
pub const SKIPPED_EVALUATION: &str = "Candidate skipped this question.";
/// Suggestion text for a skipped question.
pub const SKIPPED_SUGGESTIONS: &str = "Review this topic before your next interview.";
/// Confidence reported for a skipped question.
pub const SKIPPED_CONFIDENCE: f64 = 0.0;

/// Configuration for the evaluator.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Upper bound on one semantic scoring call (embeddings + classification).
    pub capability_timeout: Duration,
    /// Classifier label treated as the positive class.
    pub positive_label: String,
    /// Maximum concurrent evaluations in [`ResponseEvaluator::evaluate_batch`].
    pub parallelism: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            capability_timeout: Duration::from_secs(10),
            positive_label: DEFAULT_POSITIVE_LABEL.to_string(),
            parallelism: 4,
        }
    }
}

/// Scores answers, with or without a semantic capability.
#[derive(Clone)]
pub struct ResponseEvaluator {
    semantic: Option<SemanticScorer>,
    config: EvaluatorConfig,
}

impl ResponseEvaluator {
    pub fn new(capability: Option<Arc<dyn SemanticCapability>>, config: EvaluatorConfig) -> Self {
        let semantic = capability
            .map(|cap| SemanticScorer::new(cap).with_positive_label(config.positive_label.clone()));
        Self { semantic, config }
    }

    /// An evaluator that always runs in degraded (keyword-only) mode.
    pub fn keyword_only() -> Self {
        Self::new(None, EvaluatorConfig::default())
    }

    /// Returns `true` if a semantic capability was injected.
    pub fn has_capability(&self) -> bool {
        self.semantic.is_some()
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Compute the component scores for an answer, tagged by scoring path.
    pub async fn score(&self, question: &Question, answer: &str) -> ScoreOutcome {
        let keywords = match_keywords(answer, &question.expected_keywords);
        self.score_with(question, answer, &keywords).await
    }

    /// Score against an already computed keyword match, so the blended
    /// keyword score and the reported found/missing lists share one source.
    async fn score_with(
        &self,
        question: &Question,
        answer: &str,
        keywords: &KeywordMatch,
    ) -> ScoreOutcome {
        let length = length_score(answer);

        let Some(scorer) = &self.semantic else {
            return ScoreOutcome::Degraded {
                keyword: keywords.score,
                reason: DegradeReason::Unavailable,
            };
        };

        let timeout = self.config.capability_timeout;
        let reason = match tokio::time::timeout(timeout, scorer.score(&question.text, answer)).await {
            Ok(Ok(semantic)) => {
                return ScoreOutcome::Full {
                    keyword: keywords.score,
                    similarity: semantic.similarity,
                    quality: semantic.quality,
                    length,
                };
            }
            Ok(Err(e)) => DegradeReason::Failed(e.to_string()),
            Err(_) => DegradeReason::TimedOut(timeout.as_millis() as u64),
        };

        tracing::warn!(
            question = %question.id,
            capability = scorer.capability_name(),
            "falling back to keyword-only scoring: {reason}"
        );

        ScoreOutcome::Degraded {
            keyword: keywords.score,
            reason,
        }
    }

    /// Evaluate one answer.
    ///
    /// The question must already satisfy
    /// [`validate_question`](crate::model::validate_question); skipped
    /// questions go through [`skip`](Self::skip) instead.
    pub async fn evaluate(&self, question: &Question, answer: &str) -> EvaluationResult {
        let keywords = match_keywords(answer, &question.expected_keywords);
        let outcome = self.score_with(question, answer, &keywords).await;
        let score = outcome.final_score();
        let tier = Tier::from_score(score);

        tracing::debug!(
            question = %question.id,
            score,
            degraded = outcome.is_degraded(),
            tier = %tier,
            "evaluated answer"
        );

        EvaluationResult {
            score,
            evaluation: tier.evaluation().to_string(),
            suggestions: tier.suggestions().to_string(),
            keywords_found: keywords.found,
            keywords_missing: keywords.missing,
            confidence: outcome.confidence(),
        }
    }

    /// The fixed result for a skipped question.
    pub fn skip(&self, question: &Question) -> EvaluationResult {
        EvaluationResult {
            score: 0.0,
            evaluation: SKIPPED_EVALUATION.to_string(),
            suggestions: SKIPPED_SUGGESTIONS.to_string(),
            keywords_found: Vec::new(),
            keywords_missing: question.expected_keywords.clone(),
            confidence: SKIPPED_CONFIDENCE,
        }
    }

    /// Evaluate many answers with bounded parallelism.
    ///
    /// Results come back in input order.
    pub async fn evaluate_batch(&self, items: &[(Question, String)]) -> Vec<EvaluationResult> {
        stream::iter(items)
            .map(|(question, answer)| self.evaluate(question, answer))
            .buffered(self.config.parallelism.max(1))
            .collect()
            .await
    }
}
