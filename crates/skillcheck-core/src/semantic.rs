//! Semantic scoring on top of an injected [`SemanticCapability`].
//!
//! Two signals come out of here:
//!
//! - **similarity**: cosine similarity of the question and answer embeddings,
//!   clamped to [0, 1]. Measures topical relevance independent of wording.
//! - **quality**: a binary polarity classifier run on the (truncated) answer,
//!   turned into a continuous value. A positive prediction contributes its
//!   probability, a negative one contributes `1 - probability`.
//!
//! The quality signal is sentiment polarity, not correctness. A confidently
//! worded wrong answer can score high and a hedged correct answer low. It is
//! kept because the blend weights depend on it, and should be read as a
//! rough "constructiveness" proxy only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;
use crate::traits::{Classification, SemanticCapability};

/// Longest answer prefix (in characters) sent to the classifier.
pub const CLASSIFIER_MAX_CHARS: usize = 512;

/// Label the default sentiment classifiers use for the positive class.
pub const DEFAULT_POSITIVE_LABEL: &str = "POSITIVE";

/// Semantic component scores, both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticScores {
    pub similarity: f64,
    pub quality: f64,
}

/// Computes [`SemanticScores`] with a shared capability.
#[derive(Clone)]
pub struct SemanticScorer {
    capability: Arc<dyn SemanticCapability>,
    positive_label: String,
}

impl SemanticScorer {
    pub fn new(capability: Arc<dyn SemanticCapability>) -> Self {
        Self {
            capability,
            positive_label: DEFAULT_POSITIVE_LABEL.to_string(),
        }
    }

    /// Override the label treated as the positive class.
    pub fn with_positive_label(mut self, label: impl Into<String>) -> Self {
        self.positive_label = label.into();
        self
    }

    pub fn capability_name(&self) -> &str {
        self.capability.name()
    }

    /// Score an answer against its question.
    ///
    /// Any capability failure, including output we cannot interpret, is
    /// returned as an error for the caller to degrade on.
    pub async fn score(&self, question: &str, answer: &str) -> Result<SemanticScores, CapabilityError> {
        let excerpt = truncate_chars(answer, CLASSIFIER_MAX_CHARS);

        let (question_vec, answer_vec, classification) = futures::try_join!(
            self.capability.embed(question),
            self.capability.embed(answer),
            self.capability.classify(excerpt),
        )?;

        let cosine = self
            .capability
            .cosine_similarity(&question_vec, &answer_vec)?;
        if !cosine.is_finite() {
            return Err(CapabilityError::InvalidOutput(format!(
                "non-finite similarity: {cosine}"
            )));
        }

        Ok(SemanticScores {
            similarity: (cosine as f64).clamp(0.0, 1.0),
            quality: self.quality(&classification)?,
        })
    }

    /// Convert a binary prediction into a [0, 1] quality value.
    pub fn quality(&self, classification: &Classification) -> Result<f64, CapabilityError> {
        let p = classification.probability;
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(CapabilityError::InvalidOutput(format!(
                "classifier probability out of range: {p}"
            )));
        }

        if classification
            .label
            .eq_ignore_ascii_case(&self.positive_label)
        {
            Ok(p)
        } else {
            Ok(1.0 - p)
        }
    }
}

/// Longest prefix of `text` holding at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
