//! The semantic capability seam.
//!
//! Implemented by the backends in `skillcheck-providers`. The evaluator only
//! ever sees `Arc<dyn SemanticCapability>` and owns no model lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;

/// Text embedding plus binary text classification.
///
/// Implementations must be safe to call concurrently from many in-flight
/// evaluations and must not mutate model state per call.
#[async_trait]
pub trait SemanticCapability: Send + Sync {
    /// Human-readable backend name (e.g. "huggingface").
    fn name(&self) -> &str;

    /// Embed a text into a dense vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError>;

    /// Classify a text with a binary polarity classifier.
    async fn classify(&self, text: &str) -> Result<Classification, CapabilityError>;

    /// Similarity between two embeddings, in [-1, 1].
    fn cosine_similarity(&self, a: &[f32], b: &[f32]) -> Result<f32, CapabilityError> {
        cosine_similarity(a, b)
    }

    /// Cheap health check used to report whether full scoring is possible.
    async fn probe(&self) -> Result<(), CapabilityError> {
        self.embed("health check").await.map(|_| ())
    }
}

/// A classifier prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Predicted label (e.g. "POSITIVE").
    pub label: String,
    /// Probability of the predicted label, in [0, 1].
    pub probability: f64,
}

/// Cosine similarity of two vectors.
///
/// Zero vectors have similarity 0. Mismatched or empty inputs are an
/// [`CapabilityError::InvalidOutput`], since they mean the embedder produced
/// something unusable.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, CapabilityError> {
    if a.len() != b.len() {
        return Err(CapabilityError::InvalidOutput(format!(
            "embedding dimension mismatch: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    if a.is_empty() {
        return Err(CapabilityError::InvalidOutput("empty embedding".into()));
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot / (norm_a * norm_b))
    }
}
