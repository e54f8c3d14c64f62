//! Mock semantic capability for testing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;

use skillcheck_core::error::CapabilityError;
use skillcheck_core::semantic::DEFAULT_POSITIVE_LABEL;
use skillcheck_core::traits::{Classification, SemanticCapability};

/// Embedding width of the mock backend.
pub const MOCK_DIMENSIONS: usize = 64;

/// A deterministic capability for exercising the full scoring path without
/// a model server.
///
/// Embeddings are hashed bag-of-words vectors, so texts that share words are
/// similar and texts that share none have similarity 0.
pub struct MockCapability {
    classification: Classification,
    failing: AtomicBool,
    call_count: AtomicU32,
}

impl Default for MockCapability {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCapability {
    /// A mock that classifies everything as positive with probability 0.9.
    pub fn new() -> Self {
        Self::with_classification(DEFAULT_POSITIVE_LABEL, 0.9)
    }

    /// A mock that always returns the given classification.
    pub fn with_classification(label: &str, probability: f64) -> Self {
        Self {
            classification: Classification {
                label: label.to_string(),
                probability,
            },
            failing: AtomicBool::new(false),
            call_count: AtomicU32::new(0),
        }
    }

    /// A mock whose every call fails as unavailable.
    pub fn failing() -> Self {
        let mock = Self::new();
        mock.set_failing(true);
        mock
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Get the number of embed/classify calls made.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn enter(&self) -> Result<(), CapabilityError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if self.failing.load(Ordering::Relaxed) {
            Err(CapabilityError::Unavailable("mock capability set to fail".into()))
        } else {
            Ok(())
        }
    }
}

/// Hash each lowercase word into one of [`MOCK_DIMENSIONS`] buckets.
pub fn bag_of_words(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; MOCK_DIMENSIONS];
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let bucket = fnv1a(&word.to_lowercase()) as usize % MOCK_DIMENSIONS;
        v[bucket] += 1.0;
    }
    v
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

#[async_trait]
impl SemanticCapability for MockCapability {
    fn name(&self) -> &str {
        "mock"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
        self.enter()?;
        Ok(bag_of_words(text))
    }

    async fn classify(&self, _text: &str) -> Result<Classification, CapabilityError> {
        self.enter()?;
        Ok(self.classification.clone())
    }
}
