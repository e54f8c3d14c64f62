//! skillcheck-providers: Semantic capability backends.
//!
//! Implements the `SemanticCapability` trait for the Hugging Face Inference
//! API and a deterministic mock, plus configuration loading.

pub mod config;
pub mod error;
pub mod huggingface;
pub mod mock;

pub use config::{
    build_evaluator, create_capability, load_config, load_config_from, CapabilityConfig,
    SkillcheckConfig,
};
pub use error::ProviderError;
pub use huggingface::{HuggingFaceCapability, HuggingFaceOptions};
pub use mock::MockCapability;
