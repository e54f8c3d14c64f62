//! skillcheck-core: Answer scoring, session aggregation, and reports.
//!
//! This crate defines the question model, the semantic capability trait,
//! the response evaluator with its keyword-only fallback, and the session
//! aggregation that the rest of skillcheck builds on.

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod model;
pub mod report;
pub mod results;
pub mod scoring;
pub mod semantic;
pub mod session;
pub mod traits;
