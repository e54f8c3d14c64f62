//! Evaluate answers with a custom semantic capability.
//!
//! Any type implementing `SemanticCapability` can be injected into the
//! evaluator. This one embeds texts as letter-frequency vectors and calls
//! every answer longer than five words "POSITIVE".
//!
//! ```bash
//! cargo run -p skillcheck-providers --example evaluate_answer
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use skillcheck_core::catalog::parse_catalog;
use skillcheck_core::error::CapabilityError;
use skillcheck_core::evaluator::{EvaluatorConfig, ResponseEvaluator};
use skillcheck_core::session::InterviewSession;
use skillcheck_core::traits::{Classification, SemanticCapability};

struct LetterFrequency;

#[async_trait]
impl SemanticCapability for LetterFrequency {
    fn name(&self) -> &str {
        "letter-frequency"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CapabilityError> {
        let mut counts = vec![0.0f32; 26];
        for c in text.chars().filter(char::is_ascii_alphabetic) {
            counts[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
        }
        Ok(counts)
    }

    async fn classify(&self, text: &str) -> Result<Classification, CapabilityError> {
        let long_enough = text.split_whitespace().count() > 5;
        Ok(Classification {
            label: if long_enough { "POSITIVE" } else { "NEGATIVE" }.into(),
            probability: 0.75,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../catalogs/excel-basics.toml");
    let catalog = parse_catalog(path.as_ref())?;
    println!("Loaded catalog: {} ({} questions)", catalog.name, catalog.questions.len());

    let capability: Arc<dyn SemanticCapability> = Arc::new(LetterFrequency);
    let evaluator = ResponseEvaluator::new(Some(capability), EvaluatorConfig::default());

    let answers = [
        (
            "iferror",
            "IFERROR returns an alternative value when a formula hits an error, which keeps data clean.",
        ),
        ("pivot-tables", "They summarize data."),
        ("macros", "I don't know"),
    ];

    let mut session = InterviewSession::new();
    for (id, answer) in answers {
        let question = catalog
            .question(id)
            .ok_or_else(|| anyhow::anyhow!("question '{id}' not in catalog"))?;
        let record = session.answer(&evaluator, question, answer).await?;
        println!(
            "{:<16} {:>6.2}  confidence {:.1}  missing: {}",
            id,
            record.evaluation.score,
            record.evaluation.confidence,
            record.evaluation.keywords_missing.join(", ")
        );
    }

    let report = session.finish();
    println!("\n{}", report.to_text());
    Ok(())
}
