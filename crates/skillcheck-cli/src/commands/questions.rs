//! The `skillcheck questions` command.

use std::path::PathBuf;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use skillcheck_core::model::QuestionSelection;
use skillcheck_providers::config::load_config_from;

pub fn execute(
    catalog_path: Option<PathBuf>,
    difficulty: String,
    count: usize,
    seed: Option<u64>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(count >= 1, "count must be at least 1");
    let selection: QuestionSelection = difficulty.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let config = load_config_from(config_path.as_deref())?;
    let catalog = super::load_catalog(catalog_path, &config)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions = catalog.select(selection, count, &mut rng);

    if questions.is_empty() {
        println!("No {selection} questions in {}.", catalog.name);
        return Ok(());
    }
    if questions.len() < count {
        eprintln!(
            "Only {} {selection} question(s) available in {}.",
            questions.len(),
            catalog.name
        );
    }

    for (i, q) in questions.iter().enumerate() {
        println!("{}. [{}] {} ({})", i + 1, q.difficulty, q.text, q.id);
        if let Some(follow_up) = &q.follow_up {
            println!("   Follow-up: {follow_up}");
        }
    }

    Ok(())
}
