//! The `skillcheck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use skillcheck_core::catalog::{load_catalogs, validate_catalog};

pub fn execute(catalog_path: PathBuf) -> Result<()> {
    let catalogs = load_catalogs(&catalog_path)?;

    let mut total_warnings = 0;

    for catalog in &catalogs {
        println!(
            "Catalog: {} ({} questions)",
            catalog.name,
            catalog.questions.len()
        );

        let warnings = validate_catalog(catalog);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All catalogs valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
