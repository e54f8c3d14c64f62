//! One module per subcommand.

pub mod doctor;
pub mod evaluate;
pub mod init;
pub mod questions;
pub mod report;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};

use skillcheck_core::catalog::load_catalogs;
use skillcheck_core::model::Catalog;
use skillcheck_providers::SkillcheckConfig;

/// Load the single catalog a command works on.
///
/// An explicit `--catalog` wins over `default_catalog` from config.
pub fn load_catalog(path: Option<PathBuf>, config: &SkillcheckConfig) -> Result<Catalog> {
    let path = path
        .or_else(|| config.default_catalog.clone())
        .context("no catalog given; pass --catalog or set default_catalog in skillcheck.toml")?;

    let mut catalogs = load_catalogs(&path)?;
    match catalogs.len() {
        0 => anyhow::bail!("no catalogs found at {}", path.display()),
        1 => Ok(catalogs.remove(0)),
        n => anyhow::bail!(
            "{} contains {n} catalogs; pass a single catalog file",
            path.display()
        ),
    }
}
