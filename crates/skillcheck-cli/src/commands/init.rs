//! The `skillcheck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("skillcheck.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("catalogs")?;
    write_if_missing(Path::new("catalogs/excel-basics.toml"), SAMPLE_CATALOG)?;

    std::fs::create_dir_all("answers")?;
    write_if_missing(Path::new("answers/example.toml"), SAMPLE_ANSWERS)?;

    println!("\nNext steps:");
    println!("  1. Set SKILLCHECK_HF_TOKEN or edit skillcheck.toml to enable semantic scoring");
    println!("  2. Run: skillcheck doctor");
    println!("  3. Run: skillcheck run --answers answers/example.toml --format all");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillcheck configuration

default_catalog = "catalogs/excel-basics.toml"
output_dir = "./skillcheck-results"
capability_timeout_ms = 10000
positive_label = "POSITIVE"
parallelism = 4

# Without a [capability] section answers are scored on keywords only.
[capability]
type = "huggingface"
api_key = "${SKILLCHECK_HF_TOKEN}"
embedding_model = "sentence-transformers/all-MiniLM-L6-v2"
classifier_model = "distilbert-base-uncased-finetuned-sst-2-english"
"#;

const SAMPLE_CATALOG: &str = include_str!("../../../../catalogs/excel-basics.toml");

const SAMPLE_ANSWERS: &str = r#"[[answers]]
question_id = "lookup-functions"
answer = "VLOOKUP searches a table vertically down the first column, HLOOKUP searches horizontally across the first row of the range."

[[answers]]
question_id = "iferror"
answer = "IFERROR lets you handle an error such as #N/A and return an alternative value, which helps clean data."

[[answers]]
question_id = "macros"
skip = true
"#;
