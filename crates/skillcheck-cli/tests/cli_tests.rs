//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn skillcheck() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("skillcheck").unwrap();
    cmd.env_remove("SKILLCHECK_HF_TOKEN");
    cmd
}

fn catalog() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../catalogs/excel-basics.toml")
}

/// Write a config file selecting the given capability section.
fn write_config(dir: &TempDir, capability: &str) -> PathBuf {
    let path = dir.path().join("skillcheck.toml");
    let content = format!(
        "output_dir = \"{}\"\n\n[capability]\n{capability}\n",
        dir.path().join("out").display()
    );
    std::fs::write(&path, content).unwrap();
    path
}

fn keyword_only_config(dir: &TempDir) -> PathBuf {
    write_config(dir, "type = \"disabled\"")
}

#[test]
fn validate_sample_catalog() {
    skillcheck()
        .arg("validate")
        .arg("--catalog")
        .arg(catalog())
        .assert()
        .success()
        .stdout(predicate::str::contains("Excel Skills (7 questions)"))
        .stdout(predicate::str::contains("All catalogs valid"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dupes.toml");
    std::fs::write(
        &path,
        r#"
[catalog]
id = "dupes"
name = "Dupes"

[[questions]]
id = "q1"
text = "Why?"
difficulty = "beginner"
expected_keywords = ["Range", "range"]
"#,
    )
    .unwrap();

    skillcheck()
        .arg("validate")
        .arg("--catalog")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[q1] WARNING: duplicate keyword"))
        .stdout(predicate::str::contains("1 warning(s) found"));
}

#[test]
fn validate_nonexistent_file() {
    skillcheck()
        .arg("validate")
        .arg("--catalog")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_keyword_only() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("iferror")
        .arg("--answer")
        .arg("IFERROR lets you handle an error and return an alternative value")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 63.75/100 (Fair)"))
        .stdout(predicate::str::contains("Confidence: 0.5 (keywords only)"))
        .stdout(predicate::str::contains("Keywords missing: iserror, clean data"))
        .stdout(predicate::str::contains(
            "Follow-up: When would you choose IFERROR over ISERROR",
        ));
}

#[test]
fn evaluate_with_mock_capability_is_full_confidence() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "type = \"mock\"");

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("pivot-tables")
        .arg("--answer")
        .arg("Pivot tables summarize data: drag and drop fields into rows, columns and values, then filter.")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"confidence\": 0.8"))
        .stdout(predicate::str::contains("\"keywords_found\""));
}

#[test]
fn evaluate_failing_capability_degrades() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "type = \"mock\"\nfail = true");

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("iferror")
        .arg("--answer")
        .arg("IFERROR lets you handle an error and return an alternative value")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 63.75/100"))
        .stdout(predicate::str::contains("keywords only"));
}

#[test]
fn evaluate_skip_sentinel() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("macros")
        .arg("--answer")
        .arg("I don't know")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0.00/100"))
        .stdout(predicate::str::contains("Candidate skipped this question."));
}

#[test]
fn evaluate_rejects_empty_answer() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("macros")
        .arg("--answer")
        .arg("   ")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn evaluate_unknown_question() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);

    skillcheck()
        .arg("evaluate")
        .arg("--catalog")
        .arg(catalog())
        .arg("--question")
        .arg("no-such-question")
        .arg("--answer")
        .arg("anything")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn run_writes_reports_and_report_rerenders() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);
    let answers = dir.path().join("answers.toml");
    std::fs::write(
        &answers,
        r#"
[[answers]]
question_id = "lookup-functions"
answer = "VLOOKUP searches a table vertically, HLOOKUP searches horizontally across a row."

[[answers]]
question_id = "iferror"
answer = ""

[[answers]]
question_id = "macros"
skip = true
"#,
    )
    .unwrap();
    let out = dir.path().join("out");

    skillcheck()
        .arg("run")
        .arg("--catalog")
        .arg(catalog())
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&out)
        .arg("--format")
        .arg("all")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("REJECTED: #2 iferror"))
        .stderr(predicate::str::contains("2 evaluated, 1 rejected"))
        .stderr(predicate::str::contains("Overall:"));

    let files: Vec<PathBuf> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 4);
    let json = files
        .iter()
        .find(|p| p.extension().is_some_and(|e| e == "json"))
        .unwrap();

    skillcheck()
        .arg("report")
        .arg("--input")
        .arg(json)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("## Skills Assessment"))
        .stdout(predicate::str::contains("lookup-functions"));

    skillcheck()
        .arg("report")
        .arg("--input")
        .arg(json)
        .assert()
        .success()
        .stdout(predicate::str::contains("SKILLS ASSESSMENT REPORT"))
        .stdout(predicate::str::contains("Total Questions: 2"));
}

#[test]
fn run_rejects_unknown_question_id() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);
    let answers = dir.path().join("answers.toml");
    std::fs::write(
        &answers,
        "[[answers]]\nquestion_id = \"nope\"\nanswer = \"x\"\n",
    )
    .unwrap();

    skillcheck()
        .arg("run")
        .arg("--catalog")
        .arg(catalog())
        .arg("--answers")
        .arg(&answers)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("question 'nope' not found"));
}

#[test]
fn questions_seeded_selection() {
    skillcheck()
        .arg("questions")
        .arg("--catalog")
        .arg(catalog())
        .arg("--count")
        .arg("3")
        .arg("--seed")
        .arg("7")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. ["))
        .stdout(predicate::str::contains("3. ["))
        .stdout(predicate::str::contains("4. [").not());
}

#[test]
fn questions_by_difficulty_caps_at_available() {
    skillcheck()
        .arg("questions")
        .arg("--catalog")
        .arg(catalog())
        .arg("--difficulty")
        .arg("beginner")
        .arg("--count")
        .arg("5")
        .assert()
        .success()
        .stdout(predicate::str::contains("lookup-functions"))
        .stdout(predicate::str::contains("conditional-formatting"))
        .stdout(predicate::str::contains("macros").not())
        .stderr(predicate::str::contains("Only 2 beginner question(s)"));
}

#[test]
fn questions_unknown_difficulty() {
    skillcheck()
        .arg("questions")
        .arg("--catalog")
        .arg(catalog())
        .arg("--difficulty")
        .arg("legendary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown difficulty"));
}

#[test]
fn doctor_without_capability() {
    let dir = TempDir::new().unwrap();
    let config = keyword_only_config(&dir);

    skillcheck()
        .arg("doctor")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("scored on keywords only"));
}

#[test]
fn doctor_reports_missing_token() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "type = \"huggingface\"\napi_key = \"${SKILLCHECK_HF_TOKEN}\"",
    );

    skillcheck()
        .arg("doctor")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No Hugging Face token set"))
        .stdout(predicate::str::contains("scored on keywords only"));
}

#[test]
fn run_without_token_reports_keyword_only_scoring() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        &dir,
        "type = \"huggingface\"\napi_key = \"${SKILLCHECK_HF_TOKEN}\"",
    );
    let answers = dir.path().join("answers.toml");
    std::fs::write(
        &answers,
        "[[answers]]\nquestion_id = \"iferror\"\nanswer = \"IFERROR returns an alternative value\"\n",
    )
    .unwrap();

    skillcheck()
        .arg("run")
        .arg("--catalog")
        .arg(catalog())
        .arg("--answers")
        .arg(&answers)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stderr(predicate::str::contains("scoring: keyword-only"));
}

#[test]
fn doctor_with_failing_capability_is_temporary() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "type = \"mock\"\nfail = true");

    skillcheck()
        .arg("doctor")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Capability 'mock' is unavailable"))
        .stdout(predicate::str::contains("This may be temporary"))
        .stdout(predicate::str::contains("scored on keywords only"));
}

#[test]
fn doctor_with_mock_capability() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "type = \"mock\"");

    skillcheck()
        .arg("doctor")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Capability 'mock' is available"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created skillcheck.toml"))
        .stdout(predicate::str::contains("Created catalogs/excel-basics.toml"))
        .stdout(predicate::str::contains("Created answers/example.toml"));

    assert!(dir.path().join("skillcheck.toml").exists());
    assert!(dir.path().join("catalogs/excel-basics.toml").exists());

    // The generated catalog is valid as-is.
    skillcheck()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--catalog")
        .arg("catalogs/excel-basics.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("All catalogs valid"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    skillcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    skillcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    skillcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Score interview answers"));
}

#[test]
fn version_output() {
    skillcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("skillcheck"));
}
