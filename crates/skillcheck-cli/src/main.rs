//! skillcheck CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "skillcheck",
    version,
    about = "Score interview answers and build feedback reports"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a single answer
    Evaluate {
        /// Question catalog (.toml); defaults to `default_catalog` from config
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Question ID within the catalog
        #[arg(long)]
        question: String,

        /// The candidate's answer ("I don't know" skips the question)
        #[arg(long)]
        answer: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Evaluate a scripted answers file and write a session report
    Run {
        /// Question catalog (.toml); defaults to `default_catalog` from config
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Answers file (.toml with [[answers]] entries)
        #[arg(long)]
        answers: PathBuf,

        /// Output directory; defaults to `output_dir` from config
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, text, markdown, all (comma-separated)
        #[arg(long, default_value = "json")]
        format: String,

        /// Max concurrent evaluations
        #[arg(long)]
        parallelism: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-render a saved report
    Report {
        /// Report JSON written by `run`
        #[arg(long)]
        input: PathBuf,

        /// Output format: text, markdown, json, html
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Pick interview questions from a catalog
    Questions {
        /// Question catalog (.toml); defaults to `default_catalog` from config
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// mixed, beginner, intermediate or advanced
        #[arg(long, default_value = "mixed")]
        difficulty: String,

        /// Number of questions
        #[arg(long, default_value = "5")]
        count: usize,

        /// Seed for a reproducible selection
        #[arg(long)]
        seed: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Check whether full semantic scoring is available
    Doctor {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config, catalog and answers file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillcheck=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            catalog,
            question,
            answer,
            format,
            config,
        } => commands::evaluate::execute(catalog, question, answer, format, config).await,
        Commands::Run {
            catalog,
            answers,
            output,
            format,
            parallelism,
            config,
        } => commands::run::execute(catalog, answers, output, format, parallelism, config).await,
        Commands::Report { input, format } => commands::report::execute(input, format),
        Commands::Questions {
            catalog,
            difficulty,
            count,
            seed,
            config,
        } => commands::questions::execute(catalog, difficulty, count, seed, config),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Doctor { config } => commands::doctor::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
