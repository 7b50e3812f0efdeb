//! Confab CLI entry point.

use clap::{Parser, Subcommand};
use confab::Config;
use tracing_subscriber::EnvFilter;

mod cli;

/// Confab: deterministic scheduling-language parser
#[derive(Parser, Debug)]
#[command(name = "confab")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse one scheduling sentence into a meeting record
    Parse {
        /// The scheduling request text
        sentence: String,
        /// Reference instant, RFC 3339 or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        now: Option<String>,
        /// Answers applied in order to any clarification questions
        #[arg(short, long)]
        answer: Vec<String>,
    },
    /// Parse and prompt on stdin for any clarification answers
    Clarify {
        /// The scheduling request text
        sentence: String,
        /// Reference instant, RFC 3339 or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        now: Option<String>,
    },
    /// Show the loaded attendee directory
    Directory,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    match args.command {
        Command::Parse {
            sentence,
            now,
            answer,
        } => cli::run_parse(config, &sentence, now.as_deref(), &answer, args.json),
        Command::Clarify { sentence, now } => {
            cli::run_clarify(config, &sentence, now.as_deref(), args.json)
        }
        Command::Directory => cli::run_directory(config, args.json),
    }
}
