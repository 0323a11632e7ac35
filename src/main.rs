//! trace-annotator - terminal annotator for LLM reasoning traces

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use trace_annotator::annotator::Annotator;
use trace_annotator::config::Config;
use trace_annotator::document::DocumentSet;
use trace_annotator::error::Result;
use trace_annotator::session::Session;
use trace_annotator::terminal::Terminal;

#[derive(Parser, Debug)]
#[command(
    name = "trace-annotator",
    version,
    about = "Annotate LLM reasoning traces with labelled highlight spans",
    after_help = "Press F1 or ? in the annotator for the key binding list"
)]
struct Cli {
    /// JSON file of traces: [{"id", "question", "reasoning"}]; built-in samples if omitted
    traces: Option<PathBuf>,

    /// Config file (default ~/.trace-annotator.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where exported annotations are written
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(path) = cli.export {
        config.export_path = path;
    }
    if let Some(path) = cli.traces {
        config.traces = Some(path);
    }

    init_logging(&config)?;

    let documents = match &config.traces {
        Some(path) => DocumentSet::from_path(path)?,
        None => DocumentSet::samples(),
    };
    tracing::debug!(traces = documents.len(), "loaded traces");

    let session = Session::new(documents, config);

    // Terminal last so load errors print on a normal screen
    let terminal = Terminal::new()?;
    let mut annotator = Annotator::new(session, terminal);
    annotator.run()
}

/// Log to the configured file; without one, logging stays off
fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
