mod entry;
mod error;
mod parser;
mod pipeline;
mod settings;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use parser::extract::{Language, Registry};
use parser::normalize::UnknownLabelPolicy;
use settings::Settings;

#[derive(Parser)]
#[command(
    name = "wiktionary_extractor",
    about = "Extract dictionary records from rendered Wiktionary pages as JSON lines"
)]
struct Cli {
    /// Wiktionary edition the pages come from
    #[arg(value_enum)]
    lang: Language,

    /// Page files, or directories whose files are all read
    #[arg(required = true)]
    roots: Vec<PathBuf>,

    /// Worker threads (default: WIKTEXTRACT_WORKER, else 1)
    #[arg(short, long)]
    worker: Option<usize>,

    /// Write records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to do with inline labels the edition does not know
    #[arg(long, value_enum)]
    unknown_labels: Option<UnknownLabelPolicy>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let workers = cli.worker.unwrap_or(settings.worker);
    let registry = Registry::for_language(cli.lang, cli.unknown_labels.or(settings.unknown_labels));
    let files = pipeline::collect_inputs(&cli.roots)?;
    info!(
        language = cli.lang.code(),
        policy = ?registry.policy,
        extractors = registry.descriptors().len(),
        workers,
        documents = files.len(),
        "Starting extraction"
    );

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };
    let stats = pipeline::run_batch(&registry, &files, workers, &mut out, !cli.quiet)?;
    out.flush()?;

    info!(
        entries = stats.entries,
        failed = stats.failed,
        elapsed = %format!("{:.1}s", t0.elapsed().as_secs_f64()),
        "Done"
    );
    Ok(())
}
