use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::parser::extract::Registry;
use crate::parser::{self, DocumentReport};

/// The writer side of a batch has stopped receiving.
#[derive(Debug)]
struct WriterGone;

/// Totals over one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub documents: usize,
    pub unreadable: usize,
    pub entries: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Input files for `roots`: files as given, directories by their direct
/// children in name order.
pub fn collect_inputs(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        if !root.is_dir() {
            files.push(root.clone());
            continue;
        }
        let mut children = fs::read_dir(root)
            .and_then(|dir| dir.map(|e| e.map(|e| e.path())).collect::<std::io::Result<Vec<_>>>())
            .with_context(|| format!("listing {}", root.display()))?;
        children.retain(|p| p.is_file());
        children.sort();
        files.extend(children);
    }
    Ok(files)
}

pub fn process_file(registry: &Registry, path: &Path) -> Result<DocumentReport> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(parser::process_page(registry, &path.display().to_string(), &source))
}

/// Extract every file on a pool of `workers` threads. Each document's
/// records are written as JSON lines as soon as it completes, so output
/// order follows completion order. A document that cannot be read is logged
/// and skipped.
pub fn run_batch<W: Write>(
    registry: &Registry,
    files: &[PathBuf],
    workers: usize,
    out: &mut W,
    progress: bool,
) -> Result<BatchStats> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .context("building worker pool")?;

    let pb = if progress {
        ProgressBar::new(files.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut stats = BatchStats::default();
    thread::scope(|scope| -> Result<()> {
        // Workers send finished documents, this thread writes them.
        let (tx, rx) = mpsc::channel::<(&Path, Result<DocumentReport>)>();
        scope.spawn(move || {
            // A failed send means the writer gave up; stop taking new files.
            pool.install(|| {
                files.par_iter().try_for_each_with(tx, |tx, path| {
                    tx.send((path.as_path(), process_file(registry, path)))
                        .map_err(|_| WriterGone)
                })
            })
        });

        for (path, outcome) in rx {
            stats.documents += 1;
            match outcome {
                Ok(report) => {
                    stats.entries += report.entries.len();
                    stats.skipped += report.skipped;
                    stats.failed += report.failures.len();
                    for entry in &report.entries {
                        writeln!(out, "{}", entry.to_json_line()?)?;
                    }
                    out.flush()?;
                }
                Err(e) => {
                    stats.unreadable += 1;
                    warn!(path = %path.display(), error = %format!("{:#}", e), "Skipping document");
                }
            }
            pb.inc(1);
        }
        Ok(())
    })?;

    pb.finish_and_clear();
    info!(
        language = registry.language.code(),
        documents = stats.documents,
        unreadable = stats.unreadable,
        entries = stats.entries,
        skipped = stats.skipped,
        failed = stats.failed,
        "Extraction finished"
    );
    Ok(stats)
}
