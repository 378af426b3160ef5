use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use super::record::{RecordParser, RowRejection};
use crate::categorize::Categorizer;
use crate::config::{FileErrorPolicy, Settings, SourceProfile};
use crate::models::Transaction;

/// Counters for one ingestion pass; rejected rows are otherwise silent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub(crate) struct IngestStats {
    pub(crate) files_read: usize,
    pub(crate) skipped_files: Vec<PathBuf>,
    pub(crate) rows_accepted: usize,
    pub(crate) rejections: BTreeMap<&'static str, usize>,
}

impl IngestStats {
    fn record_rejection(&mut self, rejection: &RowRejection) {
        *self.rejections.entry(rejection.kind()).or_insert(0) += 1;
    }

    pub(crate) fn rows_rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    fn absorb(&mut self, file: IngestStats) {
        self.rows_accepted += file.rows_accepted;
        for (kind, n) in file.rejections {
            *self.rejections.entry(kind).or_insert(0) += n;
        }
    }
}

/// Flat transaction set from every source file, in file then row order.
#[derive(Debug, Clone, Default)]
pub(crate) struct Ingestion {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) stats: IngestStats,
}

/// All `*.csv` files directly inside `dir`, sorted by path. Hidden files are skipped.
/// A missing directory yields no files.
pub(crate) fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("source directory {} does not exist", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to list source directory: {}", dir.display()))
        }
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to list source directory: {}", dir.display()))?
            .path();
        let hidden = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'));
        if !hidden && path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

pub(crate) fn ingest_dir(settings: &Settings, categorizer: &Categorizer) -> Result<Ingestion> {
    let files = list_source_files(&settings.source_dir)?;
    tracing::debug!(
        "found {} source file(s) in {}",
        files.len(),
        settings.source_dir.display()
    );
    ingest_files(&files, &settings.source, settings.on_file_error, categorizer)
}

pub(crate) fn ingest_files(
    paths: &[PathBuf],
    profile: &SourceProfile,
    policy: FileErrorPolicy,
    categorizer: &Categorizer,
) -> Result<Ingestion> {
    let delimiter = profile.delimiter_byte()?;
    let parser = RecordParser::new(profile, categorizer);
    let mut ingestion = Ingestion::default();

    for path in paths {
        match ingest_file(path, &parser, delimiter) {
            Ok((txns, stats)) => {
                tracing::info!(
                    "{}: {} accepted, {} rejected",
                    path.display(),
                    stats.rows_accepted,
                    stats.rows_rejected()
                );
                ingestion.transactions.extend(txns);
                ingestion.stats.files_read += 1;
                ingestion.stats.absorb(stats);
            }
            Err(e) => match policy {
                FileErrorPolicy::Skip => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                    ingestion.stats.skipped_files.push(path.clone());
                }
                FileErrorPolicy::Abort => return Err(e),
            },
        }
    }

    Ok(ingestion)
}

fn ingest_file(
    path: &Path,
    parser: &RecordParser,
    delimiter: u8,
) -> Result<(Vec<Transaction>, IngestStats)> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_reader(file, parser, delimiter)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse every data row of one export. The first row is always the header.
pub(crate) fn parse_reader<R: Read>(
    reader: R,
    parser: &RecordParser,
    delimiter: u8,
) -> Result<(Vec<Transaction>, IngestStats)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut txns = Vec::new();
    let mut stats = IngestStats::default();

    for result in rdr.records() {
        let outcome = match result {
            Ok(record) => parser.parse(&record).map_err(|r| {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                (line, r)
            }),
            Err(e) if e.is_io_error() => return Err(e).context("I/O error while reading CSV"),
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                Err((line, RowRejection::Malformed(e.to_string())))
            }
        };

        match outcome {
            Ok(txn) => {
                stats.rows_accepted += 1;
                txns.push(txn);
            }
            Err((line, rejection)) => {
                tracing::debug!("line {line}: rejected, {rejection}");
                stats.record_rejection(&rejection);
            }
        }
    }

    Ok((txns, stats))
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
