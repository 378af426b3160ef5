mod cli;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::analytics::MonthlyAggregate;
use crate::categorize::Categorizer;
use crate::config::Settings;
use crate::import::{self, IngestStats};
use crate::models::Transaction;

pub(crate) use cli::as_cli;

/// Global flags plus the command and its own arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Options {
    pub(crate) command: String,
    pub(crate) args: Vec<String>,
    pub(crate) dir: Option<PathBuf>,
    pub(crate) config: Option<PathBuf>,
    pub(crate) json: bool,
    pub(crate) verbose: bool,
}

impl Options {
    /// Global flags may appear anywhere; everything else is passed to the command.
    pub(crate) fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Options {
            command: String::new(),
            args: Vec::new(),
            dir: None,
            config: None,
            json: false,
            verbose: false,
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--dir" => {
                    let value = iter.next().context("--dir requires a path")?;
                    opts.dir = Some(PathBuf::from(value));
                }
                "--config" => {
                    let value = iter.next().context("--config requires a path")?;
                    opts.config = Some(PathBuf::from(value));
                }
                "--json" => opts.json = true,
                "-v" | "--verbose" => opts.verbose = true,
                _ if opts.command.is_empty() => opts.command = arg.clone(),
                _ => opts.args.push(arg.clone()),
            }
        }

        if opts.command.is_empty() {
            opts.command = "report".into();
        }
        Ok(opts)
    }
}

/// Everything one query needs, rebuilt from the source files on every call.
pub(crate) struct Dataset {
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) stats: IngestStats,
    pub(crate) aggregate: MonthlyAggregate,
}

impl Dataset {
    pub(crate) fn load(settings: &Settings) -> Result<Self> {
        let categorizer = Categorizer::new(&settings.categories);
        let ingestion = import::ingest_dir(settings, &categorizer)?;
        let stats = ingestion.stats;
        if stats.rows_rejected() > 0 || !stats.skipped_files.is_empty() {
            tracing::info!(
                "{} row(s) rejected, {} file(s) skipped",
                stats.rows_rejected(),
                stats.skipped_files.len()
            );
        }

        let aggregate = MonthlyAggregate::build(&ingestion.transactions);
        tracing::debug!(
            "{} transaction(s) across {} month(s)",
            ingestion.transactions.len(),
            aggregate.month_count()
        );
        Ok(Self {
            transactions: ingestion.transactions,
            stats,
            aggregate,
        })
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
