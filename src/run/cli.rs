use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::{Dataset, Options};
use crate::analytics::{
    category_averages, category_totals, category_transactions, category_transactions_in_month,
    month_detail, monthly_series, transactions_by_date_asc, transactions_by_date_desc, trends,
};
use crate::config::Settings;
use crate::models::CategoryRule;
use crate::report;

const DEFAULT_TRAILING_MONTHS: usize = 3;

pub(crate) fn as_cli(opts: &Options) -> Result<()> {
    match opts.command.as_str() {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("cardspend {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let mut settings = Settings::load(opts.config.as_deref().map(expand).as_deref())?;
    if let Some(dir) = &opts.dir {
        settings.source_dir = expand(dir);
    }

    match opts.command.as_str() {
        "report" | "r" => cli_report(opts, &settings),
        "transactions" | "tx" => cli_transactions(opts, &settings),
        "totals" => cli_totals(opts, &settings),
        "series" => cli_series(opts, &settings),
        "averages" | "avg" => cli_averages(opts, &settings),
        "trends" => cli_trends(opts, &settings),
        "month" | "m" => cli_month(opts, &settings),
        "category" | "c" => cli_category(opts, &settings),
        "categories" => cli_categories(opts, &settings),
        "stats" => cli_stats(opts, &settings),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("cardspend — monthly card spending by category");
    println!();
    println!("Usage: cardspend [options] [command]");
    println!();
    println!("Commands:");
    println!("  report                        Month × category grid (default)");
    println!("  transactions [--asc]          All transactions, newest first");
    println!("  totals                        Per-category totals over all months");
    println!("  series                        Per-category values for every month");
    println!("  averages [--months N]         Overall and trailing averages (default N=3)");
    println!("  trends                        Latest month against the one before");
    println!("  month [YYYY-MM]               Month detail (default: most recent)");
    println!("  category <id> [YYYY-MM]       Transactions for one category");
    println!("    --latest                    Restrict to the most recent month");
    println!("  categories                    Show the category table");
    println!("  stats                         Ingestion counts and rejected rows");
    println!();
    println!("Options:");
    println!("  --dir <path>                  Source directory (default: ./expense_reports)");
    println!("  --config <path>               Settings file");
    println!("  --json                        Print JSON instead of tables");
    println!("  -v, --verbose                 Debug logging on stderr");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn emit<T: Serialize>(opts: &Options, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn cli_report(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    let order = settings.categories.display_order();
    emit(opts, &data.aggregate, || report::render_grid(&data.aggregate, order))
}

fn cli_transactions(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    let sorted = if has_flag(&opts.args, "--asc") {
        transactions_by_date_asc(&data.transactions)
    } else {
        transactions_by_date_desc(&data.transactions)
    };
    emit(opts, &sorted, || report::render_transactions(&sorted))
}

fn cli_totals(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    let totals = category_totals(&data.aggregate, settings.categories.display_order());
    emit(opts, &totals, || report::render_totals(&totals))
}

fn cli_series(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    let series = monthly_series(&data.aggregate, settings.categories.display_order());
    emit(opts, &series, || report::render_series(&series))
}

fn cli_averages(opts: &Options, settings: &Settings) -> Result<()> {
    let months = match flag_value(&opts.args, "--months") {
        Some(raw) => {
            let n: usize = raw
                .parse()
                .with_context(|| format!("Invalid --months value: {raw}"))?;
            if n == 0 {
                anyhow::bail!("--months must be at least 1");
            }
            n
        }
        None => DEFAULT_TRAILING_MONTHS,
    };

    let data = Dataset::load(settings)?;
    let averages = category_averages(&data.aggregate, settings.categories.display_order(), months);
    emit(opts, &averages, || report::render_averages(&averages))
}

fn cli_trends(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    let trends = trends(&data.aggregate, settings.categories.display_order());
    emit(opts, &trends, || report::render_trends(trends.as_deref()))
}

fn cli_month(opts: &Options, settings: &Settings) -> Result<()> {
    let requested = positional(&opts.args, 0);
    let data = Dataset::load(settings)?;
    warn_missing_month(&data, requested);

    let detail = month_detail(
        &data.aggregate,
        &data.transactions,
        settings.categories.display_order(),
        requested,
    );
    emit(opts, &detail, || report::render_month_detail(detail.as_ref()))
}

fn cli_category(opts: &Options, settings: &Settings) -> Result<()> {
    let Some(category) = positional(&opts.args, 0) else {
        anyhow::bail!("Usage: cardspend category <id> [YYYY-MM | --latest]");
    };
    if !settings.categories.is_known(category) {
        tracing::warn!("unknown category '{category}'; see `cardspend categories`");
    }

    let data = Dataset::load(settings)?;
    let requested = positional(&opts.args, 1);
    let lookup = if requested.is_some() || has_flag(&opts.args, "--latest") {
        warn_missing_month(&data, requested);
        category_transactions_in_month(&data.aggregate, &data.transactions, category, requested)
    } else {
        category_transactions(&data.transactions, category)
    };
    emit(opts, &lookup, || report::render_lookup(&lookup))
}

fn cli_categories(opts: &Options, settings: &Settings) -> Result<()> {
    #[derive(Serialize)]
    struct Listing<'a> {
        rules: &'a [CategoryRule],
        display_order: &'a [String],
    }

    let table = &settings.categories;
    let listing = Listing {
        rules: table.rules(),
        display_order: table.display_order(),
    };
    emit(opts, &listing, || report::render_categories(table))
}

fn cli_stats(opts: &Options, settings: &Settings) -> Result<()> {
    let data = Dataset::load(settings)?;
    emit(opts, &data.stats, || report::render_stats(&data.stats))
}

fn warn_missing_month(data: &Dataset, requested: Option<&str>) {
    let Some(month) = requested else { return };
    if data.aggregate.contains_month(month) {
        return;
    }
    match data.aggregate.latest_month() {
        Some(latest) => tracing::warn!("no data for {month}, showing {latest}"),
        None => tracing::warn!("no data for {month}"),
    }
}

/// The `index`-th argument that is neither a flag nor a flag's value.
fn positional(args: &[String], index: usize) -> Option<&str> {
    let mut skip_next = false;
    args.iter()
        .filter(|a| {
            if skip_next {
                skip_next = false;
                return false;
            }
            if a.as_str() == "--months" {
                skip_next = true;
            }
            !a.starts_with("--")
        })
        .nth(index)
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

/// Expand a leading `~/` to the home directory.
fn expand(path: &Path) -> PathBuf {
    match path.to_str().and_then(|p| p.strip_prefix("~/")) {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
