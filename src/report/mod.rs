//! Plain-text rendering of the analytics views for the terminal.

mod util;

use comfy_table::{Cell, CellAlignment, Table};
use rust_decimal::Decimal;

use crate::analytics::{
    average_monthly_total, month_total, overall_averages, sum_amounts, CategoryAmount,
    CategoryAverages, CategoryLookup, CategoryTrend, MonthDetail, MonthlyAggregate, MonthlySeries,
};
use crate::import::IngestStats;
use crate::models::{CategoryTable, Transaction};

pub(crate) use util::{format_amount, format_percent, truncate};

const MERCHANT_WIDTH: usize = 40;

fn amount_cell(val: Decimal) -> Cell {
    Cell::new(format_amount(val)).set_alignment(CellAlignment::Right)
}

/// Month × category grid with a monthly total column and a closing average row.
pub(crate) fn render_grid(agg: &MonthlyAggregate, order: &[String]) -> String {
    if agg.is_empty() {
        return "No transactions found".to_string();
    }

    let mut table = Table::new();
    let mut header = vec![Cell::new("Month")];
    header.extend(order.iter().map(Cell::new));
    header.push(Cell::new("Monthly Total"));
    table.set_header(header);

    for month in agg.months() {
        let mut row = vec![Cell::new(month)];
        row.extend(order.iter().map(|c| amount_cell(agg.amount(month, c))));
        row.push(amount_cell(month_total(agg, month, order)));
        table.add_row(row);
    }

    let averages = overall_averages(agg, order);
    let mut row = vec![Cell::new("Average")];
    row.extend(averages.averages.iter().map(|a| amount_cell(a.amount)));
    row.push(amount_cell(average_monthly_total(agg, order)));
    table.add_row(row);

    format!("Monthly Expenses by Category\n{table}")
}

pub(crate) fn render_transactions(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found".to_string();
    }
    let mut table = Table::new();
    table.set_header(vec!["Date", "Merchant", "Category", "Amount"]);
    for txn in transactions {
        table.add_row(vec![
            Cell::new(txn.date.format("%Y-%m-%d")),
            Cell::new(truncate(&txn.merchant, MERCHANT_WIDTH)),
            Cell::new(&txn.category),
            amount_cell(txn.amount),
        ]);
    }
    format!("{} transactions\n{table}", transactions.len())
}

pub(crate) fn render_totals(totals: &[CategoryAmount]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Total"]);
    for item in totals {
        table.add_row(vec![Cell::new(&item.category), amount_cell(item.amount)]);
    }
    let grand = sum_amounts(totals.iter().map(|t| t.amount));
    table.add_row(vec![Cell::new("Total"), amount_cell(grand)]);
    format!("Category Totals\n{table}")
}

pub(crate) fn render_series(series: &MonthlySeries) -> String {
    if series.months.is_empty() {
        return "No transactions found".to_string();
    }
    let mut table = Table::new();
    let mut header = vec![Cell::new("Category")];
    header.extend(series.months.iter().map(Cell::new));
    table.set_header(header);

    for cat in &series.categories {
        let mut row = vec![Cell::new(&cat.category)];
        row.extend(cat.values.iter().map(|v| amount_cell(*v)));
        table.add_row(row);
    }
    let mut row = vec![Cell::new("Total")];
    row.extend(series.totals.iter().map(|v| amount_cell(*v)));
    table.add_row(row);
    format!("Monthly Series\n{table}")
}

pub(crate) fn render_averages(avg: &CategoryAverages) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Category".to_string(),
        format!("Overall ({} mo)", avg.overall.month_count),
        format!(
            "Last {} ({} mo)",
            avg.trailing_window, avg.trailing.month_count
        ),
    ]);
    for (overall, trailing) in avg.overall.averages.iter().zip(&avg.trailing.averages) {
        table.add_row(vec![
            Cell::new(&overall.category),
            amount_cell(overall.amount),
            amount_cell(trailing.amount),
        ]);
    }
    format!("Category Averages\n{table}")
}

pub(crate) fn render_trends(trends: Option<&[CategoryTrend]>) -> String {
    let Some(trends) = trends else {
        return "Need at least two months of data for trends".to_string();
    };
    let mut table = Table::new();
    table.set_header(vec!["Category", "Previous", "Current", "Trend"]);
    for t in trends {
        let trend = if t.previous.is_zero() {
            "n/a".to_string()
        } else {
            format_percent(t.trend_percent)
        };
        table.add_row(vec![
            Cell::new(&t.category),
            amount_cell(t.previous),
            amount_cell(t.current),
            Cell::new(trend).set_alignment(CellAlignment::Right),
        ]);
    }
    format!("Month-over-Month Trends\n{table}")
}

pub(crate) fn render_month_detail(detail: Option<&MonthDetail>) -> String {
    let Some(detail) = detail else {
        return "No transactions found".to_string();
    };

    let mut out = format!(
        "{} ({} transactions)\nAvailable months: {}\n",
        detail.month,
        detail.transaction_count,
        detail.available_months.join(", ")
    );

    let mut totals = Table::new();
    totals.set_header(vec!["Category", "Total"]);
    for item in &detail.category_totals {
        totals.add_row(vec![Cell::new(&item.category), amount_cell(item.amount)]);
    }
    out.push_str(&format!("\nCategory Totals\n{totals}\n"));

    for group in &detail.category_transactions {
        let mut table = Table::new();
        table.set_header(vec!["Date", "Merchant", "Amount"]);
        for txn in &group.transactions {
            table.add_row(vec![
                Cell::new(txn.date.format("%Y-%m-%d")),
                Cell::new(truncate(&txn.merchant, MERCHANT_WIDTH)),
                amount_cell(txn.amount),
            ]);
        }
        out.push_str(&format!("\n{}\n{table}\n", group.category));
    }

    let mut daily = Table::new();
    daily.set_header(vec!["Day", "Spent"]);
    for day in &detail.daily_totals {
        daily.add_row(vec![
            Cell::new(day.date.format("%Y-%m-%d")),
            amount_cell(day.amount),
        ]);
    }
    out.push_str(&format!("\nDaily Spending\n{daily}"));
    out
}

pub(crate) fn render_lookup(lookup: &CategoryLookup) -> String {
    let scope = lookup.month.as_deref().unwrap_or("all months");
    let mut out = format!(
        "{} — {}: {} transactions, {}\n",
        lookup.category,
        scope,
        lookup.transaction_count,
        format_amount(lookup.total_amount)
    );
    if !lookup.transactions.is_empty() {
        out.push_str(&render_transactions(&lookup.transactions));
    }
    out
}

pub(crate) fn render_categories(table: &CategoryTable) -> String {
    let mut rules = Table::new();
    rules.set_header(vec!["#", "Category", "Keywords"]);
    for (i, rule) in table.rules().iter().enumerate() {
        rules.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&rule.id),
            Cell::new(rule.keywords.join(", ")),
        ]);
    }
    format!(
        "Matching order (first match wins)\n{rules}\nDisplay order: {}",
        table.display_order().join(", ")
    )
}

pub(crate) fn render_stats(stats: &IngestStats) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Count"]);
    table.add_row(vec![Cell::new("files read"), Cell::new(stats.files_read)]);
    table.add_row(vec![
        Cell::new("files skipped"),
        Cell::new(stats.skipped_files.len()),
    ]);
    table.add_row(vec![
        Cell::new("rows accepted"),
        Cell::new(stats.rows_accepted),
    ]);
    table.add_row(vec![
        Cell::new("rows rejected"),
        Cell::new(stats.rows_rejected()),
    ]);
    for (kind, n) in &stats.rejections {
        table.add_row(vec![Cell::new(format!("  {kind}")), Cell::new(n)]);
    }

    let mut out = format!("Ingestion\n{table}");
    for path in &stats.skipped_files {
        out.push_str(&format!("\nskipped: {}", path.display()));
    }
    out
}
