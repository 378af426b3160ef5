use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use super::MonthlyAggregate;
use crate::models::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryAmount {
    pub(crate) category: String,
    pub(crate) amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategorySeries {
    pub(crate) category: String,
    pub(crate) values: Vec<Decimal>,
}

/// Per-category monthly values aligned with `months`, plus the per-month grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonthlySeries {
    pub(crate) months: Vec<String>,
    pub(crate) categories: Vec<CategorySeries>,
    pub(crate) totals: Vec<Decimal>,
}

/// Averages over a window of months, with the number of months actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct WindowAverages {
    pub(crate) month_count: usize,
    pub(crate) averages: Vec<CategoryAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryAverages {
    pub(crate) overall: WindowAverages,
    pub(crate) trailing_window: usize,
    pub(crate) trailing: WindowAverages,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryTrend {
    pub(crate) category: String,
    pub(crate) current: Decimal,
    pub(crate) previous: Decimal,
    /// Zero when `previous` is zero; that is a guard, not "no change".
    pub(crate) trend_percent: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryGroup {
    pub(crate) category: String,
    pub(crate) transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct DailyTotal {
    pub(crate) date: NaiveDate,
    pub(crate) amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct MonthDetail {
    pub(crate) month: String,
    pub(crate) category_totals: Vec<CategoryAmount>,
    pub(crate) category_transactions: Vec<CategoryGroup>,
    pub(crate) daily_totals: Vec<DailyTotal>,
    pub(crate) transaction_count: usize,
    /// Newest first.
    pub(crate) available_months: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct CategoryLookup {
    pub(crate) category: String,
    pub(crate) month: Option<String>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) total_amount: Decimal,
    pub(crate) transaction_count: usize,
}

// ── Totals and series ────────────────────────────────────────

/// Lifetime total per display-order category.
pub(crate) fn category_totals(agg: &MonthlyAggregate, order: &[String]) -> Vec<CategoryAmount> {
    let months = agg.months();
    order
        .iter()
        .map(|category| CategoryAmount {
            category: category.clone(),
            amount: sum_amounts(months.iter().map(|m| agg.amount(m, category))),
        })
        .collect()
}

pub(crate) fn monthly_series(agg: &MonthlyAggregate, order: &[String]) -> MonthlySeries {
    let months = agg.months();
    let categories = order
        .iter()
        .map(|category| CategorySeries {
            category: category.clone(),
            values: months.iter().map(|m| agg.amount(m, category)).collect(),
        })
        .collect();
    let totals = months.iter().map(|m| month_total(agg, m, order)).collect();

    MonthlySeries {
        months: months.iter().map(|m| m.to_string()).collect(),
        categories,
        totals,
    }
}

/// Sum that clamps at the `Decimal` range instead of panicking.
pub(crate) fn sum_amounts(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of all display-order categories for one month.
pub(crate) fn month_total(agg: &MonthlyAggregate, month: &str, order: &[String]) -> Decimal {
    sum_amounts(order.iter().map(|c| agg.amount(month, c)))
}

// ── Averages and trends ──────────────────────────────────────

pub(crate) fn overall_averages(agg: &MonthlyAggregate, order: &[String]) -> WindowAverages {
    window_averages(agg, &agg.months(), order)
}

/// Averages over the `n` most recent months present in the data, clamped to
/// however many exist. Gaps between months are not zero-filled.
pub(crate) fn trailing_averages(agg: &MonthlyAggregate, order: &[String], n: usize) -> WindowAverages {
    let months = agg.months();
    let start = months.len().saturating_sub(n);
    window_averages(agg, &months[start..], order)
}

pub(crate) fn category_averages(
    agg: &MonthlyAggregate,
    order: &[String],
    trailing_window: usize,
) -> CategoryAverages {
    CategoryAverages {
        overall: overall_averages(agg, order),
        trailing_window,
        trailing: trailing_averages(agg, order, trailing_window),
    }
}

/// Average of the per-month grand totals across every month.
pub(crate) fn average_monthly_total(agg: &MonthlyAggregate, order: &[String]) -> Decimal {
    let months = agg.months();
    let total = sum_amounts(months.iter().map(|m| month_total(agg, m, order)));
    divide(total, months.len())
}

fn window_averages(agg: &MonthlyAggregate, months: &[&str], order: &[String]) -> WindowAverages {
    let averages = order
        .iter()
        .map(|category| {
            let total = sum_amounts(months.iter().map(|m| agg.amount(m, category)));
            CategoryAmount {
                category: category.clone(),
                amount: divide(total, months.len()),
            }
        })
        .collect();

    WindowAverages {
        month_count: months.len(),
        averages,
    }
}

fn divide(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    total
        .checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
}

/// Last month against the one before it. `None` with fewer than two months.
pub(crate) fn trends(agg: &MonthlyAggregate, order: &[String]) -> Option<Vec<CategoryTrend>> {
    let months = agg.months();
    let [.., previous_month, current_month] = months.as_slice() else {
        return None;
    };

    let trends = order
        .iter()
        .map(|category| {
            let current = agg.amount(current_month, category);
            let previous = agg.amount(previous_month, category);
            CategoryTrend {
                category: category.clone(),
                current,
                previous,
                trend_percent: trend_percent(current, previous),
            }
        })
        .collect();
    Some(trends)
}

pub(crate) fn trend_percent(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    let change = current.saturating_sub(previous);
    change
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if change.is_sign_negative() == previous.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

// ── Transaction views ────────────────────────────────────────

/// Newest first; same-day transactions keep ingestion order.
pub(crate) fn transactions_by_date_desc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted
}

pub(crate) fn transactions_by_date_asc(transactions: &[Transaction]) -> Vec<Transaction> {
    let mut sorted = transactions.to_vec();
    sorted.sort_by_key(|t| t.date);
    sorted
}

/// Detail for the requested month, or the most recent month when it is absent.
/// `None` only when there is no data at all.
pub(crate) fn month_detail(
    agg: &MonthlyAggregate,
    transactions: &[Transaction],
    order: &[String],
    requested: Option<&str>,
) -> Option<MonthDetail> {
    let month = agg.select_month(requested)?;
    let in_month: Vec<&Transaction> = transactions.iter().filter(|t| t.in_month(month)).collect();

    let category_totals = order
        .iter()
        .map(|category| CategoryAmount {
            category: category.clone(),
            amount: agg.amount(month, category),
        })
        .collect();

    let mut groups: BTreeMap<&str, Vec<Transaction>> = BTreeMap::new();
    for txn in &in_month {
        groups
            .entry(txn.category.as_str())
            .or_default()
            .push((*txn).clone());
    }
    let mut category_transactions = Vec::new();
    for category in order {
        if let Some(txns) = groups.remove(category.as_str()) {
            category_transactions.push(CategoryGroup {
                category: category.clone(),
                transactions: txns,
            });
        }
    }
    // categories outside the display order still get listed, after the rest
    for (category, txns) in groups {
        category_transactions.push(CategoryGroup {
            category: category.to_string(),
            transactions: txns,
        });
    }

    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for txn in &in_month {
        let day = daily.entry(txn.date).or_insert(Decimal::ZERO);
        *day = day.saturating_add(txn.amount);
    }

    Some(MonthDetail {
        month: month.to_string(),
        category_totals,
        category_transactions,
        daily_totals: daily
            .into_iter()
            .map(|(date, amount)| DailyTotal { date, amount })
            .collect(),
        transaction_count: in_month.len(),
        available_months: agg.months().iter().rev().map(|m| m.to_string()).collect(),
    })
}

/// Every transaction in `category`, newest first.
pub(crate) fn category_transactions(transactions: &[Transaction], category: &str) -> CategoryLookup {
    let matching: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.category == category)
        .cloned()
        .collect();
    lookup(category, None, matching)
}

/// Transactions in `category` for the requested month, falling back to the
/// most recent month. Empty when there is no data.
pub(crate) fn category_transactions_in_month(
    agg: &MonthlyAggregate,
    transactions: &[Transaction],
    category: &str,
    requested: Option<&str>,
) -> CategoryLookup {
    let Some(month) = agg.select_month(requested) else {
        return lookup(category, None, Vec::new());
    };
    let matching: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.category == category && t.in_month(month))
        .cloned()
        .collect();
    lookup(category, Some(month.to_string()), matching)
}

fn lookup(category: &str, month: Option<String>, matching: Vec<Transaction>) -> CategoryLookup {
    let transactions = transactions_by_date_desc(&matching);
    CategoryLookup {
        category: category.to_string(),
        month,
        total_amount: sum_amounts(transactions.iter().map(|t| t.amount)),
        transaction_count: transactions.len(),
        transactions,
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
