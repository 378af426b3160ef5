use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::Transaction;

/// Month key ("YYYY-MM") -> category -> summed amount.
///
/// Built fresh from the full transaction set for every query; nothing here is
/// cached or persisted. Month keys sort lexicographically, which for
/// zero-padded `YYYY-MM` is also chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub(crate) struct MonthlyAggregate {
    months: BTreeMap<String, BTreeMap<String, Decimal>>,
}

impl MonthlyAggregate {
    pub(crate) fn build(transactions: &[Transaction]) -> Self {
        let mut months: BTreeMap<String, BTreeMap<String, Decimal>> = BTreeMap::new();
        for txn in transactions {
            let cell = months
                .entry(txn.month_key())
                .or_default()
                .entry(txn.category.clone())
                .or_insert(Decimal::ZERO);
            *cell = cell.saturating_add(txn.amount);
        }
        Self { months }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub(crate) fn month_count(&self) -> usize {
        self.months.len()
    }

    /// Month keys, oldest first.
    pub(crate) fn months(&self) -> Vec<&str> {
        self.months.keys().map(String::as_str).collect()
    }

    pub(crate) fn contains_month(&self, month: &str) -> bool {
        self.months.contains_key(month)
    }

    pub(crate) fn latest_month(&self) -> Option<&str> {
        self.months.keys().next_back().map(String::as_str)
    }

    /// Summed amount for one cell; absent months or categories are zero.
    pub(crate) fn amount(&self, month: &str, category: &str) -> Decimal {
        self.months
            .get(month)
            .and_then(|cats| cats.get(category))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// The requested month if present, otherwise the most recent one.
    pub(crate) fn select_month(&self, requested: Option<&str>) -> Option<&str> {
        if let Some((key, _)) = requested.and_then(|m| self.months.get_key_value(m)) {
            return Some(key.as_str());
        }
        self.latest_month()
    }
}

#[cfg(test)]
#[path = "monthly_tests.rs"]
mod tests;
