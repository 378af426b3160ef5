use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// A single card debit, categorized once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub merchant: String,
    pub amount: Decimal,
    pub category: String,
}

impl Transaction {
    pub fn new(date: NaiveDate, merchant: String, amount: Decimal, category: String) -> Self {
        Self {
            date,
            merchant,
            amount,
            category,
        }
    }

    /// Calendar month bucket, format: "YYYY-MM"
    pub fn month_key(&self) -> String {
        month_key(self.date)
    }

    pub fn in_month(&self, month: &str) -> bool {
        self.month_key() == month
    }
}

pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
