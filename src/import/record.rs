use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::categorize::Categorizer;
use crate::config::SourceProfile;
use crate::models::Transaction;

/// Largest accepted absolute amount. Anything above is an export error, and
/// keeping amounts this small leaves totals far from `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Why a data row was dropped. Checked in declaration order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum RowRejection {
    #[error("row has {found} fields, {required} required")]
    TooFewFields { found: usize, required: usize },
    #[error("credit/refund row")]
    Refund,
    #[error("unparseable date '{0}'")]
    InvalidDate(String),
    #[error("unparseable amount '{0}'")]
    InvalidAmount(String),
    #[error("undecodable record: {0}")]
    Malformed(String),
}

impl RowRejection {
    /// Stable label used for per-reason counters.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::TooFewFields { .. } => "too_few_fields",
            Self::Refund => "refund",
            Self::InvalidDate(_) => "invalid_date",
            Self::InvalidAmount(_) => "invalid_amount",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// Turns one raw export row into a categorized transaction.
pub(crate) struct RecordParser<'a> {
    profile: &'a SourceProfile,
    categorizer: &'a Categorizer,
    min_fields: usize,
    credit_marker: String,
}

impl<'a> RecordParser<'a> {
    pub(crate) fn new(profile: &'a SourceProfile, categorizer: &'a Categorizer) -> Self {
        Self {
            profile,
            categorizer,
            min_fields: profile.min_fields(),
            credit_marker: profile.credit_marker.trim().to_lowercase(),
        }
    }

    pub(crate) fn parse(&self, record: &StringRecord) -> Result<Transaction, RowRejection> {
        if record.len() < self.min_fields {
            return Err(RowRejection::TooFewFields {
                found: record.len(),
                required: self.min_fields,
            });
        }

        let field = |col: usize| record.get(col).map(str::trim).unwrap_or_default();

        if field(self.profile.direction_column).to_lowercase() == self.credit_marker {
            return Err(RowRejection::Refund);
        }

        let date = parse_date(field(self.profile.date_column), &self.profile.date_format)?;
        let amount = parse_amount(field(self.profile.amount_column))?;

        let merchant = field(self.profile.merchant_column).to_string();
        let category = self.categorizer.categorize(&merchant).to_string();

        Ok(Transaction::new(date, merchant, amount, category))
    }
}

fn parse_date(s: &str, fmt: &str) -> Result<NaiveDate, RowRejection> {
    NaiveDate::parse_from_str(s, fmt).map_err(|_| RowRejection::InvalidDate(s.to_string()))
}

fn parse_amount(s: &str) -> Result<Decimal, RowRejection> {
    match Decimal::from_str(s) {
        Ok(amount) if amount.abs() <= MAX_AMOUNT => Ok(amount),
        _ => Err(RowRejection::InvalidAmount(s.to_string())),
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
