#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::CategoryTable;
use rust_decimal_macros::dec;

fn row(direction: &str, amount: &str, date: &str, merchant: &str) -> StringRecord {
    StringRecord::from(vec![
        direction, "x", amount, "x", "x", "x", date, "x", "x", "x", merchant,
    ])
}

fn parse(record: &StringRecord) -> Result<Transaction, RowRejection> {
    let profile = SourceProfile::default();
    let categorizer = Categorizer::new(&CategoryTable::default());
    RecordParser::new(&profile, &categorizer).parse(record)
}

// ── accepted rows ─────────────────────────────────────────────

#[test]
fn test_parse_valid_row() {
    let txn = parse(&row("Nakup", "12.50", "05.01.2024", "LIDL BRATISLAVA")).unwrap();
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(txn.amount, dec!(12.50));
    assert_eq!(txn.merchant, "LIDL BRATISLAVA");
    assert_eq!(txn.category, "groceries");
}

#[test]
fn test_parse_trims_fields() {
    let txn = parse(&row(" Nakup ", " 7.00 ", " 31.12.2023 ", "  Bolt.eu  ")).unwrap();
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    assert_eq!(txn.amount, dec!(7.00));
    assert_eq!(txn.merchant, "Bolt.eu");
    assert_eq!(txn.category, "bolt");
}

#[test]
fn test_parse_unknown_merchant_is_other() {
    let txn = parse(&row("Nakup", "3", "01.02.2024", "SOMETHING ELSE")).unwrap();
    assert_eq!(txn.category, "other");
    assert_eq!(txn.amount, dec!(3));
}

#[test]
fn test_parse_extra_fields_ignored() {
    let mut record = row("Nakup", "1.10", "01.02.2024", "TESCO");
    record.push_field("extra");
    record.push_field("more");
    assert!(parse(&record).is_ok());
}

#[test]
fn test_parse_empty_merchant_allowed() {
    let txn = parse(&row("Nakup", "1.10", "01.02.2024", "")).unwrap();
    assert_eq!(txn.merchant, "");
    assert_eq!(txn.category, "other");
}

// ── rejections ────────────────────────────────────────────────

#[test]
fn test_reject_too_few_fields() {
    let record = StringRecord::from(vec!["Nakup", "x", "1.00", "x", "x", "x", "01.01.2024"]);
    assert_eq!(
        parse(&record).unwrap_err(),
        RowRejection::TooFewFields {
            found: 7,
            required: 11
        }
    );
}

#[test]
fn test_reject_refund_any_case_and_whitespace() {
    for marker in ["Kredit", "KREDIT", "kredit", "  Kredit\t"] {
        let err = parse(&row(marker, "5.00", "06.01.2024", "REFUND XYZ")).unwrap_err();
        assert_eq!(err, RowRejection::Refund, "marker {marker:?}");
    }
}

#[test]
fn test_refund_checked_before_date() {
    // Both the direction and the date are bad; refund wins
    let err = parse(&row("Kredit", "5.00", "garbage", "X")).unwrap_err();
    assert_eq!(err, RowRejection::Refund);
}

#[test]
fn test_reject_invalid_date() {
    for date in ["2024-01-05", "32.01.2024", "", "05/01/2024"] {
        let err = parse(&row("Nakup", "5.00", date, "X")).unwrap_err();
        assert_eq!(err, RowRejection::InvalidDate(date.to_string()));
    }
}

#[test]
fn test_date_checked_before_amount() {
    let err = parse(&row("Nakup", "abc", "bad", "X")).unwrap_err();
    assert_eq!(err, RowRejection::InvalidDate("bad".into()));
}

#[test]
fn test_reject_invalid_amount() {
    for amount in ["", "abc", "12,50", "1.2.3"] {
        let err = parse(&row("Nakup", amount, "05.01.2024", "X")).unwrap_err();
        assert_eq!(err, RowRejection::InvalidAmount(amount.to_string()));
    }
}

#[test]
fn test_reject_amount_out_of_range() {
    for amount in ["79228162514264337593543950335", "1000000000.01", "-2000000000"] {
        let err = parse(&row("Nakup", amount, "05.01.2024", "X")).unwrap_err();
        assert_eq!(err, RowRejection::InvalidAmount(amount.to_string()));
    }
}

#[test]
fn test_amount_at_limit_accepted() {
    let txn = parse(&row("Nakup", "1000000000", "05.01.2024", "X")).unwrap();
    assert_eq!(txn.amount, MAX_AMOUNT);
    let txn = parse(&row("Nakup", "-1000000000", "05.01.2024", "X")).unwrap();
    assert_eq!(txn.amount, -MAX_AMOUNT);
}

#[test]
fn test_custom_profile() {
    let profile = SourceProfile {
        direction_column: 3,
        amount_column: 1,
        date_column: 0,
        merchant_column: 2,
        date_format: "%Y-%m-%d".into(),
        credit_marker: "CREDIT".into(),
        delimiter: ";".into(),
    };
    let categorizer = Categorizer::new(&CategoryTable::default());
    let parser = RecordParser::new(&profile, &categorizer);

    let txn = parser
        .parse(&StringRecord::from(vec!["2024-03-09", "4.20", "Starbucks", "debit"]))
        .unwrap();
    assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
    assert_eq!(txn.category, "eating out");

    let err = parser
        .parse(&StringRecord::from(vec!["2024-03-09", "4.20", "Starbucks", "credit"]))
        .unwrap_err();
    assert_eq!(err, RowRejection::Refund);
}

#[test]
fn test_rejection_kinds_are_distinct() {
    let kinds = [
        RowRejection::TooFewFields {
            found: 0,
            required: 1,
        }
        .kind(),
        RowRejection::Refund.kind(),
        RowRejection::InvalidDate(String::new()).kind(),
        RowRejection::InvalidAmount(String::new()).kind(),
        RowRejection::Malformed(String::new()).kind(),
    ];
    let mut unique = kinds.to_vec();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), kinds.len());
}
