#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn txn(date: &str, category: &str, amount: Decimal) -> Transaction {
    Transaction::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        "merchant".into(),
        amount,
        category.into(),
    )
}

#[test]
fn test_build_sums_by_month_and_category() {
    let txns = vec![
        txn("2024-01-05", "groceries", dec!(12.50)),
        txn("2024-01-20", "groceries", dec!(7.25)),
        txn("2024-01-21", "bolt", dec!(4.00)),
        txn("2024-02-01", "groceries", dec!(1.00)),
    ];
    let agg = MonthlyAggregate::build(&txns);
    assert_eq!(agg.month_count(), 2);
    assert_eq!(agg.amount("2024-01", "groceries"), dec!(19.75));
    assert_eq!(agg.amount("2024-01", "bolt"), dec!(4.00));
    assert_eq!(agg.amount("2024-02", "groceries"), dec!(1.00));
}

#[test]
fn test_missing_cells_are_zero() {
    let agg = MonthlyAggregate::build(&[txn("2024-01-05", "groceries", dec!(1))]);
    assert_eq!(agg.amount("2024-01", "travel"), Decimal::ZERO);
    assert_eq!(agg.amount("1999-01", "groceries"), Decimal::ZERO);
}

#[test]
fn test_months_sorted_regardless_of_input_order() {
    let txns = vec![
        txn("2024-03-01", "other", dec!(1)),
        txn("2023-11-01", "other", dec!(1)),
        txn("2024-01-01", "other", dec!(1)),
    ];
    let agg = MonthlyAggregate::build(&txns);
    assert_eq!(agg.months(), vec!["2023-11", "2024-01", "2024-03"]);
    assert_eq!(agg.latest_month(), Some("2024-03"));
}

#[test]
fn test_month_sum_matches_transactions() {
    let txns = vec![
        txn("2024-01-05", "groceries", dec!(12.50)),
        txn("2024-01-06", "other", dec!(0.01)),
        txn("2024-01-07", "eating out", dec!(33.33)),
        txn("2024-02-07", "eating out", dec!(99)),
    ];
    let agg = MonthlyAggregate::build(&txns);
    let cells: Decimal = ["groceries", "other", "eating out"]
        .iter()
        .map(|c| agg.amount("2024-01", c))
        .sum();
    let direct: Decimal = txns
        .iter()
        .filter(|t| t.in_month("2024-01"))
        .map(|t| t.amount)
        .sum();
    assert_eq!(cells, direct);
    assert_eq!(cells, dec!(45.84));
}

#[test]
fn test_empty() {
    let agg = MonthlyAggregate::build(&[]);
    assert!(agg.is_empty());
    assert_eq!(agg.month_count(), 0);
    assert!(agg.months().is_empty());
    assert_eq!(agg.latest_month(), None);
    assert_eq!(agg.select_month(Some("2024-01")), None);
}

#[test]
fn test_select_month() {
    let agg = MonthlyAggregate::build(&[
        txn("2024-01-05", "groceries", dec!(1)),
        txn("2024-02-05", "groceries", dec!(1)),
    ]);
    assert_eq!(agg.select_month(Some("2024-01")), Some("2024-01"));
    assert_eq!(agg.select_month(Some("2023-12")), Some("2024-02"));
    assert_eq!(agg.select_month(Some("garbage")), Some("2024-02"));
    assert_eq!(agg.select_month(None), Some("2024-02"));
    assert!(agg.contains_month("2024-01"));
    assert!(!agg.contains_month("2024-03"));
}

#[test]
fn test_rebuild_is_identical() {
    let txns = vec![
        txn("2024-01-05", "groceries", dec!(0.1)),
        txn("2024-01-05", "groceries", dec!(0.2)),
    ];
    let a = MonthlyAggregate::build(&txns);
    let b = MonthlyAggregate::build(&txns);
    assert_eq!(a, b);
    assert_eq!(a.amount("2024-01", "groceries"), dec!(0.3));
}

#[test]
fn test_build_saturates_instead_of_overflowing() {
    let txns = vec![
        txn("2024-01-05", "groceries", Decimal::MAX),
        txn("2024-01-06", "groceries", Decimal::MAX),
    ];
    let agg = MonthlyAggregate::build(&txns);
    assert_eq!(agg.amount("2024-01", "groceries"), Decimal::MAX);
}
