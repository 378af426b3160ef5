use rust_decimal::Decimal;

const CURRENCY: &str = "€";

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` → `"€1,234,567.89"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val.round_dp(2);
    let abs = rounded.abs();
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if rounded < Decimal::ZERO {
        format!("-{CURRENCY}{with_commas}.{dec_part}")
    } else {
        format!("{CURRENCY}{with_commas}.{dec_part}")
    }
}

/// Signed percentage with one decimal place, e.g. `"+12.5%"`.
pub(crate) fn format_percent(val: Decimal) -> String {
    let rounded = val.round_dp(1);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.1}%")
    } else if rounded < Decimal::ZERO {
        format!("-{:.1}%", rounded.abs())
    } else {
        "0.0%".to_string()
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}
