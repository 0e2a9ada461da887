// Utility helpers for lenient cell parsing and number formatting.
//
// Sheet cells are typed by hand, so numbers arrive as "12", " 8 ", "15 (new)"
// or nothing at all. These helpers turn them into typed values without ever
// failing; the rest of the code works with `Option`s.
use num_format::{Locale, ToFormattedString};

/// Parse the leading integer of a cell the way a spreadsheet user reads it.
///
/// - Trims whitespace.
/// - Accepts an optional sign followed by digits; anything after the digits
///   is ignored (`"15 (new)"` is `15`).
/// - Returns `None` for empty cells or cells that do not start with a number.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Rank cells: `None` means "no rank recorded", which is not the same as 0.
pub fn parse_rank(s: &str) -> Option<u32> {
    parse_int_prefix(s).and_then(|v| u32::try_from(v).ok())
}

/// Sequence numbers are a display aid; anything unreadable becomes 0.
pub fn parse_sequence(s: &str) -> i64 {
    parse_int_prefix(s).unwrap_or(0)
}

/// Percent with at most one decimal: `66.7%`, `50%`.
pub fn format_percent(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid printing "-0%"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    if rounded.fract() == 0.0 {
        format!("{}%", rounded as i64)
    } else {
        format!("{:.1}%", rounded)
    }
}

/// Percent delta with an explicit sign for non-negative values: `+4.2%`.
pub fn format_signed_percent(value: f64) -> String {
    let body = format_percent(value);
    if body.starts_with('-') {
        body
    } else {
        format!("+{}", body)
    }
}

pub fn format_signed_int(value: i64) -> String {
    if value >= 0 {
        format!("+{}", format_int(value))
    } else {
        format_int(value)
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `1,204 keywords`).
    n.to_formatted_string(&Locale::en)
}
