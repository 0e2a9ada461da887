// Canonical reporting period keys.
//
// Sheets label each section "Tháng 3/2026"; internally every period is a
// `MonthKey` whose canonical text form is `T3/2026` (month never padded).
use crate::error::ReportError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthKey {
    month: u8,
    year: i32,
}

impl MonthKey {
    /// Build a key, rejecting month numbers outside 1..=12.
    pub fn new(month: u32, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { month: month as u8, year })
        } else {
            None
        }
    }

    pub fn month(&self) -> u32 {
        u32::from(self.month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Chronological index used for ordering: `year * 12 + month`.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month)
    }

    /// The calendar month before this one, wrapping December into the prior year.
    pub fn pred(&self) -> Self {
        if self.month == 1 {
            Self { month: 12, year: self.year - 1 }
        } else {
            Self { month: self.month - 1, year: self.year }
        }
    }

    /// Human label used by the dashboard: `Tháng 03 / 2026`.
    pub fn display_label(&self) -> String {
        format!("Tháng {:02} / {}", self.month, self.year)
    }
}

impl Ord for MonthKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for MonthKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}/{}", self.month, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ReportError::InvalidMonthKey(s.to_string());
        let rest = s.trim().strip_prefix('T').ok_or_else(invalid)?;
        let (month, year) = rest.split_once('/').ok_or_else(invalid)?;
        let month: u32 = month.trim().parse().map_err(|_| invalid())?;
        let year: i32 = year.trim().parse().map_err(|_| invalid())?;
        MonthKey::new(month, year).ok_or_else(invalid)
    }
}

impl Serialize for MonthKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Sort keys oldest first.
pub fn sort_ascending(keys: &mut [MonthKey]) {
    keys.sort();
}

/// Sort keys newest first, as month selectors list them.
pub fn sort_descending(keys: &mut [MonthKey]) {
    keys.sort_by(|a, b| b.cmp(a));
}

/// `Tháng MM / YYYY`, or an em dash placeholder when no month is selected.
pub fn format_month_display(key: Option<MonthKey>) -> String {
    match key {
        Some(k) => k.display_label(),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(m: u32, y: i32) -> MonthKey {
        MonthKey::new(m, y).unwrap()
    }

    #[test]
    fn canonical_form_is_unpadded() {
        assert_eq!(key(1, 2026).to_string(), "T1/2026");
        assert_eq!(key(12, 2025).to_string(), "T12/2025");
    }

    #[test]
    fn parses_canonical_form() {
        assert_eq!("T3/2026".parse::<MonthKey>().unwrap(), key(3, 2026));
        assert!("T13/2026".parse::<MonthKey>().is_err());
        assert!("3/2026".parse::<MonthKey>().is_err());
        assert!("T3-2026".parse::<MonthKey>().is_err());
    }

    #[test]
    fn year_boundary_orders_chronologically() {
        let mut keys = vec![key(1, 2026), key(11, 2025), key(12, 2025)];
        sort_ascending(&mut keys);
        assert_eq!(keys, vec![key(11, 2025), key(12, 2025), key(1, 2026)]);
        sort_descending(&mut keys);
        assert_eq!(keys, vec![key(1, 2026), key(12, 2025), key(11, 2025)]);
    }

    #[test]
    fn pred_wraps_january() {
        assert_eq!(key(1, 2026).pred(), key(12, 2025));
        assert_eq!(key(7, 2026).pred(), key(6, 2026));
    }

    #[test]
    fn display_label_pads_month() {
        assert_eq!(format_month_display(Some(key(3, 2026))), "Tháng 03 / 2026");
        assert_eq!(format_month_display(None), "—");
    }

    #[test]
    fn serde_uses_canonical_string() {
        let json = serde_json::to_string(&key(2, 2026)).unwrap();
        assert_eq!(json, "\"T2/2026\"");
        let back: MonthKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key(2, 2026));
    }
}
