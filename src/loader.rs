use crate::month::MonthKey;
use crate::tokenizer::{is_blank, tokenize};
use crate::types::{AchievementStatus, ChangeDirection, KeywordRecord, MonthBucket, SiteDocument};
use crate::util::{parse_rank, parse_sequence};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Label cell in the first row; the staff name sits in the next cell.
pub const STAFF_LABEL: &str = "Phụ trách";

/// Rows 0 and 1 are sheet headers and never carry months or keywords.
const FIRST_DATA_ROW: usize = 2;

static MONTH_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)tháng\s*(\d{1,2})\s*/\s*(\d{4})").expect("valid month regex"));

static SITE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*://[^\s,]+").expect("valid url regex"));

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub blank_rows: usize,
    pub month_markers: usize,
    pub invalid_markers: usize,
    pub unattributed_rows: usize,
    pub skipped_rows: usize,
    pub records: usize,
}

/// A month section marker found in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthMarker {
    Month(MonthKey),
    /// Marker text whose month number is outside 1..=12.
    Invalid,
}

/// Find the first cell matching the month marker pattern (`Tháng 3/2026`).
///
/// Any match makes the row a section boundary, valid month or not.
pub fn detect_marker(row: &[String]) -> Option<MonthMarker> {
    row.iter().find_map(|cell| {
        let caps = MONTH_MARKER.captures(cell)?;
        let key = match (caps[1].parse::<u32>(), caps[2].parse::<i32>()) {
            (Ok(month), Ok(year)) => MonthKey::new(month, year),
            _ => None,
        };
        Some(key.map_or(MonthMarker::Invalid, MonthMarker::Month))
    })
}

/// The month key of a row's marker, if the row has a valid one.
pub fn detect_month(row: &[String]) -> Option<MonthKey> {
    match detect_marker(row)? {
        MonthMarker::Month(key) => Some(key),
        MonthMarker::Invalid => None,
    }
}

/// Map a fixed-position data row to a keyword record.
///
/// Returns `None` for separator rows (no sequence number and no keyword) and
/// for rows that name neither a keyword nor a product.
pub fn parse_keyword_row(row: &[String]) -> Option<KeywordRecord> {
    let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or("");

    if cell(0).is_empty() && cell(4).is_empty() {
        return None;
    }

    let record = KeywordRecord {
        sequence: parse_sequence(cell(0)),
        product_name: cell(1).to_string(),
        page_url: cell(2).to_string(),
        stock_label: cell(3).to_string(),
        keyword_text: cell(4).to_string(),
        initial_rank: parse_rank(cell(5)),
        target_rank: parse_rank(cell(6)),
        current_rank: parse_rank(cell(7)),
        change: ChangeDirection::from_token(cell(8)),
        status: AchievementStatus::from_token(cell(9)),
    };

    if record.keyword_text.is_empty() && record.product_name.is_empty() {
        return None;
    }
    Some(record)
}

/// First URL found anywhere in the header row.
fn find_site_url(header: &[String]) -> String {
    header
        .iter()
        .find_map(|cell| SITE_URL.find(cell).map(|m| m.as_str().to_string()))
        .unwrap_or_default()
}

/// Value to the right of a "Phụ trách" label cell. When the label repeats,
/// the last one with a value wins.
fn find_staff_name(header: &[String]) -> String {
    header
        .windows(2)
        .rev()
        .find(|pair| pair[0] == STAFF_LABEL)
        .map(|pair| &pair[1])
        .cloned()
        .unwrap_or_default()
}

pub fn parse_site_document(text: &str, site_name: &str) -> SiteDocument {
    parse_site_document_with_report(text, site_name).0
}

/// Parse one sheet export into a site document plus row diagnostics.
pub fn parse_site_document_with_report(text: &str, site_name: &str) -> (SiteDocument, LoadReport) {
    let rows = tokenize(text);
    let mut report = LoadReport { total_rows: rows.len(), ..LoadReport::default() };

    let (site_url, staff_name) = match rows.first() {
        Some(header) => (find_site_url(header), find_staff_name(header)),
        None => (String::new(), String::new()),
    };

    let mut months: BTreeMap<MonthKey, MonthBucket> = BTreeMap::new();
    let mut current: Option<MonthKey> = None;

    for row in rows.iter().skip(FIRST_DATA_ROW) {
        if is_blank(row) {
            report.blank_rows += 1;
            continue;
        }
        match detect_marker(row) {
            Some(MonthMarker::Month(key)) => {
                report.month_markers += 1;
                current = Some(key);
                months.entry(key).or_insert_with(|| MonthBucket::new(key));
                continue;
            }
            Some(MonthMarker::Invalid) => {
                // rows under an unreadable marker belong to no month
                report.invalid_markers += 1;
                current = None;
                continue;
            }
            None => {}
        }
        let Some(key) = current else {
            report.unattributed_rows += 1;
            continue;
        };
        match parse_keyword_row(row) {
            Some(record) => {
                report.records += 1;
                months
                    .entry(key)
                    .or_insert_with(|| MonthBucket::new(key))
                    .records
                    .push(record);
            }
            None => report.skipped_rows += 1,
        }
    }

    debug!(
        site = site_name,
        months = months.len(),
        records = report.records,
        skipped = report.skipped_rows,
        "parsed sheet"
    );

    let doc = SiteDocument {
        site_name: site_name.to_string(),
        site_url,
        staff_name,
        months,
    };
    (doc, report)
}
