use crate::month::MonthKey;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;

/// Rank movement reported by the sheet ("Tăng" / "Giảm" / anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ChangeDirection {
    Increased,
    Decreased,
    #[default]
    Unchanged,
}

impl ChangeDirection {
    pub fn from_token(raw: &str) -> Self {
        match raw.trim() {
            "Tăng" => Self::Increased,
            "Giảm" => Self::Decreased,
            _ => Self::Unchanged,
        }
    }
}

/// Whether a keyword met its target rank ("Đạt" / "Chưa đạt").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum AchievementStatus {
    Achieved,
    NotAchieved,
    #[default]
    Unknown,
}

impl AchievementStatus {
    pub fn from_token(raw: &str) -> Self {
        match raw.trim() {
            "Đạt" => Self::Achieved,
            "Chưa đạt" => Self::NotAchieved,
            _ => Self::Unknown,
        }
    }

    pub fn is_achieved(&self) -> bool {
        matches!(self, Self::Achieved)
    }
}

/// One tracked keyword for one site in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct KeywordRecord {
    pub sequence: i64,
    pub product_name: String,
    pub page_url: String,
    pub stock_label: String,
    pub keyword_text: String,
    pub initial_rank: Option<u32>,
    pub target_rank: Option<u32>,
    pub current_rank: Option<u32>,
    pub change: ChangeDirection,
    pub status: AchievementStatus,
}

impl KeywordRecord {
    /// Identity used to match a keyword across months: keyword text, or the
    /// product name when the keyword column is blank.
    pub fn identity(&self) -> &str {
        if self.keyword_text.is_empty() {
            &self.product_name
        } else {
            &self.keyword_text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub records: Vec<KeywordRecord>,
}

impl MonthBucket {
    pub fn new(key: MonthKey) -> Self {
        Self { key, records: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One monitored website and its monthly keyword buckets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteDocument {
    pub site_name: String,
    pub site_url: String,
    pub staff_name: String,
    pub months: BTreeMap<MonthKey, MonthBucket>,
}

impl SiteDocument {
    pub fn bucket(&self, key: MonthKey) -> Option<&MonthBucket> {
        self.months.get(&key)
    }

    /// The site's own months, newest first.
    pub fn months_descending(&self) -> Vec<MonthKey> {
        self.months.keys().rev().copied().collect()
    }
}

/// Achievement totals for one bucket. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct MonthStats {
    pub total: usize,
    pub achieved: usize,
    pub not_achieved: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct DirectionTally {
    pub increased: usize,
    pub decreased: usize,
    pub unchanged: usize,
}

/// The most recent month a site has data for, with its stats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
pub struct LatestMonth {
    pub month: Option<MonthKey>,
    pub stats: MonthStats,
}

/// Keyword identities classified between two consecutive months.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Retention {
    pub retained: Vec<String>,
    pub dropped: Vec<String>,
    pub newly_achieved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffRanking {
    pub site_name: String,
    pub staff_name: String,
    pub stats: MonthStats,
    pub directions: DirectionTally,
    pub trend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthOverview {
    pub month: Option<MonthKey>,
    pub site_count: usize,
    pub total: usize,
    pub achieved: usize,
    pub not_achieved: usize,
    pub percent: f64,
    pub increased: usize,
    pub decreased: usize,
    pub previous_percent: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub site_name: String,
    pub first: MonthStats,
    pub second: MonthStats,
    pub achieved_diff: i64,
    pub percent_diff: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub month: MonthKey,
    pub stats: MonthStats,
    pub retained: usize,
    pub dropped: usize,
    pub newly_achieved: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub site_name: String,
    pub points: Vec<f64>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct LeaderboardRow {
    #[serde(rename = "Rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Staff")]
    #[tabled(rename = "Staff")]
    pub staff: String,
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Achieved")]
    #[tabled(rename = "Achieved")]
    pub achieved: usize,
    #[serde(rename = "Percent")]
    #[tabled(rename = "Percent")]
    pub percent: String,
    #[serde(rename = "Trend")]
    #[tabled(rename = "Trend")]
    pub trend: String,
    #[serde(rename = "Up")]
    #[tabled(rename = "Up")]
    pub up: usize,
    #[serde(rename = "Down")]
    #[tabled(rename = "Down")]
    pub down: usize,
    #[serde(rename = "Tier")]
    #[tabled(rename = "Tier")]
    pub tier: String,
    #[serde(rename = "KPI")]
    #[tabled(rename = "KPI")]
    pub kpi: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ComparisonRow {
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "FirstMonth")]
    #[tabled(rename = "FirstMonth")]
    pub first: String,
    #[serde(rename = "SecondMonth")]
    #[tabled(rename = "SecondMonth")]
    pub second: String,
    #[serde(rename = "AchievedDiff")]
    #[tabled(rename = "AchievedDiff")]
    pub achieved_diff: String,
    #[serde(rename = "PercentDiff")]
    #[tabled(rename = "PercentDiff")]
    pub percent_diff: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TimelineRow {
    #[serde(rename = "Month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "Total")]
    #[tabled(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Achieved")]
    #[tabled(rename = "Achieved")]
    pub achieved: usize,
    #[serde(rename = "Percent")]
    #[tabled(rename = "Percent")]
    pub percent: String,
    #[serde(rename = "Retained")]
    #[tabled(rename = "Retained")]
    pub retained: usize,
    #[serde(rename = "Dropped")]
    #[tabled(rename = "Dropped")]
    pub dropped: usize,
    #[serde(rename = "New")]
    #[tabled(rename = "New")]
    pub newly_achieved: usize,
}
