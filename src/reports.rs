use crate::metrics::{
    direction_tally, global_latest_month_with_data, month_stats, pass_kpi, previous_month,
    retention_between, site_month_stats, trend,
};
use crate::month::MonthKey;
use crate::types::{
    ComparisonEntry, ComparisonRow, LeaderboardRow, MonthOverview, MonthStats, Retention,
    SiteDocument, StaffRanking, TimelineEntry, TimelineRow, TrendSeries,
};
use crate::util::{format_percent, format_signed_int, format_signed_percent};

/// Coloring bucket of an achievement percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceTier {
    High,
    Mid,
    Low,
}

impl PerformanceTier {
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Mid => "Mid",
            Self::Low => "Low",
        }
    }

    pub fn classify(percent: f64, kpi_threshold: f64, warning_threshold: f64) -> Self {
        if percent >= kpi_threshold {
            Self::High
        } else if percent >= warning_threshold {
            Self::Mid
        } else {
            Self::Low
        }
    }
}

/// Cross-site totals for one month, with the delta against the previous axis month.
pub fn overview(
    sites: &[SiteDocument],
    axis: &[MonthKey],
    month: Option<MonthKey>,
) -> MonthOverview {
    let (mut total, mut achieved, mut increased, mut decreased) = (0usize, 0usize, 0usize, 0usize);
    if let Some(key) = month {
        for site in sites {
            let bucket = site.bucket(key);
            let stats = month_stats(bucket);
            total += stats.total;
            achieved += stats.achieved;
            if let Some(b) = bucket {
                let tally = direction_tally(&b.records);
                increased += tally.increased;
                decreased += tally.decreased;
            }
        }
    }
    let percent = percent_of(achieved, total);

    let previous_percent = month
        .and_then(|key| previous_month(axis, key))
        .map(|prev| {
            let (t, a) = sites.iter().fold((0, 0), |(t, a), s| {
                let st = site_month_stats(s, prev);
                (t + st.total, a + st.achieved)
            });
            percent_of(a, t)
        })
        .unwrap_or(0.0);

    MonthOverview {
        month,
        site_count: sites.len(),
        total,
        achieved,
        not_achieved: total - achieved,
        percent,
        increased,
        decreased,
        previous_percent,
        percent_change: trend(percent, previous_percent),
    }
}

fn percent_of(achieved: usize, total: usize) -> f64 {
    if total > 0 {
        achieved as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Per-site change between two arbitrary months, `first` being the baseline.
pub fn comparison(
    sites: &[SiteDocument],
    first: MonthKey,
    second: MonthKey,
) -> Vec<ComparisonEntry> {
    sites
        .iter()
        .map(|site| {
            let a = site_month_stats(site, first);
            let b = site_month_stats(site, second);
            ComparisonEntry {
                site_name: site.site_name.clone(),
                first: a,
                second: b,
                achieved_diff: b.achieved as i64 - a.achieved as i64,
                percent_diff: b.percent - a.percent,
            }
        })
        .collect()
}

/// Months preselected in the comparison view.
pub fn default_comparison_months(
    sites: &[SiteDocument],
    axis: &[MonthKey],
) -> Option<(MonthKey, MonthKey)> {
    let latest = global_latest_month_with_data(sites, axis)?;
    if let Some(prev) = previous_month(axis, latest) {
        return Some((prev, latest));
    }
    match axis {
        [.., a, b] => Some((*a, *b)),
        _ => None,
    }
}

/// A site's months oldest to newest, each with retention against the month
/// before it. The first month has no pair, so its counts are zero.
pub fn timeline(site: &SiteDocument) -> Vec<TimelineEntry> {
    let mut prev = None;
    site.months
        .values()
        .map(|bucket| {
            let r = match prev {
                Some(p) => retention_between(Some(p), Some(bucket)),
                None => Retention::default(),
            };
            prev = Some(bucket);
            TimelineEntry {
                month: bucket.key,
                stats: month_stats(Some(bucket)),
                retained: r.retained.len(),
                dropped: r.dropped.len(),
                newly_achieved: r.newly_achieved.len(),
            }
        })
        .collect()
}

/// Percent per site for every axis month; missing months plot as zero.
pub fn trend_series(sites: &[SiteDocument], axis: &[MonthKey]) -> Vec<TrendSeries> {
    sites
        .iter()
        .map(|site| TrendSeries {
            site_name: site.site_name.clone(),
            points: axis.iter().map(|k| site_month_stats(site, *k).percent).collect(),
        })
        .collect()
}

pub fn leaderboard_rows(
    ranking: &[StaffRanking],
    kpi_threshold: f64,
    warning_threshold: f64,
) -> Vec<LeaderboardRow> {
    ranking
        .iter()
        .enumerate()
        .map(|(idx, r)| LeaderboardRow {
            rank: idx + 1,
            staff: if r.staff_name.is_empty() {
                "N/A".to_string()
            } else {
                r.staff_name.clone()
            },
            site: r.site_name.clone(),
            total: r.stats.total,
            achieved: r.stats.achieved,
            percent: format_percent(r.stats.percent),
            trend: format_signed_percent(r.trend),
            up: r.directions.increased,
            down: r.directions.decreased,
            tier: PerformanceTier::classify(r.stats.percent, kpi_threshold, warning_threshold)
                .label()
                .to_string(),
            kpi: if pass_kpi(r.stats.percent, kpi_threshold) {
                "PASS".to_string()
            } else {
                "FAIL".to_string()
            },
        })
        .collect()
}

pub fn comparison_rows(entries: &[ComparisonEntry]) -> Vec<ComparisonRow> {
    entries
        .iter()
        .map(|e| ComparisonRow {
            site: e.site_name.clone(),
            first: month_cell(&e.first),
            second: month_cell(&e.second),
            achieved_diff: format_signed_int(e.achieved_diff),
            percent_diff: format_signed_percent(e.percent_diff),
        })
        .collect()
}

fn month_cell(stats: &MonthStats) -> String {
    format!("{}/{} ({})", stats.achieved, stats.total, format_percent(stats.percent))
}

/// Timeline rendered newest first, the order month selectors use.
pub fn timeline_rows(entries: &[TimelineEntry]) -> Vec<TimelineRow> {
    entries
        .iter()
        .rev()
        .map(|e| TimelineRow {
            month: e.month.to_string(),
            total: e.stats.total,
            achieved: e.stats.achieved,
            percent: format_percent(e.stats.percent),
            retained: e.retained,
            dropped: e.dropped,
            newly_achieved: e.newly_achieved,
        })
        .collect()
}
