// Pure month statistics over parsed site documents.
//
// Nothing here fails: missing months, empty buckets and empty axes all have a
// defined zero or `None` result.
use crate::month::MonthKey;
use crate::types::{
    ChangeDirection, DirectionTally, KeywordRecord, LatestMonth, MonthBucket, MonthStats,
    Retention, SiteDocument, StaffRanking,
};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::collections::HashSet;

pub fn stats_for(records: &[KeywordRecord]) -> MonthStats {
    let total = records.len();
    let achieved = records.iter().filter(|r| r.status.is_achieved()).count();
    let percent = if total > 0 {
        achieved as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    MonthStats {
        total,
        achieved,
        not_achieved: total - achieved,
        percent,
    }
}

pub fn month_stats(bucket: Option<&MonthBucket>) -> MonthStats {
    bucket.map(|b| stats_for(&b.records)).unwrap_or_default()
}

/// Stats of a site for a month; a month the site never reported is all zeros.
pub fn site_month_stats(site: &SiteDocument, key: MonthKey) -> MonthStats {
    month_stats(site.bucket(key))
}

pub fn direction_tally(records: &[KeywordRecord]) -> DirectionTally {
    records.iter().fold(DirectionTally::default(), |mut acc, r| {
        match r.change {
            ChangeDirection::Increased => acc.increased += 1,
            ChangeDirection::Decreased => acc.decreased += 1,
            ChangeDirection::Unchanged => acc.unchanged += 1,
        }
        acc
    })
}

/// Most recent non-empty month of a site, falling back to its newest month.
pub fn latest_month_with_data(site: &SiteDocument) -> LatestMonth {
    let mut buckets = site.months.values().rev();
    let Some(newest) = site.months.values().next_back() else {
        return LatestMonth::default();
    };
    let bucket = buckets.find(|b| !b.is_empty()).unwrap_or(newest);
    LatestMonth {
        month: Some(bucket.key),
        stats: month_stats(Some(bucket)),
    }
}

/// Newest axis month for which any site has keywords.
pub fn global_latest_month_with_data(
    sites: &[SiteDocument],
    axis: &[MonthKey],
) -> Option<MonthKey> {
    axis.iter()
        .rev()
        .find(|key| {
            sites
                .iter()
                .any(|s| s.bucket(**key).is_some_and(|b| !b.is_empty()))
        })
        .or_else(|| axis.last())
        .copied()
}

/// The dashboard reports on last month, since the current one is still open.
pub fn default_report_month(
    today: NaiveDate,
    sites: &[SiteDocument],
    axis: &[MonthKey],
) -> Option<MonthKey> {
    let target = MonthKey::new(today.month(), today.year()).map(|k| k.pred());
    match target {
        Some(key) if axis.contains(&key) => Some(key),
        _ => global_latest_month_with_data(sites, axis),
    }
}

/// Axis entry right before `key`, if any.
pub fn previous_month(axis: &[MonthKey], key: MonthKey) -> Option<MonthKey> {
    let idx = axis.iter().position(|k| *k == key)?;
    idx.checked_sub(1).map(|i| axis[i])
}

pub fn trend(current_percent: f64, previous_percent: f64) -> f64 {
    current_percent - previous_percent
}

pub fn pass_kpi(percent: f64, threshold: f64) -> bool {
    percent >= threshold
}

fn push_unique(out: &mut Vec<String>, seen: &mut HashSet<String>, id: &str) {
    if seen.insert(id.to_string()) {
        out.push(id.to_string());
    }
}

/// Classify keywords achieved last month against this month.
///
/// Identities are compared by exact text, so a renamed keyword reads as one
/// dropped plus one newly achieved.
pub fn retention_between(prev: Option<&MonthBucket>, current: Option<&MonthBucket>) -> Retention {
    let prev_records = prev.map(|b| b.records.as_slice()).unwrap_or(&[]);
    let cur_records = current.map(|b| b.records.as_slice()).unwrap_or(&[]);

    let prev_achieved: Vec<&str> = prev_records
        .iter()
        .filter(|r| r.status.is_achieved())
        .map(KeywordRecord::identity)
        .collect();
    let prev_set: HashSet<&str> = prev_achieved.iter().copied().collect();
    let cur_achieved: HashSet<&str> = cur_records
        .iter()
        .filter(|r| r.status.is_achieved())
        .map(KeywordRecord::identity)
        .collect();

    let mut out = Retention::default();
    let mut seen = HashSet::new();
    for id in &prev_achieved {
        if cur_achieved.contains(id) {
            push_unique(&mut out.retained, &mut seen, id);
        } else {
            push_unique(&mut out.dropped, &mut seen, id);
        }
    }
    for r in cur_records.iter().filter(|r| r.status.is_achieved()) {
        let id = r.identity();
        if !prev_set.contains(id) {
            push_unique(&mut out.newly_achieved, &mut seen, id);
        }
    }
    out
}

/// One row per site for `key`, best percent first; ties keep input order.
pub fn staff_ranking(
    sites: &[SiteDocument],
    axis: &[MonthKey],
    key: MonthKey,
) -> Vec<StaffRanking> {
    let prev = previous_month(axis, key);
    let mut rows: Vec<StaffRanking> = sites
        .iter()
        .map(|site| {
            let bucket = site.bucket(key);
            let stats = month_stats(bucket);
            let prev_percent = prev.map(|p| site_month_stats(site, p).percent).unwrap_or(0.0);
            StaffRanking {
                site_name: site.site_name.clone(),
                staff_name: site.staff_name.clone(),
                stats,
                directions: direction_tally(bucket.map(|b| b.records.as_slice()).unwrap_or(&[])),
                trend: trend(stats.percent, prev_percent),
            }
        })
        .collect();
    // `sort_by` is stable
    rows.sort_by(|a, b| {
        b.stats
            .percent
            .partial_cmp(&a.stats.percent)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

/// Sorted union of every month any site reported.
pub fn month_axis(sites: &[SiteDocument]) -> Vec<MonthKey> {
    let mut keys: Vec<MonthKey> = sites
        .iter()
        .flat_map(|s| s.months.keys().copied())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    keys.sort();
    keys
}
