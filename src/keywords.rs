// Keyword table queries for a single site month: filtering, search, sorting
// and the three insight lists shown above the table.
use crate::types::{AchievementStatus, ChangeDirection, KeywordRecord};
use std::cmp::Ordering;

/// Ranks missing from the sheet sort after every real rank.
const MISSING_RANK: u32 = 9999;
const INSIGHT_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordFilter {
    #[default]
    All,
    Achieved,
    NotAchieved,
    Increased,
    Decreased,
}

impl KeywordFilter {
    pub fn matches(&self, record: &KeywordRecord) -> bool {
        match self {
            Self::All => true,
            Self::Achieved => record.status == AchievementStatus::Achieved,
            Self::NotAchieved => record.status == AchievementStatus::NotAchieved,
            Self::Increased => record.change == ChangeDirection::Increased,
            Self::Decreased => record.change == ChangeDirection::Decreased,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Sequence,
    InitialRank,
    TargetRank,
    CurrentRank,
}

impl SortKey {
    fn value(&self, record: &KeywordRecord) -> i64 {
        let rank = |r: Option<u32>| i64::from(r.unwrap_or(MISSING_RANK));
        match self {
            Self::Sequence => record.sequence,
            Self::InitialRank => rank(record.initial_rank),
            Self::TargetRank => rank(record.target_rank),
            Self::CurrentRank => rank(record.current_rank),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct KeywordQuery {
    pub filter: KeywordFilter,
    pub search: String,
    pub sort: Option<(SortKey, SortDirection)>,
}

impl KeywordQuery {
    /// Apply filter, search and sort; sheet order is kept when unsorted.
    pub fn apply<'a>(&self, records: &'a [KeywordRecord]) -> Vec<&'a KeywordRecord> {
        let needle = self.search.trim().to_lowercase();
        let mut out: Vec<&KeywordRecord> = records
            .iter()
            .filter(|r| self.filter.matches(r))
            .filter(|r| {
                needle.is_empty()
                    || r.keyword_text.to_lowercase().contains(&needle)
                    || r.product_name.to_lowercase().contains(&needle)
            })
            .collect();
        if let Some((key, dir)) = self.sort {
            out.sort_by(|a, b| {
                let ord = key.value(a).cmp(&key.value(b));
                match dir {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        out
    }
}

/// Position bucket used to color a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBand {
    Top10,
    Top30,
    Top100,
    Out,
}

impl RankBand {
    pub fn of(rank: Option<u32>) -> Self {
        match rank {
            Some(1..=10) => Self::Top10,
            Some(11..=30) => Self::Top30,
            Some(31..=100) => Self::Top100,
            _ => Self::Out,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Insights<'a> {
    pub top_performers: Vec<&'a KeywordRecord>,
    pub most_improved: Vec<&'a KeywordRecord>,
    pub needs_attention: Vec<&'a KeywordRecord>,
}

fn by_current_rank(a: &&KeywordRecord, b: &&KeywordRecord) -> Ordering {
    SortKey::CurrentRank.value(a).cmp(&SortKey::CurrentRank.value(b))
}

fn improvement(r: &KeywordRecord) -> i64 {
    i64::from(r.initial_rank.unwrap_or(0)) - i64::from(r.current_rank.unwrap_or(0))
}

pub fn insights(records: &[KeywordRecord]) -> Insights<'_> {
    let ranked = |r: &&KeywordRecord| r.current_rank.is_some_and(|c| c > 0);

    let mut top_performers: Vec<&KeywordRecord> = records
        .iter()
        .filter(|r| r.status == AchievementStatus::Achieved)
        .filter(ranked)
        .collect();
    top_performers.sort_by(by_current_rank);
    top_performers.truncate(INSIGHT_LIMIT);

    let mut most_improved: Vec<&KeywordRecord> = records
        .iter()
        .filter(|r| r.change == ChangeDirection::Increased)
        .filter(|r| r.initial_rank.is_some_and(|i| i > 0))
        .filter(ranked)
        .collect();
    most_improved.sort_by_key(|r| std::cmp::Reverse(improvement(r)));
    most_improved.truncate(INSIGHT_LIMIT);

    let mut needs_attention: Vec<&KeywordRecord> = records
        .iter()
        .filter(|r| r.status == AchievementStatus::NotAchieved)
        .filter(ranked)
        .collect();
    needs_attention.sort_by(by_current_rank);
    needs_attention.truncate(INSIGHT_LIMIT);

    Insights {
        top_performers,
        most_improved,
        needs_attention,
    }
}
