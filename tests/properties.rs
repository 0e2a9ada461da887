// tests/properties.rs
use proptest::prelude::*;
use proptest::test_runner::Config;
use seo_rank_report::config::{DashboardConfig, SiteConfig};
use seo_rank_report::fetch::SiteFetch;
use seo_rank_report::metrics::stats_for;
use seo_rank_report::types::{AchievementStatus, KeywordRecord};
use seo_rank_report::{Dashboard, MonthKey, ReportError};
use std::cmp::Ordering;

fn month_key() -> impl Strategy<Value = MonthKey> {
    (1u32..=12, 1990i32..2100).prop_map(|(m, y)| MonthKey::new(m, y).unwrap())
}

fn status() -> impl Strategy<Value = AchievementStatus> {
    prop_oneof![
        Just(AchievementStatus::Achieved),
        Just(AchievementStatus::NotAchieved),
        Just(AchievementStatus::Unknown),
    ]
}

fn sheet_for(site: usize) -> String {
    let mut text = String::from("h\nh\n");
    for month in 1..=3 {
        text.push_str(&format!("Tháng {}/2026\n", month));
        for kw in 0..(site + month) {
            let status = if (kw + site) % month == 0 { "Đạt" } else { "Chưa đạt" };
            let change = if kw % 2 == 0 { "Tăng" } else { "Giảm" };
            text.push_str(&format!("{kw},,,,kw{kw},{},5,{},{change},{status}\n", kw + 20, kw + 1));
        }
    }
    text
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn month_key_string_roundtrip(month in 1u32..=12, year in 1900i32..2200) {
        let key = MonthKey::new(month, year).unwrap();
        let text = key.to_string();
        prop_assert_eq!(text.clone(), format!("T{}/{}", month, year));
        let parsed: MonthKey = text.parse().unwrap();
        prop_assert_eq!((parsed.month(), parsed.year()), (month, year));
    }

    #[test]
    fn ordering_is_total_and_chronological(a in month_key(), b in month_key(), c in month_key()) {
        let outcomes = [a < b, a == b, a > b];
        prop_assert_eq!(outcomes.iter().filter(|x| **x).count(), 1);
        prop_assert_eq!(a.cmp(&b), a.ordinal().cmp(&b.ordinal()));
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
    }

    #[test]
    fn stats_are_consistent(statuses in prop::collection::vec(status(), 0..40)) {
        let records: Vec<KeywordRecord> = statuses
            .into_iter()
            .map(|status| KeywordRecord { status, ..KeywordRecord::default() })
            .collect();
        let s = stats_for(&records);
        prop_assert_eq!(s.achieved + s.not_achieved, s.total);
        prop_assert_eq!(s.percent == 0.0, s.total == 0 || s.achieved == 0);
        prop_assert!((0.0..=100.0).contains(&s.percent));
    }

    #[test]
    fn arrival_order_does_not_change_the_snapshot(
        order in Just(vec![0usize, 1, 2, 3]).prop_shuffle(),
        failing in prop::option::of(0usize..4),
    ) {
        let names = ["Hikvision", "ZKTeco", "Vnsmart", "Supremainc"];
        let cfg = DashboardConfig {
            sites: names
                .iter()
                .map(|n| SiteConfig {
                    name: n.to_string(),
                    gid: n.to_lowercase(),
                    color: String::new(),
                    short: String::new(),
                    domain: String::new(),
                })
                .collect(),
            ..DashboardConfig::default()
        };
        let fetch = |i: usize| SiteFetch {
            site: cfg.sites[i].clone(),
            body: if Some(i) == failing {
                Err(ReportError::HttpStatus { site: names[i].to_string(), status: 503 })
            } else {
                Ok(sheet_for(i))
            },
        };
        let in_order = Dashboard::assemble(&cfg, (0..4).map(fetch).collect(), None).unwrap();
        let shuffled = Dashboard::assemble(&cfg, order.iter().map(|i| fetch(*i)).collect(), None).unwrap();
        prop_assert_eq!(&in_order, &shuffled);

        let key = MonthKey::new(3, 2026).unwrap();
        prop_assert_eq!(in_order.staff_ranking(key), shuffled.staff_ranking(key));
        prop_assert_eq!(in_order.overview(Some(key)), shuffled.overview(Some(key)));
    }
}

#[test]
fn year_boundary_chain() {
    let keys: Vec<MonthKey> = ["T11/2025", "T12/2025", "T1/2026", "T2/2026"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    for pair in keys.windows(2) {
        assert_eq!(pair[0].cmp(&pair[1]), Ordering::Less);
    }
}
