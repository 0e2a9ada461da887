// tests/sheet_scenarios.rs
use chrono::NaiveDate;
use seo_rank_report::config::{DashboardConfig, SiteConfig};
use seo_rank_report::fetch::SiteFetch;
use seo_rank_report::loader::parse_site_document;
use seo_rank_report::types::{AchievementStatus, ChangeDirection};
use seo_rank_report::{Dashboard, MonthKey};

fn key(m: u32, y: i32) -> MonthKey {
    MonthKey::new(m, y).unwrap()
}

fn config(names: &[&str]) -> DashboardConfig {
    DashboardConfig {
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
    }
}

fn dashboard(sheets: &[(&str, &str)]) -> Dashboard {
    let names: Vec<&str> = sheets.iter().map(|(n, _)| *n).collect();
    let cfg = config(&names);
    let fetched = sheets
        .iter()
        .map(|(name, body)| SiteFetch {
            site: cfg.site(name).unwrap().clone(),
            body: Ok(body.to_string()),
        })
        .collect();
    Dashboard::assemble(&cfg, fetched, None).unwrap()
}

#[test]
fn parses_a_complete_sheet() {
    let text = concat!(
        "\"Báo cáo SEO\",\"https://example.com/\",\"Phụ trách\",\"Nguyen Van A\"\r\n",
        "\r\n",
        "\"Tháng 3/2026\",,,,,,,,,\r\n",
        "1,,,,kw1,10,5,8,Tăng,Đạt\r\n",
    );
    let doc = parse_site_document(text, "Hikvision");
    assert_eq!(doc.site_name, "Hikvision");
    assert_eq!(doc.staff_name, "Nguyen Van A");
    assert_eq!(doc.site_url, "https://example.com/");
    assert_eq!(doc.months.len(), 1);

    let bucket = doc.bucket(key(3, 2026)).unwrap();
    assert_eq!(bucket.key.to_string(), "T3/2026");
    assert_eq!(bucket.records.len(), 1);
    let rec = &bucket.records[0];
    assert_eq!(rec.sequence, 1);
    assert_eq!(rec.keyword_text, "kw1");
    assert_eq!(rec.initial_rank, Some(10));
    assert_eq!(rec.target_rank, Some(5));
    assert_eq!(rec.current_rank, Some(8));
    assert_eq!(rec.change, ChangeDirection::Increased);
    assert_eq!(rec.status, AchievementStatus::Achieved);
}

#[test]
fn month_marker_row_is_never_a_record() {
    let text = "h\nh\nTháng 1/2026\n7,Camera,,,kw,3,3,3,Tăng,Đạt,Tháng 2/2026\n1,,,,real,,,,,\n";
    let doc = parse_site_document(text, "S");
    // the second row is a marker for February even though it also looks like data
    assert!(doc.bucket(key(1, 2026)).unwrap().is_empty());
    let feb = doc.bucket(key(2, 2026)).unwrap();
    let ids: Vec<&str> = feb.records.iter().map(|r| r.identity()).collect();
    assert_eq!(ids, vec!["real"]);
}

#[test]
fn out_of_range_month_marker_is_not_data() {
    let text = "h\nh\nTháng 1/2026\nTháng 13/2026,Camera,,,kw13,1,1,1,Tăng,Đạt\n";
    let doc = parse_site_document(text, "S");
    assert_eq!(doc.months.len(), 1);
    assert!(doc.bucket(key(1, 2026)).unwrap().is_empty());
}

#[test]
fn sparse_rows_keep_keyword_with_null_ranks() {
    let text = "h\nh\nTháng 5/2026\n,,,,,,,,,\n,Camera,,,,,,,,\n,,,,kw,abc,,?,,\n";
    let doc = parse_site_document(text, "S");
    let bucket = doc.bucket(key(5, 2026)).unwrap();
    assert_eq!(bucket.records.len(), 1);
    let rec = &bucket.records[0];
    assert_eq!(rec.keyword_text, "kw");
    assert_eq!(rec.sequence, 0);
    assert_eq!((rec.initial_rank, rec.target_rank, rec.current_rank), (None, None, None));
}

#[test]
fn sheet_without_months_is_empty_not_an_error() {
    let doc = parse_site_document("only,a,header\nand another\n1,,,,kw,,,,,Đạt\n", "S");
    assert!(doc.months.is_empty());
    assert_eq!(doc.site_url, "");
    assert_eq!(doc.staff_name, "");
}

#[test]
fn retention_between_two_months() {
    let sheet = "h\nh\nTháng 1/2026\n1,,,,alpha,,,,,Đạt\n2,,,,beta,,,,,Đạt\nTháng 2/2026\n1,,,,alpha,,,,,Đạt\n2,,,,gamma,,,,,Đạt\n";
    let dash = dashboard(&[("A", sheet)]);
    let r = dash.retention_between("A", key(1, 2026), key(2, 2026)).unwrap();
    assert_eq!(r.retained, vec!["alpha"]);
    assert_eq!(r.dropped, vec!["beta"]);
    assert_eq!(r.newly_achieved, vec!["gamma"]);
    assert!(dash.retention_between("Z", key(1, 2026), key(2, 2026)).is_err());
}

#[test]
fn equal_percent_keeps_configuration_order() {
    let half = "h\nh\nTháng 1/2026\n1,,,,a,,,,,Đạt\n2,,,,b,,,,,Chưa đạt\n";
    let full = "h\nh\nTháng 1/2026\n1,,,,a,,,,,Đạt\n";
    let dash = dashboard(&[("Second", half), ("Top", full), ("First", half)]);
    let names: Vec<String> = dash
        .staff_ranking(key(1, 2026))
        .into_iter()
        .map(|r| r.site_name)
        .collect();
    assert_eq!(names, vec!["Top", "Second", "First"]);
}

#[test]
fn default_month_follows_report_date() {
    let sheet = "h\nh\nTháng 12/2025\n1,,,,a,,,,,Đạt\nTháng 1/2026\n1,,,,a,,,,,Đạt\n";
    let dash = dashboard(&[("A", sheet)]);
    let feb = NaiveDate::from_ymd_opt(2026, 2, 12).unwrap();
    let jan = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    assert_eq!(dash.default_report_month(feb), Some(key(1, 2026)));
    assert_eq!(dash.default_report_month(jan), Some(key(12, 2025)));
}

#[test]
fn missing_months_contribute_zero_to_the_axis() {
    let a = "h\nh\nTháng 1/2026\n1,,,,a,,,,,Đạt\nTháng 2/2026\n1,,,,a,,,,,Đạt\n";
    let b = "h\nh\nTháng 2/2026\n1,,,,b,,,,,\n";
    let dash = dashboard(&[("A", a), ("B", b)]);
    assert_eq!(dash.month_axis(), &[key(1, 2026), key(2, 2026)]);
    assert_eq!(dash.month_stats("B", key(1, 2026)).unwrap().total, 0);
    let series = dash.trend_series();
    assert_eq!(series[1].points, vec![0.0, 0.0]);
    assert_eq!(dash.global_latest_month_with_data(), Some(key(2, 2026)));
    assert_eq!(dash.latest_month_with_data("B").unwrap().month, Some(key(2, 2026)));
    assert!(dash.passes_kpi(dash.month_stats("A", key(2, 2026)).unwrap().percent));
}
