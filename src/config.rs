// Dashboard configuration: which sheets to load, where from, and the KPI
// thresholds applied to the results.
//
// Defaults mirror the published workbook. A JSON file named by
// `SEO_REPORT_CONFIG` replaces them; `SEO_REPORT_DATE` pins "today".
use crate::error::{ReportError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_ENV: &str = "SEO_REPORT_CONFIG";
pub const DATE_ENV: &str = "SEO_REPORT_DATE";

const DEFAULT_BASE_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQHmXJl56tO6v1J70LTik9TP9FDLe1gj3ljZdZ6NDUQNsmytVLBpYbCQhmqCv-CvucvZdQxOR9_VaxX/pub";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub gid: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub short: String,
    #[serde(default)]
    pub domain: String,
}

impl SiteConfig {
    fn new(name: &str, gid: &str, color: &str, short: &str, domain: &str) -> Self {
        Self {
            name: name.to_string(),
            gid: gid.to_string(),
            color: color.to_string(),
            short: short.to_string(),
            domain: domain.to_string(),
        }
    }

    /// CSV export URL of this site's sheet tab.
    pub fn csv_url(&self, base_url: &str) -> String {
        format!("{}?gid={}&single=true&output=csv", base_url, self.gid)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub sites: Vec<SiteConfig>,
    pub kpi_threshold: f64,
    pub warning_threshold: f64,
    pub request_timeout_secs: u64,
    pub log_level: String,
    pub report_date: Option<NaiveDate>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sites: vec![
                SiteConfig::new("Hikvision", "804549385", "#4285f4", "HK", "hikvision247.com"),
                SiteConfig::new("ZKTeco", "526294969", "#1e8e3e", "ZK", "zktecovn.com"),
                SiteConfig::new("Vnsmart", "1740814124", "#ea8600", "VN", "vnsmart.com.vn"),
                SiteConfig::new("Supremainc", "187136415", "#7c3aed", "SU", "supremainc.vn"),
            ],
            kpi_threshold: 70.0,
            warning_threshold: 50.0,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
            report_date: None,
        }
    }
}

impl DashboardConfig {
    /// Defaults, overridden by the environment when it names a file or date.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(Path::new(path.trim()))?,
            _ => Self::default(),
        };
        if let Ok(raw) = std::env::var(DATE_ENV) {
            config.report_date = Some(parse_report_date(DATE_ENV, &raw)?);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text).map_err(|e| ReportError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The date used for default month selection.
    pub fn today(&self) -> NaiveDate {
        self.report_date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn site(&self, name: &str) -> Option<&SiteConfig> {
        self.sites.iter().find(|s| s.name == name)
    }
}

fn parse_report_date(source: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ReportError::Config {
        path: source.to_string(),
        message: format!("expected YYYY-MM-DD, got '{}': {}", raw.trim(), e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_register_four_sheets() {
        let c = DashboardConfig::default();
        assert_eq!(c.sites.len(), 4);
        assert_eq!(c.kpi_threshold, 70.0);
        assert_eq!(c.site("ZKTeco").map(|s| s.gid.as_str()), Some("526294969"));
    }

    #[test]
    fn csv_url_carries_gid() {
        let site = SiteConfig::new("A", "42", "", "", "");
        assert_eq!(site.csv_url("https://x/pub"), "https://x/pub?gid=42&single=true&output=csv");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c = DashboardConfig::from_json(
            r#"{"kpi_threshold": 80, "sites": [{"name": "Solo", "gid": "1"}], "report_date": "2026-02-12"}"#,
        )
        .unwrap();
        assert_eq!(c.kpi_threshold, 80.0);
        assert_eq!(c.warning_threshold, 50.0);
        assert_eq!(c.sites.len(), 1);
        assert_eq!(c.today(), NaiveDate::from_ymd_opt(2026, 2, 12).unwrap());
    }

    #[test]
    fn bad_date_is_config_error() {
        let err = parse_report_date(DATE_ENV, "12/02/2026").unwrap_err();
        assert!(matches!(err, ReportError::Config { .. }));
    }
}
