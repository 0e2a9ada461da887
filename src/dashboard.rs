// Immutable cross-site snapshot and the read-only queries the presentation
// layer runs against it. A refresh builds a new snapshot; nothing mutates one.
use crate::config::DashboardConfig;
use crate::error::{ReportError, Result};
use crate::fetch::SiteFetch;
use crate::loader::parse_site_document_with_report;
use crate::metrics;
use crate::month::MonthKey;
use crate::reports;
use crate::types::{
    ComparisonEntry, LatestMonth, MonthOverview, MonthStats, Retention, SiteDocument,
    StaffRanking, TimelineEntry, TrendSeries,
};
use chrono::NaiveDate;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    sites: Vec<SiteDocument>,
    month_axis: Vec<MonthKey>,
    kpi_threshold: f64,
    warning_threshold: f64,
}

impl Dashboard {
    /// Build a snapshot from already parsed documents, kept in the given order.
    pub fn new(sites: Vec<SiteDocument>, kpi_threshold: f64, warning_threshold: f64) -> Self {
        let month_axis = metrics::month_axis(&sites);
        Self {
            sites,
            month_axis,
            kpi_threshold,
            warning_threshold,
        }
    }

    /// Turn one refresh cycle's fetch results into a snapshot.
    ///
    /// Sites are ordered as configured, whatever order `fetched` arrives in.
    /// A site whose fetch failed keeps its document from `previous`, if any.
    /// Fails with `NoData` only when no site has a document at all.
    pub fn assemble(
        config: &DashboardConfig,
        fetched: Vec<SiteFetch>,
        previous: Option<&Dashboard>,
    ) -> Result<Self> {
        let mut bodies: Vec<(String, Result<String>)> =
            fetched.into_iter().map(|f| (f.site.name, f.body)).collect();

        let mut sites = Vec::with_capacity(config.sites.len());
        for site in &config.sites {
            let body = bodies
                .iter()
                .position(|(name, _)| *name == site.name)
                .map(|i| bodies.swap_remove(i).1);
            match body {
                Some(Ok(text)) => {
                    let (doc, report) = parse_site_document_with_report(&text, &site.name);
                    info!(
                        site = %site.name,
                        months = doc.months.len(),
                        records = report.records,
                        "site parsed"
                    );
                    sites.push(doc);
                }
                Some(Err(e)) => {
                    match previous.and_then(|p| p.site(&site.name).ok()) {
                        Some(stale) => {
                            warn!(site = %site.name, error = %e, "keeping previous data");
                            sites.push(stale.clone());
                        }
                        None => warn!(site = %site.name, error = %e, "no data for site"),
                    }
                }
                None => warn!(site = %site.name, "site was not fetched"),
            }
        }

        if sites.is_empty() {
            return Err(ReportError::NoData);
        }
        Ok(Self::new(sites, config.kpi_threshold, config.warning_threshold))
    }

    pub fn sites(&self) -> &[SiteDocument] {
        &self.sites
    }

    pub fn site(&self, name: &str) -> Result<&SiteDocument> {
        self.sites
            .iter()
            .find(|s| s.site_name == name)
            .ok_or_else(|| ReportError::UnknownSite(name.to_string()))
    }

    /// Sorted union of every site's months.
    pub fn month_axis(&self) -> &[MonthKey] {
        &self.month_axis
    }

    pub fn kpi_threshold(&self) -> f64 {
        self.kpi_threshold
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    pub fn month_stats(&self, site: &str, key: MonthKey) -> Result<MonthStats> {
        Ok(metrics::site_month_stats(self.site(site)?, key))
    }

    pub fn latest_month_with_data(&self, site: &str) -> Result<LatestMonth> {
        Ok(metrics::latest_month_with_data(self.site(site)?))
    }

    pub fn global_latest_month_with_data(&self) -> Option<MonthKey> {
        metrics::global_latest_month_with_data(&self.sites, &self.month_axis)
    }

    pub fn default_report_month(&self, today: NaiveDate) -> Option<MonthKey> {
        metrics::default_report_month(today, &self.sites, &self.month_axis)
    }

    pub fn previous_month(&self, key: MonthKey) -> Option<MonthKey> {
        metrics::previous_month(&self.month_axis, key)
    }

    pub fn staff_ranking(&self, key: MonthKey) -> Vec<StaffRanking> {
        metrics::staff_ranking(&self.sites, &self.month_axis, key)
    }

    /// Retention of `site` from month `from` to month `to`.
    pub fn retention_between(&self, site: &str, from: MonthKey, to: MonthKey) -> Result<Retention> {
        let doc = self.site(site)?;
        Ok(metrics::retention_between(doc.bucket(from), doc.bucket(to)))
    }

    pub fn passes_kpi(&self, percent: f64) -> bool {
        metrics::pass_kpi(percent, self.kpi_threshold)
    }

    pub fn overview(&self, key: Option<MonthKey>) -> MonthOverview {
        reports::overview(&self.sites, &self.month_axis, key)
    }

    pub fn comparison(&self, first: MonthKey, second: MonthKey) -> Vec<ComparisonEntry> {
        reports::comparison(&self.sites, first, second)
    }

    pub fn default_comparison_months(&self) -> Option<(MonthKey, MonthKey)> {
        reports::default_comparison_months(&self.sites, &self.month_axis)
    }

    pub fn timeline(&self, site: &str) -> Result<Vec<TimelineEntry>> {
        Ok(reports::timeline(self.site(site)?))
    }

    pub fn trend_series(&self) -> Vec<TrendSeries> {
        reports::trend_series(&self.sites, &self.month_axis)
    }
}
