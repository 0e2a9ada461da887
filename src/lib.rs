//! Keyword rank tracking reports built from published sheet exports.
//!
//! Each monitored site publishes one sheet as CSV. [`loader`] turns a sheet
//! into a [`types::SiteDocument`], [`dashboard::Dashboard`] gathers all sites
//! into one snapshot, and [`metrics`] / [`reports`] derive the month
//! statistics, rankings and comparisons shown on the dashboard.
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod keywords;
pub mod loader;
pub mod logging;
pub mod metrics;
pub mod month;
pub mod output;
pub mod reports;
pub mod tokenizer;
pub mod types;
pub mod util;

pub use dashboard::Dashboard;
pub use error::{ReportError, Result};
pub use month::MonthKey;
