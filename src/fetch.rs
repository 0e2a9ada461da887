// Sheet transport: one GET per configured site, issued concurrently.
//
// Failures stay attached to their site; assembling the snapshot decides what
// a failure means for that site (see `Dashboard::assemble`).
use crate::config::{DashboardConfig, SiteConfig};
use crate::error::{ReportError, Result};
use futures::future::join_all;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of fetching one site's sheet.
#[derive(Debug)]
pub struct SiteFetch {
    pub site: SiteConfig,
    pub body: Result<String>,
}

pub fn build_client(config: &DashboardConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|source| ReportError::Transport {
            site: String::from("*"),
            source,
        })
}

pub async fn fetch_sheet(client: &Client, base_url: &str, site: &SiteConfig) -> Result<String> {
    let url = site.csv_url(base_url);
    debug!(site = %site.name, %url, "fetching sheet");
    let transport = |source| ReportError::Transport {
        site: site.name.clone(),
        source,
    };
    let response = client.get(&url).send().await.map_err(transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ReportError::HttpStatus {
            site: site.name.clone(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(transport)
}

/// Fetch every configured sheet. Results come back in configuration order
/// regardless of which request finished first.
pub async fn fetch_all(config: &DashboardConfig) -> Result<Vec<SiteFetch>> {
    let client = build_client(config)?;
    let requests = config.sites.iter().map(|site| {
        let client = &client;
        async move {
            let body = fetch_sheet(client, &config.base_url, site).await;
            match &body {
                Ok(text) => info!(site = %site.name, bytes = text.len(), "sheet loaded"),
                Err(e) => warn!(site = %site.name, error = %e, "sheet unavailable this cycle"),
            }
            SiteFetch {
                site: site.clone(),
                body,
            }
        }
    });
    Ok(join_all(requests).await)
}
