//! Advisory listing scrapers and the shared fetch plumbing.
//!
//! Two sources, one pattern each: index a listing page for advisory links,
//! then pull the detail pages through a bounded concurrent fetch pool.
//!
//! # Sources
//!
//! | Source | Module | Link match | RPM region |
//! |--------|--------|------------|------------|
//! | LWN CentOS alerts | [`lwn`] | text starts with `CESA` | first `<p>` |
//! | CentOS-announce archive | [`centos_ml`] | text contains `CESA` | message-body `<div>` |
//!
//! The two matchers are deliberately distinct; the link text differs enough
//! between the sites that a unified pattern would over- or under-match.

pub mod centos_ml;
pub mod lwn;

use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::time::Duration;
use tracing::{error, info, instrument};

/// Width of the detail-page fetch pool.
pub const FETCH_WORKERS: usize = 16;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP client shared by every request in a run.
///
/// One client, one connection pool, and a per-request timeout so a single
/// unresponsive host cannot stall the batch indefinitely.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder().timeout(REQUEST_TIMEOUT).build()
}

/// GET a URL and hand back the response body as text.
///
/// Transport errors propagate to the caller; non-success status codes do not,
/// the body is returned as-is either way.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, reqwest::Error> {
    client.get(url).send().await?.text().await
}

/// Fetch all detail pages concurrently, keeping submission order.
///
/// The pool runs [`FETCH_WORKERS`] requests at a time; `buffered` yields
/// results in input order, so downstream processing sees pages in the order
/// the links were collected. A failed fetch is logged and dropped; one dead
/// page must not sink the rest of the batch.
#[instrument(level = "info", skip_all, fields(count = urls.len()))]
pub async fn fetch_pages(client: &Client, urls: Vec<String>) -> Vec<String> {
    let requested = urls.len();
    let pages: Vec<String> = stream::iter(urls)
        .map(|url| {
            let client = client.clone();
            async move {
                match fetch_text(&client, &url).await {
                    Ok(body) => Some(body),
                    Err(e) => {
                        error!(error = %e, %url, "Fetch failed; skipping page");
                        None
                    }
                }
            }
        })
        .buffered(FETCH_WORKERS)
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(
        fetched = pages.len(),
        skipped = requested - pages.len(),
        "Fetched advisory pages"
    );
    pages
}
