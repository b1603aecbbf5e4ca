//! CentOS-announce mailing-list archive scraper (the Nabble mirror).
//!
//! The archive exposes no pagination control, so this collector walks a
//! single listing page. Post links match on a loose "contains CESA" test
//! because the archive wraps advisory numbers in `[CentOS-announce]`
//! subjects. The same advisory can appear under several views, so the
//! returned list may carry duplicates; the pipeline de-dups later on the
//! advisory subject key.

use super::fetch_text;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Production archive host.
pub const CENTOS_ML_BASE_URL: &str = "http://centos-announce.2309468.n4.nabble.com";

/// Index the archive listing into an ordered sequence of absolute URLs.
#[instrument(level = "info", skip(client))]
pub async fn index_advisories(
    client: &Client,
    base_url: &str,
) -> Result<Vec<String>, Box<dyn Error>> {
    let base = Url::parse(base_url)?;

    let html = fetch_text(client, base.as_str()).await?;
    let document = Html::parse_document(&html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    for anchor in document.select(&anchor_selector) {
        let text = anchor.text().collect::<String>();
        if !text.contains("CESA") {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        match base.join(href) {
            Ok(resolved) => links.push(resolved.to_string()),
            Err(e) => warn!(error = %e, href, "Unresolvable CESA link; skipping"),
        }
    }

    if links.is_empty() {
        info!(url = %base_url, "No CESA links found on archive page");
    } else {
        info!(count = links.len(), url = %base_url, "Indexed CESA links");
        debug!(?links, "Archive CESA links");
    }
    Ok(links)
}
