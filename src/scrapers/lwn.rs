//! LWN.net CentOS alert listing scraper (the aggregator source).
//!
//! The listing at `https://lwn.net/Alerts/CentOS/?n=N` links each advisory
//! as `CESA-YYYY:NNNN (package)` with an href like `/Articles/836047/`. The
//! collector keys advisories by that article id, so repeated listings of the
//! same advisory collapse to the last link seen.

use super::fetch_text;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Production listing host.
pub const LWN_BASE_URL: &str = "https://lwn.net";

/// Listing size used when a caller does not pick one.
pub const DEFAULT_MAX_LINKS: usize = 80;

/// Index the alert listing and map advisory article ids to absolute URLs.
///
/// `base_url` is the scheme+host prefix (tests point it at a local mock
/// server); `max_links` caps the listing via the `?n=` query parameter and
/// falls back to [`DEFAULT_MAX_LINKS`] when `None`.
///
/// An empty response body or a listing with no matching anchors is an empty
/// harvest, not an error.
#[instrument(level = "info", skip(client))]
pub async fn index_advisories(
    client: &Client,
    base_url: &str,
    max_links: Option<usize>,
) -> Result<BTreeMap<String, String>, Box<dyn Error>> {
    let max_links = max_links.unwrap_or(DEFAULT_MAX_LINKS);
    let listing_url = format!("{}/Alerts/CentOS/?n={}", base_url, max_links);
    let base = Url::parse(base_url)?;

    let html = fetch_text(client, &listing_url).await?;
    let mut links = BTreeMap::new();
    if html.trim().is_empty() {
        warn!(url = %listing_url, "Empty listing response; nothing to harvest");
        return Ok(links);
    }

    let document = Html::parse_document(&html);
    let anchor_selector = Selector::parse("a[href]").unwrap();
    for anchor in document.select(&anchor_selector) {
        let text = anchor.text().collect::<String>();
        if !text.trim_start().starts_with("CESA") {
            continue;
        }
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        // Article id is the second path segment of "/Articles/836047/".
        let Some(article_id) = href.split('/').nth(2).filter(|segment| !segment.is_empty())
        else {
            warn!(href, "CESA link without an article id; skipping");
            continue;
        };
        match base.join(href) {
            Ok(resolved) => {
                links.insert(article_id.to_string(), resolved.to_string());
            }
            Err(e) => warn!(error = %e, href, "Unresolvable CESA link; skipping"),
        }
    }

    if links.is_empty() {
        info!(url = %listing_url, "No CESA links found on listing page");
    } else {
        info!(count = links.len(), url = %listing_url, "Indexed CESA links");
        debug!(?links, "LWN CESA links");
    }
    Ok(links)
}
