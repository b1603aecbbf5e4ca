//! # CESA Harvester
//!
//! Scrapes CentOS security advisory (CESA) announcements from LWN.net or the
//! CentOS-announce mailing-list archive, extracts the structured fields of
//! each advisory, and renders one YAML check file per advisory.
//!
//! ## Usage
//!
//! ```sh
//! cesa_harvester --template-dir templates --output-dir .
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Indexing**: collect advisory links from the chosen listing source
//! 2. **Fetching**: download detail pages through a width-16 fetch pool
//! 3. **Extraction**: pull advisory number, package name and RPM list from
//!    each page and classify it into the CentOS 6 or CentOS 7 bucket
//! 4. **Output**: substitute the fields into the bucket template and write
//!    `C6/<number>.yml` or `C7/<number>.yml`

use clap::Parser;
use std::collections::HashSet;
use std::error::Error;
use std::path::PathBuf;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod extract;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use extract::{parse_advisory, ExtractError};
use models::{AdvisoryLinks, OsBucket, SourceVariant};
use outputs::yaml::{write_advisory, RenderConfig, Templates};
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("cesa_harvester starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    match run(&args).await {
        Ok(written) => {
            let elapsed = start_time.elapsed();
            info!(files = written, ?elapsed, "Execution complete");
            Ok(())
        }
        Err(e) => {
            // The one anticipated failure: a page with no advisory number.
            // Report it and end the run without a failure status.
            if let Some(extract_error) = e.downcast_ref::<ExtractError>() {
                error!(error = %extract_error, "Could not extract advisory content; run aborted");
                Ok(())
            } else {
                Err(e)
            }
        }
    }
}

/// Run the full harvest pipeline and return the number of files written.
#[instrument(level = "info", skip_all, fields(source = ?args.source))]
async fn run(args: &Cli) -> Result<usize, Box<dyn Error>> {
    let render_config = RenderConfig {
        template_dir: PathBuf::from(&args.template_dir),
        output_dir: PathBuf::from(&args.output_dir),
    };

    // Early check: both bucket trees must be writable before any fetching
    ensure_writable_dir(&render_config.bucket_dir(OsBucket::Six)).await?;
    ensure_writable_dir(&render_config.bucket_dir(OsBucket::Seven)).await?;

    let templates = Templates::load(&render_config).await?;
    info!(template_dir = %render_config.template_dir.display(), "Loaded bucket templates");

    let client = scrapers::http_client()?;

    // ---- Index advisory links ----
    let links = match args.source {
        SourceVariant::Lwn => AdvisoryLinks::Keyed(
            scrapers::lwn::index_advisories(
                &client,
                scrapers::lwn::LWN_BASE_URL,
                Some(args.max_links),
            )
            .await?,
        ),
        SourceVariant::CentosMl => AdvisoryLinks::Ordered(
            scrapers::centos_ml::index_advisories(
                &client,
                scrapers::centos_ml::CENTOS_ML_BASE_URL,
            )
            .await?,
        ),
    };

    if links.is_empty() {
        info!("No advisories to process");
        return Ok(0);
    }

    let urls = links.into_urls();
    info!(count = urls.len(), "Collected advisory links");

    // ---- Fetch detail pages (16 at a time) ----
    let pages = scrapers::fetch_pages(&client, urls).await;

    // ---- Extract, classify and render sequentially ----
    let mut seen_subjects = HashSet::new();
    let mut written = 0usize;
    for page in &pages {
        let advisory = parse_advisory(page, args.source)?;
        if !seen_subjects.insert(advisory.subject_key()) {
            debug!(number = %advisory.number, "Duplicate advisory; skipping");
            continue;
        }
        let path = write_advisory(&advisory, &templates, &render_config).await?;
        debug!(
            path = %path.display(),
            package = %advisory.package,
            rpms = advisory.rpms.len(),
            "Rendered advisory"
        );
        written += 1;
    }

    info!(pages = pages.len(), written, "Processed advisory pages");
    Ok(written)
}
