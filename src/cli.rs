//! Command-line interface definitions for the CESA harvester.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The defaults reproduce the unattended run: the LWN listing capped at 100
//! links, templates from `templates/`, output under the current directory.

use crate::models::SourceVariant;
use clap::Parser;

/// Command-line arguments for the CESA harvester.
///
/// # Examples
///
/// ```sh
/// # Default harvest (LWN listing, 100 links)
/// cesa_harvester
///
/// # Harvest the mailing-list archive into a dedicated tree
/// cesa_harvester --source centos-ml --output-dir /var/lib/cesa
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing source to harvest
    #[arg(short, long, value_enum, default_value = "lwn")]
    pub source: SourceVariant,

    /// Maximum number of listing entries to request (lwn source only)
    #[arg(short = 'n', long, default_value_t = 100)]
    pub max_links: usize,

    /// Directory holding template6.yml and template7.yml
    #[arg(short, long, default_value = "templates")]
    pub template_dir: String,

    /// Parent directory of the C6/ and C7/ output trees
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,
}
