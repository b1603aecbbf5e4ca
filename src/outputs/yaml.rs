//! YAML check-file rendering.
//!
//! Templates are plain text with three placeholders: `{{ cesa_number }}`,
//! `{{ package_name }}` and `{{ rpms }}` (whitespace inside the braces is
//! tolerated). The first two substitute as raw strings; the RPM list renders
//! as a YAML block sequence, so a template puts the placeholder on its own
//! line under the key that holds the list.

use crate::models::{OsBucket, ParsedAdvisory};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{info, instrument};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*(cesa_number|package_name|rpms)\s*\}\}").unwrap());

/// Where templates are read from and where the per-bucket trees go.
#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Directory holding `template6.yml` and `template7.yml`.
    pub template_dir: PathBuf,
    /// Parent of the `C6/` and `C7/` output directories.
    pub output_dir: PathBuf,
}

impl RenderConfig {
    pub fn template_path(&self, bucket: OsBucket) -> PathBuf {
        self.template_dir.join(bucket.template_filename())
    }

    pub fn bucket_dir(&self, bucket: OsBucket) -> PathBuf {
        self.output_dir.join(bucket.dir_name())
    }
}

/// The two bucket templates, read once per run.
#[derive(Debug)]
pub struct Templates {
    six: String,
    seven: String,
}

impl Templates {
    pub fn new(six: String, seven: String) -> Self {
        Self { six, seven }
    }

    /// Read both template files from the configured template directory.
    pub async fn load(config: &RenderConfig) -> Result<Self, Box<dyn Error>> {
        let six = fs::read_to_string(config.template_path(OsBucket::Six)).await?;
        let seven = fs::read_to_string(config.template_path(OsBucket::Seven)).await?;
        Ok(Self::new(six, seven))
    }

    fn for_bucket(&self, bucket: OsBucket) -> &str {
        match bucket {
            OsBucket::Six => &self.six,
            OsBucket::Seven => &self.seven,
        }
    }
}

/// Substitute one advisory into a template body.
pub fn render(template: &str, advisory: &ParsedAdvisory) -> Result<String, serde_yaml::Error> {
    let rpm_block = serde_yaml::to_string(&advisory.rpms)?;
    let rpm_block = rpm_block.trim_end();
    let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures| match &caps[1] {
        "cesa_number" => advisory.number.clone(),
        "package_name" => advisory.package.clone(),
        _ => rpm_block.to_string(),
    });
    Ok(rendered.into_owned())
}

/// Render an advisory and write it under its bucket directory, overwriting
/// any previous run's file.
#[instrument(
    level = "info",
    skip_all,
    fields(number = %advisory.number, bucket = advisory.bucket.as_str())
)]
pub async fn write_advisory(
    advisory: &ParsedAdvisory,
    templates: &Templates,
    config: &RenderConfig,
) -> Result<PathBuf, Box<dyn Error>> {
    let body = render(templates.for_bucket(advisory.bucket), advisory)?;
    let path = config
        .bucket_dir(advisory.bucket)
        .join(format!("{}.yml", advisory.number));
    fs::write(&path, body).await?;
    info!(path = %path.display(), "Wrote advisory file");
    Ok(path)
}
