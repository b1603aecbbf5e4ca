//! Data models for advisories moving through the harvest pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`OsBucket`]: the CentOS major-version grouping an advisory is filed under
//! - [`SourceVariant`]: which listing source a page came from
//! - [`AdvisoryLinks`]: the two collector result shapes behind one accessor
//! - [`ParsedAdvisory`]: the extracted fields of one advisory, ready to render

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

/// The CentOS major version an advisory applies to.
///
/// Each bucket owns a template file and an output directory. Classification
/// favors [`OsBucket::Six`] whenever a `CentOS 6` mention is present on the
/// page; [`OsBucket::Seven`] is the fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum OsBucket {
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
}

impl OsBucket {
    /// The major version digit as it appears in page text and paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            OsBucket::Six => "6",
            OsBucket::Seven => "7",
        }
    }

    /// Template file consumed when rendering this bucket.
    pub fn template_filename(&self) -> &'static str {
        match self {
            OsBucket::Six => "template6.yml",
            OsBucket::Seven => "template7.yml",
        }
    }

    /// Directory the rendered files land in, relative to the output root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            OsBucket::Six => "C6",
            OsBucket::Seven => "C7",
        }
    }
}

/// Which listing source drives a run.
///
/// The variant selects the link matcher, the title-extraction rule, and the
/// content region the RPM list is read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceVariant {
    /// LWN.net CentOS alert listing (paginated via a `?n=` query parameter).
    Lwn,
    /// CentOS-announce mailing-list web archive (single listing page).
    CentosMl,
}

/// Collector results in their native shape.
///
/// The LWN collector keys advisories by article id so repeated listings of
/// the same advisory collapse (last occurrence wins); the archive collector
/// keeps page order and may carry duplicates. [`AdvisoryLinks::into_urls`]
/// is the uniform accessor the pipeline iterates.
#[derive(Debug)]
pub enum AdvisoryLinks {
    /// Advisory identifier -> absolute detail-page URL.
    Keyed(BTreeMap<String, String>),
    /// Absolute detail-page URLs in listing order.
    Ordered(Vec<String>),
}

impl AdvisoryLinks {
    pub fn len(&self) -> usize {
        match self {
            AdvisoryLinks::Keyed(map) => map.len(),
            AdvisoryLinks::Ordered(urls) => urls.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten to the URL sequence handed to the fetch pool.
    pub fn into_urls(self) -> Vec<String> {
        match self {
            AdvisoryLinks::Keyed(map) => map.into_values().collect(),
            AdvisoryLinks::Ordered(urls) => urls,
        }
    }
}

/// One advisory's extracted fields.
///
/// Invariants: `number` matches `CESA-NNNN:NNNN` and `rpms` is de-duplicated
/// and sorted ascending; both are established by the extractor before a value
/// of this type exists.
#[derive(Debug, Serialize)]
pub struct ParsedAdvisory {
    /// Advisory number, e.g. `CESA-2021:1234`.
    pub number: String,
    /// Package (or short description) the advisory covers.
    pub package: String,
    /// OS-version bucket the advisory was classified into.
    pub bucket: OsBucket,
    /// Updated RPM filenames, de-duplicated and sorted.
    pub rpms: Vec<String>,
}

impl ParsedAdvisory {
    /// Composite key used to skip duplicate pages within a single run.
    pub fn subject_key(&self) -> String {
        format!("{}#{}", self.package, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_links_flatten_in_key_order() {
        let mut map = BTreeMap::new();
        map.insert("900".to_string(), "https://lwn.net/Articles/900/".to_string());
        map.insert("100".to_string(), "https://lwn.net/Articles/100/".to_string());
        let links = AdvisoryLinks::Keyed(map);
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.into_urls(),
            vec![
                "https://lwn.net/Articles/100/".to_string(),
                "https://lwn.net/Articles/900/".to_string(),
            ]
        );
    }

    #[test]
    fn test_ordered_links_keep_duplicates_and_order() {
        let links = AdvisoryLinks::Ordered(vec![
            "http://a/1".to_string(),
            "http://a/2".to_string(),
            "http://a/1".to_string(),
        ]);
        assert_eq!(links.len(), 3);
        assert_eq!(links.into_urls(), vec!["http://a/1", "http://a/2", "http://a/1"]);
    }

    #[test]
    fn test_empty_links() {
        assert!(AdvisoryLinks::Keyed(BTreeMap::new()).is_empty());
        assert!(AdvisoryLinks::Ordered(Vec::new()).is_empty());
    }

    #[test]
    fn test_subject_key() {
        let advisory = ParsedAdvisory {
            number: "CESA-2021:1234".to_string(),
            package: "kernel".to_string(),
            bucket: OsBucket::Seven,
            rpms: vec![],
        };
        assert_eq!(advisory.subject_key(), "kernel#CESA-2021:1234");
    }

    #[test]
    fn test_advisory_serializes_bucket_as_digit() {
        let advisory = ParsedAdvisory {
            number: "CESA-2020:5009".to_string(),
            package: "firefox".to_string(),
            bucket: OsBucket::Six,
            rpms: vec!["firefox-78.6.0-1.el6.centos.x86_64.rpm".to_string()],
        };
        let yaml = serde_yaml::to_string(&advisory).unwrap();
        assert!(yaml.contains("package: firefox"));
        assert!(yaml.contains("'6'"));
    }

    #[test]
    fn test_bucket_paths() {
        assert_eq!(OsBucket::Six.dir_name(), "C6");
        assert_eq!(OsBucket::Six.template_filename(), "template6.yml");
        assert_eq!(OsBucket::Seven.dir_name(), "C7");
        assert_eq!(OsBucket::Seven.template_filename(), "template7.yml");
    }
}
