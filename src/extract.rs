//! Field extraction and OS-bucket classification for advisory pages.
//!
//! Advisory pages from both sources are loosely formatted HTML, so the
//! extractor works off the raw page text where it can (advisory number, OS
//! version) and only dips into the DOM for the title and the RPM content
//! region. The region differs per source: the mailing-list archive carries
//! the RPM list in its message-body `<div>`, LWN in the first paragraph of
//! the alert.

use crate::models::{OsBucket, ParsedAdvisory, SourceVariant};
use crate::utils::clean_word;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

static CESA_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"CESA-\d{4}:\d{4}").unwrap());
static OS_VERSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"CentOS\s[6-7]").unwrap());
static RPM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-zA-Z._-]+\.rpm").unwrap());
static PAREN_PACKAGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([0-9A-Za-z.-]+)\)").unwrap());
static ML_TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"CentOS\s[0-9]\s(.*)\sSecurity").unwrap());

/// Extraction failure for a single advisory page.
///
/// Only the missing advisory number is fatal; a page without one cannot be
/// filed anywhere, and the run reports it and stops.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("advisory number (CESA-NNNN:NNNN) not found in page")]
    AdvisoryNumberMissing,
}

/// Pull the structured fields out of one advisory page.
///
/// # Errors
///
/// [`ExtractError::AdvisoryNumberMissing`] when the page contains no
/// `CESA-NNNN:NNNN` substring. Every other field degrades to an empty value
/// rather than failing.
pub fn parse_advisory(html: &str, variant: SourceVariant) -> Result<ParsedAdvisory, ExtractError> {
    let number = CESA_NUMBER_RE
        .find(html)
        .ok_or(ExtractError::AdvisoryNumberMissing)?
        .as_str()
        .to_string();
    let bucket = classify_os(html);

    let document = Html::parse_document(html);
    let title = document_title(&document);
    let package = match variant {
        SourceVariant::Lwn => package_from_lwn_title(&title),
        SourceVariant::CentosMl => package_from_ml_title(&title),
    };
    let rpms = extract_rpms(&document, variant);

    Ok(ParsedAdvisory {
        number,
        package,
        bucket,
        rpms,
    })
}

/// Classify a page into an OS bucket from its `CentOS 6`/`CentOS 7` mentions.
///
/// Bucket 6 wins whenever any `CentOS 6` mention is present; everything else,
/// including pages naming neither version, falls through to bucket 7.
pub fn classify_os(text: &str) -> OsBucket {
    let mut has_six = false;
    let mut has_seven = false;
    for mention in OS_VERSION_RE.find_iter(text) {
        match mention.as_str().chars().last() {
            Some('6') => has_six = true,
            _ => has_seven = true,
        }
    }
    if has_six && has_seven {
        debug!("Page mentions both CentOS 6 and CentOS 7; filing under 6");
    }
    if has_six { OsBucket::Six } else { OsBucket::Seven }
}

fn document_title(document: &Html) -> String {
    let title_selector = Selector::parse("title").unwrap();
    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>())
        .unwrap_or_default()
}

/// LWN titles carry the package as a parenthesized token, e.g.
/// `CentOS alert CESA-2021:1234 (kernel)`.
fn package_from_lwn_title(title: &str) -> String {
    let raw = PAREN_PACKAGE_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();
    clean_word(raw)
}

/// Archive titles wrap the package in `CentOS N <package> Security ...`.
fn package_from_ml_title(title: &str) -> String {
    let raw = ML_TITLE_RE
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or_default();
    clean_word(raw)
}

/// Collect RPM filenames from the variant's content region, de-duplicated
/// and sorted ascending.
fn extract_rpms(document: &Html, variant: SourceVariant) -> Vec<String> {
    let region_selector = match variant {
        SourceVariant::CentosMl => Selector::parse("div.message-text.adbayes-content").unwrap(),
        SourceVariant::Lwn => Selector::parse("p").unwrap(),
    };
    let region_text = document
        .select(&region_selector)
        .next()
        .map(|element| element.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    RPM_RE
        .find_iter(&region_text)
        .map(|m| m.as_str().to_string())
        .unique()
        .sorted()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LWN_PAGE: &str = r#"<html>
<head><title>CentOS alert CESA-2021:1234 (some-package)</title></head>
<body>
<p>CESA-2021:1234 Important CentOS 7 some-package Security Update
Upstream details at the CentOS announce list.
pkg-1.0-1.x86_64.rpm
pkg-1.0-1.noarch.rpm
pkg-1.0-1.x86_64.rpm</p>
<p>unrelated-2.0.rpm in a later paragraph is out of region</p>
</body></html>"#;

    const ML_PAGE: &str = r#"<html>
<head><title>[CentOS-announce] CESA-2020:5009 Important CentOS 6 firefox Security Update</title></head>
<body>
<div class="message-text adbayes-content">
Upgraded packages: firefox-78.6.0-1.el6.centos.x86_64.rpm
firefox-78.6.0-1.el6.centos.i686.rpm
</div>
</body></html>"#;

    #[test]
    fn test_lwn_page_extracts_all_fields() {
        let advisory = parse_advisory(LWN_PAGE, SourceVariant::Lwn).unwrap();
        assert_eq!(advisory.number, "CESA-2021:1234");
        assert_eq!(advisory.package, "some-package");
        assert_eq!(advisory.bucket, OsBucket::Seven);
        assert_eq!(
            advisory.rpms,
            vec!["pkg-1.0-1.noarch.rpm".to_string(), "pkg-1.0-1.x86_64.rpm".to_string()]
        );
    }

    #[test]
    fn test_ml_page_extracts_all_fields() {
        let advisory = parse_advisory(ML_PAGE, SourceVariant::CentosMl).unwrap();
        assert_eq!(advisory.number, "CESA-2020:5009");
        assert_eq!(advisory.package, "firefox");
        assert_eq!(advisory.bucket, OsBucket::Six);
        assert_eq!(
            advisory.rpms,
            vec![
                "firefox-78.6.0-1.el6.centos.i686.rpm".to_string(),
                "firefox-78.6.0-1.el6.centos.x86_64.rpm".to_string(),
            ]
        );
    }

    #[test]
    fn test_missing_advisory_number_is_an_error() {
        let page = "<html><head><title>CentOS 7 kernel Security Update</title></head>\
                    <body><p>no number here</p></body></html>";
        assert_eq!(
            parse_advisory(page, SourceVariant::Lwn).unwrap_err(),
            ExtractError::AdvisoryNumberMissing
        );
    }

    #[test]
    fn test_advisory_number_matches_exact_shape_only() {
        assert!(CESA_NUMBER_RE.find("CESA-2021:1234").is_some());
        assert!(CESA_NUMBER_RE.find("CESA-21:1234").is_none());
        assert!(CESA_NUMBER_RE.find("CESA-2021-1234").is_none());
        assert_eq!(
            CESA_NUMBER_RE.find("prefix CESA-2021:1234 suffix").unwrap().as_str(),
            "CESA-2021:1234"
        );
    }

    #[test]
    fn test_classification_prefers_six() {
        assert_eq!(classify_os("CentOS 6 only"), OsBucket::Six);
        assert_eq!(classify_os("CentOS 7 only"), OsBucket::Seven);
        assert_eq!(classify_os("CentOS 7 and CentOS 6 both"), OsBucket::Six);
    }

    #[test]
    fn test_classification_defaults_to_seven() {
        assert_eq!(classify_os("no version mentioned"), OsBucket::Seven);
        // CentOS 5/8 are outside the matcher's range
        assert_eq!(classify_os("CentOS 8 stream"), OsBucket::Seven);
    }

    #[test]
    fn test_rpm_list_is_deduped_and_sorted() {
        let page = r#"<html><body><p>
            z-last-1.0.rpm a-first-1.0.rpm z-last-1.0.rpm m-middle-2.1.rpm
        </p></body></html>"#;
        let document = Html::parse_document(page);
        let rpms = extract_rpms(&document, SourceVariant::Lwn);
        assert_eq!(rpms, vec!["a-first-1.0.rpm", "m-middle-2.1.rpm", "z-last-1.0.rpm"]);
    }

    #[test]
    fn test_rpm_region_missing_yields_empty_list() {
        let page = "<html><body>no paragraphs at all</body></html>";
        let document = Html::parse_document(page);
        assert!(extract_rpms(&document, SourceVariant::Lwn).is_empty());
        assert!(extract_rpms(&document, SourceVariant::CentosMl).is_empty());
    }

    #[test]
    fn test_lwn_title_without_parenthesized_package_degrades_to_empty() {
        assert_eq!(package_from_lwn_title("CESA-2021:0001 with no parens"), "");
    }

    #[test]
    fn test_ml_title_package_is_cleaned() {
        assert_eq!(
            package_from_ml_title("[CentOS-announce] CESA-2020:5009 CentOS 6 ['firefox'] Security Update"),
            "firefox"
        );
    }
}
