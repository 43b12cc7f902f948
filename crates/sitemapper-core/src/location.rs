//! Canonical URLs and timestamps for sitemap entries.

use std::ffi::OsStr;
use std::path::{Component, Path};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use percent_encoding::{AsciiSet, CONTROLS};
use url::Url;

use crate::builder::SitemapError;

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// File name that maps to its containing directory.
pub const INDEX_FILE: &str = "index.html";

/// A single `<url>` element of the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Absolute, percent-encoded URL
    pub location: String,

    /// Last modification time of the page
    pub last_modified: DateTime<Utc>,
}

impl SitemapEntry {
    /// Build the entry for a page at `relative` under the site root.
    pub fn for_page(base_url: &str, relative: &Path, modified: SystemTime) -> Self {
        Self {
            location: page_location(base_url, relative),
            last_modified: DateTime::<Utc>::from(modified),
        }
    }

    /// `<lastmod>` value, `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn lastmod(&self) -> String {
        format_lastmod(&self.last_modified)
    }
}

/// Format a timestamp the way sitemap.xml expects it.
pub fn format_lastmod(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Validate a base URL and strip its trailing slashes.
pub fn normalize_site_url(raw: &str) -> Result<String, SitemapError> {
    let trimmed = raw.trim().trim_end_matches('/');

    let invalid = |message: String| SitemapError::InvalidSiteUrl {
        url: raw.to_string(),
        message,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }

    Ok(trimmed.to_string())
}

/// Canonical URL for a page path relative to the site root.
///
/// `blog/index.html` becomes `{base}/blog/` and each segment is
/// percent-encoded, so the result never contains a backslash.
pub fn page_location(base_url: &str, relative: &Path) -> String {
    let mut segments: Vec<&OsStr> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s),
            _ => None,
        })
        .collect();

    let is_index = segments.last().is_some_and(|s| *s == INDEX_FILE);
    if is_index {
        segments.pop();
    }

    let mut path = segments
        .iter()
        .map(|s| encode_segment(s))
        .collect::<Vec<_>>()
        .join("/");

    if is_index && !path.is_empty() {
        path.push('/');
    }

    format!("{}/{}", base_url, path)
}

/// Percent-encode one path segment from its raw bytes.
///
/// Names that are not valid UTF-8 keep their distinct bytes instead of
/// collapsing onto U+FFFD.
#[cfg(unix)]
fn encode_segment(segment: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;

    percent_encoding::percent_encode(segment.as_bytes(), SEGMENT).to_string()
}

#[cfg(not(unix))]
fn encode_segment(segment: &OsStr) -> String {
    percent_encoding::utf8_percent_encode(&segment.to_string_lossy(), SEGMENT).to_string()
}
