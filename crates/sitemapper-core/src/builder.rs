//! Sitemap builder.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{SitemapConfig, ROBOTS_FILE, SITEMAP_FILE};
use crate::discover::discover_pages;
use crate::location::{normalize_site_url, SitemapEntry};
use crate::render::{render_robots, render_sitemap};

/// Result of a generate operation.
#[derive(Debug)]
pub struct GenerateResult {
    /// Number of `<url>` entries written
    pub urls: usize,

    /// Path of the written sitemap
    pub sitemap_path: PathBuf,

    /// Path of the written robots.txt, if enabled
    pub robots_path: Option<PathBuf>,

    /// Total time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur while generating a sitemap.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("No HTML pages found under {root} (check SITE_ROOT)")]
    NoPages { root: String },

    #[error("Site root not found: {0}")]
    RootNotFound(String),

    #[error("Invalid site URL '{url}': {message}")]
    InvalidSiteUrl { url: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Walk { path: String, message: String },

    #[error("Failed to read modification time of {path}: {message}")]
    Metadata { path: String, message: String },

    #[error("Failed to render sitemap: {0}")]
    Render(String),

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

/// Builds sitemap.xml from a directory of HTML pages.
pub struct SitemapBuilder {
    config: SitemapConfig,
}

impl SitemapBuilder {
    /// Create a new sitemap builder.
    pub fn new(config: SitemapConfig) -> Self {
        Self { config }
    }

    /// Scan the site root and return its entries, deduplicated and sorted.
    ///
    /// Finding no pages at all is an error.
    pub fn collect_entries(&self) -> Result<Vec<SitemapEntry>, SitemapError> {
        let site_url = normalize_site_url(&self.config.site_url)?;
        let pages = discover_pages(&self.config)?;

        if pages.is_empty() {
            return Err(SitemapError::NoPages {
                root: self.config.site_root.display().to_string(),
            });
        }

        Ok(collapse(pages.iter().map(|page| {
            SitemapEntry::for_page(&site_url, &page.relative_path, page.modified)
        })))
    }

    /// Generate and write the sitemap.
    ///
    /// Every output is rendered and staged before any of them is moved into
    /// place, so a render or staging failure leaves existing files untouched.
    pub fn generate(&self) -> Result<GenerateResult, SitemapError> {
        let start = Instant::now();

        let entries = self.collect_entries()?;
        let output_dir = self.config.output_dir();

        let mut outputs = vec![(output_dir.join(SITEMAP_FILE), render_sitemap(&entries)?)];
        if self.config.robots {
            let site_url = normalize_site_url(&self.config.site_url)?;
            outputs.push((output_dir.join(ROBOTS_FILE), render_robots(&site_url)));
        }

        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(outputs.len());
        for (path, content) in &outputs {
            match stage(path, content) {
                Ok(tmp_path) => staged.push((tmp_path, path.clone())),
                Err(e) => {
                    discard(&staged);
                    return Err(e);
                }
            }
        }

        for (index, (tmp_path, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp_path, path) {
                discard(&staged[index..]);
                return Err(write_error(path, e));
            }
            tracing::info!("Wrote {}", path.display());
        }

        tracing::info!("Sitemap lists {} URLs", entries.len());

        let mut written = staged.into_iter().map(|(_, path)| path);
        let sitemap_path = written.next().unwrap_or_else(|| output_dir.join(SITEMAP_FILE));
        let robots_path = written.next();

        Ok(GenerateResult {
            urls: entries.len(),
            sitemap_path,
            robots_path,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Deduplicate by location (newest timestamp wins) and sort ascending.
fn collapse(entries: impl IntoIterator<Item = SitemapEntry>) -> Vec<SitemapEntry> {
    let mut by_location: BTreeMap<String, SitemapEntry> = BTreeMap::new();

    for entry in entries {
        match by_location.get(&entry.location) {
            Some(existing) if existing.last_modified >= entry.last_modified => {
                tracing::debug!("Dropping duplicate location {}", entry.location);
            }
            _ => {
                by_location.insert(entry.location.clone(), entry);
            }
        }
    }

    by_location.into_values().collect()
}

/// Sibling temporary path used while staging `path`.
fn temp_path(path: &Path) -> PathBuf {
    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    PathBuf::from(tmp_name)
}

/// Write `content` next to `path` and return the temporary path.
///
/// A failed write removes whatever was created.
fn stage(path: &Path, content: &str) -> Result<PathBuf, SitemapError> {
    let tmp_path = temp_path(path);

    if let Err(e) = fs::write(&tmp_path, content) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_error(&tmp_path, e));
    }

    Ok(tmp_path)
}

/// Remove staged temporary files after a failure.
fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp_path, _) in staged {
        let _ = fs::remove_file(tmp_path);
    }
}

fn write_error(path: &Path, e: std::io::Error) -> SitemapError {
    SitemapError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
