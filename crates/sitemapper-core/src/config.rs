//! Sitemap generation settings.

use std::path::PathBuf;

use serde::Deserialize;

/// Base URL used when none is configured.
pub const DEFAULT_SITE_URL: &str = "https://reverse-shion.github.io";

/// Name of the generated sitemap file.
pub const SITEMAP_FILE: &str = "sitemap.xml";

/// Name of the optional robots file.
pub const ROBOTS_FILE: &str = "robots.txt";

/// Directory names that are never descended into.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    ".git",
    ".github",
    ".hg",
    ".svn",
    "node_modules",
    "scripts",
    "target",
];

/// Where the sitemap is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputLocation {
    /// The process working directory
    #[default]
    WorkingDir,

    /// The scanned site root
    SiteRoot,
}

/// Configuration for generating a sitemap.
#[derive(Debug, Clone)]
pub struct SitemapConfig {
    /// Base URL prefix for every location
    pub site_url: String,

    /// Directory to scan for HTML pages
    pub site_root: PathBuf,

    /// Directory names pruned from the scan
    pub exclude_dirs: Vec<String>,

    /// Hidden directory names that are scanned anyway (e.g. ".well-known")
    pub allow_hidden: Vec<String>,

    /// Where sitemap.xml is written
    pub output: OutputLocation,

    /// Also write robots.txt next to the sitemap
    pub robots: bool,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            site_root: PathBuf::from("."),
            exclude_dirs: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            allow_hidden: vec![],
            output: OutputLocation::default(),
            robots: false,
        }
    }
}

impl SitemapConfig {
    /// Whether a directory with this name is pruned from the scan.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_dirs.iter().any(|d| d == name)
    }

    /// Whether a dot-prefixed directory with this name is scanned.
    pub fn is_hidden_allowed(&self, name: &str) -> bool {
        self.allow_hidden.iter().any(|d| d == name)
    }

    /// Directory that receives sitemap.xml (and robots.txt).
    pub fn output_dir(&self) -> PathBuf {
        match self.output {
            OutputLocation::WorkingDir => PathBuf::from("."),
            OutputLocation::SiteRoot => self.site_root.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_tooling_directories() {
        let config = SitemapConfig::default();

        assert_eq!(config.site_url, DEFAULT_SITE_URL);
        assert!(config.is_excluded(".git"));
        assert!(config.is_excluded("node_modules"));
        assert!(config.is_excluded("scripts"));
        assert!(!config.is_excluded("blog"));
    }

    #[test]
    fn output_dir_follows_location() {
        let mut config = SitemapConfig {
            site_root: PathBuf::from("public"),
            ..Default::default()
        };
        assert_eq!(config.output_dir(), PathBuf::from("."));

        config.output = OutputLocation::SiteRoot;
        assert_eq!(config.output_dir(), PathBuf::from("public"));
    }

    #[test]
    fn hidden_allow_list_matches_exact_names() {
        let config = SitemapConfig {
            allow_hidden: vec![".well-known".to_string()],
            ..Default::default()
        };

        assert!(config.is_hidden_allowed(".well-known"));
        assert!(!config.is_hidden_allowed(".cache"));
    }
}
