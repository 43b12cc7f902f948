//! Configuration loading (sitemap.toml, environment, flags).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sitemapper_core::{OutputLocation, SitemapConfig};

/// Config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sitemap.toml";

/// Configuration file structure (sitemap.toml).
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    site: SiteSection,
    #[serde(default)]
    scan: ScanSection,
    #[serde(default)]
    output: OutputSection,
}

#[derive(Debug, Deserialize, Default)]
struct SiteSection {
    url: Option<String>,
    root: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ScanSection {
    /// Added to the built-in exclusions
    #[serde(default)]
    exclude: Vec<String>,
    #[serde(default)]
    allow_hidden: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct OutputSection {
    #[serde(default)]
    location: OutputLocation,
    #[serde(default)]
    robots: bool,
}

/// Load configuration from the given file.
/// A missing file falls back to defaults unless it is `required`; a
/// malformed file is always an error.
fn load_config(path: &Path, required: bool) -> Result<ConfigFile> {
    if !path.exists() {
        if required {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Build the sitemap configuration.
///
/// Precedence: flag or environment variable, then the config file, then
/// built-in defaults. An explicitly given config path must exist; the
/// default `sitemap.toml` is optional.
pub fn resolve(
    config_path: Option<&Path>,
    site_url: Option<String>,
    site_root: Option<PathBuf>,
) -> Result<SitemapConfig> {
    let file = match config_path {
        Some(path) => load_config(path, true)?,
        None => load_config(Path::new(DEFAULT_CONFIG_FILE), false)?,
    };
    let mut config = SitemapConfig::default();

    if let Some(url) = site_url.or(file.site.url) {
        config.site_url = url;
    }
    if let Some(root) = site_root.or(file.site.root) {
        config.site_root = root;
    }

    for name in file.scan.exclude {
        if !config.is_excluded(&name) {
            config.exclude_dirs.push(name);
        }
    }
    config.allow_hidden = file.scan.allow_hidden;
    config.output = file.output.location;
    config.robots = file.output.robots;

    Ok(config)
}
