//! sitemapper CLI - generate sitemap.xml for a static site.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use sitemapper_core::{SitemapBuilder, SITEMAP_FILE};
use tracing_subscriber::{fmt, EnvFilter};

mod config;

#[derive(Parser)]
#[command(name = "sitemapper")]
#[command(about = "Generate sitemap.xml for a static site output directory")]
#[command(version)]
pub struct Cli {
    /// Path to a config file (defaults to sitemap.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL prefix for every emitted location
    #[arg(long, env = "SITE_URL")]
    site_url: Option<String>,

    /// Root directory to scan for HTML files
    #[arg(long, env = "SITE_ROOT")]
    site_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout only carries the summary line
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = config::resolve(cli.config.as_deref(), cli.site_url, cli.site_root)?;

    tracing::info!(
        "Scanning {} for {}",
        config.site_root.display(),
        config.site_url
    );

    let result = SitemapBuilder::new(config).generate()?;

    tracing::debug!("Finished in {}ms", result.duration_ms);

    println!(
        "{} generated ({} pages) -> {}",
        SITEMAP_FILE,
        result.urls,
        result.sitemap_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "sitemapper",
            "--site-url",
            "https://example.github.io",
            "--site-root",
            "public",
            "--config",
            "custom.toml",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.site_url.as_deref(), Some("https://example.github.io"));
        assert_eq!(cli.site_root, Some(PathBuf::from("public")));
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(cli.verbose);
    }

    #[test]
    fn environment_sits_between_flags_and_config_file() {
        let temp = tempdir().unwrap();
        let config_path = temp.path().join("sitemap.toml");
        fs::write(
            &config_path,
            "[site]\nurl = \"https://file.example.com\"\nroot = \"from-file\"\n",
        )
        .unwrap();

        // Only this test touches these variables
        std::env::set_var("SITE_URL", "https://env.example.com");
        std::env::set_var("SITE_ROOT", "from-env");

        let from_env = Cli::try_parse_from(["sitemapper"]);
        let from_flag = Cli::try_parse_from(["sitemapper", "--site-url", "https://flag.example.com"]);

        std::env::remove_var("SITE_URL");
        std::env::remove_var("SITE_ROOT");

        let cli = from_env.unwrap();
        assert_eq!(cli.site_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(cli.site_root, Some(PathBuf::from("from-env")));
        assert!(cli.config.is_none());

        let resolved =
            config::resolve(Some(config_path.as_path()), cli.site_url, cli.site_root).unwrap();
        assert_eq!(resolved.site_url, "https://env.example.com");
        assert_eq!(resolved.site_root, PathBuf::from("from-env"));

        let cli = from_flag.unwrap();
        assert_eq!(cli.site_url.as_deref(), Some("https://flag.example.com"));
        assert_eq!(cli.site_root, Some(PathBuf::from("from-env")));
    }
}
