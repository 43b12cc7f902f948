//! Sitemap generation for static sites.
//!
//! Walks a site's output directory, derives a canonical URL and a
//! modification time for every HTML page, and writes `sitemap.xml`.

pub mod builder;
pub mod config;
pub mod discover;
pub mod location;
pub mod render;

pub use builder::{GenerateResult, SitemapBuilder, SitemapError};
pub use config::{OutputLocation, SitemapConfig, DEFAULT_SITE_URL, ROBOTS_FILE, SITEMAP_FILE};
pub use discover::{discover_pages, PageFile};
pub use location::SitemapEntry;
pub use render::{render_robots, render_sitemap, SITEMAP_NAMESPACE};
