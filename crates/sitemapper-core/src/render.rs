//! Sitemap and robots.txt serialization.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::builder::SitemapError;
use crate::config::SITEMAP_FILE;
use crate::location::SitemapEntry;

/// Namespace of the sitemap protocol schema.
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render entries as a sitemap document, one `<url>` per line.
pub fn render_sitemap(entries: &[SitemapEntry]) -> Result<String, SitemapError> {
    let mut writer = Writer::new(Vec::new());

    write_event(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    write_event(&mut writer, Event::Text(BytesText::new("\n")))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    write_event(&mut writer, Event::Start(urlset))?;

    for entry in entries {
        write_event(&mut writer, Event::Text(BytesText::new("\n  ")))?;
        write_event(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_element(&mut writer, "loc", &entry.location)?;
        write_element(&mut writer, "lastmod", &entry.lastmod())?;
        write_event(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write_event(&mut writer, Event::Text(BytesText::new("\n")))?;
    write_event(&mut writer, Event::End(BytesEnd::new("urlset")))?;
    write_event(&mut writer, Event::Text(BytesText::new("\n")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Render(e.to_string()))
}

/// Render a robots.txt that points crawlers at the sitemap.
pub fn render_robots(site_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\nSitemap: {}/{}\n",
        site_url, SITEMAP_FILE
    )
}

/// Write `<name>text</name>`, escaping the text.
fn write_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SitemapError> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(text)))?;
    write_event(writer, Event::End(BytesEnd::new(name)))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SitemapError> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Render(e.to_string()))
}
