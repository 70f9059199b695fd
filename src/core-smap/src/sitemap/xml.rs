//! Renders normalized records as a sitemaps.org 0.9 XML document.

use data_model_smap::RouteRecord;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::errors::{Result, SitemapError};
use crate::sitemap::url_check::validate_url;

/// Most URLs a single sitemap may list.
pub const MAX_URLS: usize = 50_000;

/// Largest uncompressed sitemap, in bytes.
pub const MAX_SIZE_BYTES: usize = 50 * 1024 * 1024;

pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SCHEMA_LOCATION: &str =
    "http://www.sitemaps.org/schemas/sitemap/0.9 http://www.sitemaps.org/schemas/sitemap/0.9/sitemap.xsd";
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Fully resolved fields of one `<url>` entry.
struct Entry<'a> {
    loc: &'a str,
    lastmod: String,
    changefreq: &'static str,
    priority: Option<String>,
    alternates: &'a [(String, String)],
}

/// Renders the sitemap. Alternate links (and the XHTML namespace) are only written when
/// `translation_enabled` is set.
///
/// Nothing is rendered unless every record is complete and every URL valid. Fails with
/// [`SitemapError::TooManyUrls`] above [`MAX_URLS`] records and [`SitemapError::TooLarge`] when the
/// document exceeds [`MAX_SIZE_BYTES`].
pub fn create(records: &[RouteRecord], translation_enabled: bool) -> Result<String> {
    if records.len() > MAX_URLS {
        return Err(SitemapError::TooManyUrls {
            count: records.len(),
            max: MAX_URLS,
        });
    }

    let entries = records
        .iter()
        .map(|record| entry(record, translation_enabled))
        .collect::<Result<Vec<_>>>()?;

    let xml = render(&entries, translation_enabled)?;
    if xml.len() > MAX_SIZE_BYTES {
        return Err(SitemapError::too_large(xml.len()));
    }
    debug!("Rendered sitemap: {} urls, {} bytes", entries.len(), xml.len());
    Ok(xml)
}

fn entry(record: &RouteRecord, translation_enabled: bool) -> Result<Entry<'_>> {
    let name = record.route_name();
    let incomplete = |field| SitemapError::IncompleteRecord {
        route: name.to_string(),
        field,
    };

    let loc = record
        .url()
        .ok_or_else(|| SitemapError::MissingUrl(name.to_string()))?;
    validate_url(loc, &format!("route {name}"))?;

    let alternates = if translation_enabled { record.alternates() } else { &[] };
    for (locale, href) in alternates {
        validate_url(href, &format!("route {name} (alternate {locale})"))?;
    }

    Ok(Entry {
        loc,
        lastmod: record.last_modified_w3c().ok_or_else(|| incomplete("lastmod"))?,
        changefreq: record
            .change_frequency()
            .ok_or_else(|| incomplete("changefreq"))?
            .as_str(),
        priority: record
            .priority()
            .filter(|priority| !priority.is_default())
            .map(|priority| format_priority(f64::from(priority))),
        alternates,
    })
}

/// One decimal place, halves rounded up.
fn format_priority(priority: f64) -> String {
    format!("{:.1}", (priority * 10.0).round() / 10.0)
}

fn render(entries: &[Entry<'_>], translation_enabled: bool) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut urlset = BytesStart::new("urlset");
    urlset.push_attribute(("xmlns", SITEMAP_NAMESPACE));
    urlset.push_attribute(("xmlns:xsi", XSI_NAMESPACE));
    urlset.push_attribute(("xsi:schemaLocation", SCHEMA_LOCATION));
    if translation_enabled {
        urlset.push_attribute(("xmlns:xhtml", XHTML_NAMESPACE));
    }
    write(&mut writer, Event::Start(urlset))?;

    for entry in entries {
        write(&mut writer, Event::Start(BytesStart::new("url")))?;
        write_text_element(&mut writer, "loc", entry.loc)?;
        write_text_element(&mut writer, "lastmod", &entry.lastmod)?;
        write_text_element(&mut writer, "changefreq", entry.changefreq)?;
        if let Some(priority) = &entry.priority {
            write_text_element(&mut writer, "priority", priority)?;
        }
        for (locale, href) in entry.alternates {
            let mut link = BytesStart::new("xhtml:link");
            link.push_attribute(("rel", "alternate"));
            link.push_attribute(("hreflang", locale.as_str()));
            link.push_attribute(("href", href.as_str()));
            write(&mut writer, Event::Empty(link))?;
        }
        write(&mut writer, Event::End(BytesEnd::new("url")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| SitemapError::Xml(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SitemapError::Xml(e.to_string()))
}
