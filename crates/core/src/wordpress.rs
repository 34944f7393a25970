//! WordPress eXtended RSS (WXR) export parsing.
//!
//! Only the parts needed to import posts and pages are read: channel-level
//! category and tag definitions, and each `<item>` with its content,
//! status, type, dates and category/tag references.

use chrono::{DateTime, NaiveDateTime, Utc};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;

use crate::slug::slugify;

/// Post type of regular blog posts.
pub const POST_TYPE_POST: &str = "post";
/// Post type of static pages.
pub const POST_TYPE_PAGE: &str = "page";
/// Status of published items.
pub const STATUS_PUBLISH: &str = "publish";

const WP_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum WxrError {
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML attribute: {0}")]
    Attr(#[from] AttrError),

    #[error("Not a WordPress export: missing <rss> root element")]
    NotWxr,
}

/// A category or tag: display name plus slug (`nicename`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WxrTerm {
    pub name: String,
    pub slug: String,
}

impl WxrTerm {
    /// The term slug, derived from the name when the export left it blank.
    pub fn effective_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.name)
        } else {
            self.slug.trim().to_lowercase()
        }
    }
}

/// One `<item>` of the export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WxrItem {
    pub wp_id: Option<i64>,
    pub title: String,
    pub link: String,
    pub slug: String,
    pub content: String,
    pub excerpt: String,
    pub status: String,
    pub post_type: String,
    pub post_date: Option<DateTime<Utc>>,
    pub categories: Vec<WxrTerm>,
    pub tags: Vec<WxrTerm>,
}

impl WxrItem {
    pub fn is_published(&self) -> bool {
        self.status == STATUS_PUBLISH
    }

    /// `wp:post_name` when present, otherwise a slug derived from the title.
    pub fn effective_slug(&self) -> String {
        if self.slug.trim().is_empty() {
            slugify(&self.title)
        } else {
            self.slug.trim().to_lowercase()
        }
    }
}

/// Parsed export.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WxrExport {
    pub categories: Vec<WxrTerm>,
    pub tags: Vec<WxrTerm>,
    pub items: Vec<WxrItem>,
}

/// Raw date strings collected while an item is open.
#[derive(Default)]
struct ItemDates {
    gmt: Option<String>,
    local: Option<String>,
    pub_date: Option<String>,
}

impl ItemDates {
    /// GMT date first, then the local date (treated as UTC), then `pubDate`.
    /// Unset WordPress dates (`0000-00-00 00:00:00`) are skipped.
    fn resolve(&self) -> Option<DateTime<Utc>> {
        let parse_wp = |raw: &Option<String>| {
            raw.as_deref()
                .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), WP_DATE_FORMAT).ok())
                .map(|naive| naive.and_utc())
        };
        parse_wp(&self.gmt).or_else(|| parse_wp(&self.local)).or_else(|| {
            self.pub_date
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc2822(s.trim()).ok())
                .map(|dt| dt.with_timezone(&Utc))
        })
    }
}

/// Where a `<category>` reference inside an item points.
enum TermDomain {
    Category,
    Tag,
    Other,
}

/// Parse a WXR document.
pub fn parse_wxr(xml: &str) -> Result<WxrExport, WxrError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut export = WxrExport::default();
    let mut saw_rss = false;
    let mut text = String::new();

    let mut item: Option<WxrItem> = None;
    let mut dates = ItemDates::default();
    let mut term: Option<WxrTerm> = None;
    let mut item_term: Option<(TermDomain, String)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                text.clear();
                match e.name().as_ref() {
                    b"rss" => saw_rss = true,
                    b"item" => {
                        item = Some(WxrItem::default());
                        dates = ItemDates::default();
                    }
                    b"wp:category" | b"wp:tag" if item.is_none() => {
                        term = Some(WxrTerm::default());
                    }
                    b"category" if item.is_some() => {
                        item_term = Some(read_item_term(&e)?);
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => {
                if e.name().as_ref() == b"rss" {
                    saw_rss = true;
                }
            }
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
            Event::End(e) => {
                let value = std::mem::take(&mut text);
                let name = e.name();
                let name = name.as_ref();

                if let Some(current) = item.as_mut() {
                    match name {
                        b"title" => current.title = value,
                        b"link" => current.link = value,
                        b"wp:post_name" => current.slug = value,
                        b"content:encoded" => current.content = value,
                        b"excerpt:encoded" => current.excerpt = value,
                        b"wp:status" => current.status = value,
                        b"wp:post_type" => current.post_type = value,
                        b"wp:post_id" => current.wp_id = value.trim().parse().ok(),
                        b"wp:post_date_gmt" => dates.gmt = Some(value),
                        b"wp:post_date" => dates.local = Some(value),
                        b"pubDate" => dates.pub_date = Some(value),
                        b"category" => {
                            if let Some((domain, slug)) = item_term.take() {
                                let reference = WxrTerm { name: value, slug };
                                match domain {
                                    TermDomain::Category => current.categories.push(reference),
                                    TermDomain::Tag => current.tags.push(reference),
                                    TermDomain::Other => {}
                                }
                            }
                        }
                        b"item" => {
                            if let Some(mut finished) = item.take() {
                                finished.post_date = dates.resolve();
                                export.items.push(finished);
                            }
                        }
                        _ => {}
                    }
                } else if let Some(current) = term.as_mut() {
                    match name {
                        b"wp:cat_name" | b"wp:tag_name" => current.name = value,
                        b"wp:category_nicename" | b"wp:tag_slug" => current.slug = value,
                        b"wp:category" => {
                            if let Some(done) = term.take() {
                                export.categories.push(done);
                            }
                        }
                        b"wp:tag" => {
                            if let Some(done) = term.take() {
                                export.tags.push(done);
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_rss {
        return Err(WxrError::NotWxr);
    }
    Ok(export)
}

fn read_item_term(e: &BytesStart<'_>) -> Result<(TermDomain, String), WxrError> {
    let mut domain = TermDomain::Other;
    let mut nicename = String::new();
    for attr in e.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"domain" => {
                domain = match attr.unescape_value()?.as_ref() {
                    "category" => TermDomain::Category,
                    "post_tag" => TermDomain::Tag,
                    _ => TermDomain::Other,
                }
            }
            b"nicename" => nicename = attr.unescape_value()?.into_owned(),
            _ => {}
        }
    }
    Ok((domain, nicename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
    xmlns:excerpt="http://wordpress.org/export/1.2/excerpt/"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:wp="http://wordpress.org/export/1.2/">
<channel>
    <title>Old Blog</title>
    <wp:category>
        <wp:term_id>3</wp:term_id>
        <wp:category_nicename>movies</wp:category_nicename>
        <wp:category_parent></wp:category_parent>
        <wp:cat_name><![CDATA[Movies]]></wp:cat_name>
    </wp:category>
    <wp:tag>
        <wp:term_id>9</wp:term_id>
        <wp:tag_slug>action</wp:tag_slug>
        <wp:tag_name><![CDATA[Action]]></wp:tag_name>
    </wp:tag>
    <item>
        <title>Henry Danger S1 &amp; S2</title>
        <link>https://old.test/henry-danger/</link>
        <pubDate>Tue, 02 Jan 2024 10:00:00 +0000</pubDate>
        <content:encoded><![CDATA[<p>Full <b>season</b> download.</p>]]></content:encoded>
        <excerpt:encoded><![CDATA[Season pack]]></excerpt:encoded>
        <wp:post_id>42</wp:post_id>
        <wp:post_date><![CDATA[2024-01-02 11:00:00]]></wp:post_date>
        <wp:post_date_gmt><![CDATA[2024-01-02 10:00:00]]></wp:post_date_gmt>
        <wp:post_name><![CDATA[henry-danger]]></wp:post_name>
        <wp:status><![CDATA[publish]]></wp:status>
        <wp:post_type><![CDATA[post]]></wp:post_type>
        <category domain="category" nicename="movies"><![CDATA[Movies]]></category>
        <category domain="post_tag" nicename="action"><![CDATA[Action]]></category>
        <category domain="post_format" nicename="post-format-video"><![CDATA[Video]]></category>
        <wp:postmeta>
            <wp:meta_key><![CDATA[_edit_last]]></wp:meta_key>
            <wp:meta_value><![CDATA[1]]></wp:meta_value>
        </wp:postmeta>
    </item>
    <item>
        <title>About Us</title>
        <pubDate>Mon, 30 Nov -0001 00:00:00 +0000</pubDate>
        <content:encoded><![CDATA[About page]]></content:encoded>
        <wp:post_date><![CDATA[2023-06-01 08:30:00]]></wp:post_date>
        <wp:post_date_gmt><![CDATA[0000-00-00 00:00:00]]></wp:post_date_gmt>
        <wp:post_name></wp:post_name>
        <wp:status><![CDATA[draft]]></wp:status>
        <wp:post_type><![CDATA[page]]></wp:post_type>
    </item>
</channel>
</rss>"#;

    #[test]
    fn parses_channel_terms() {
        let export = parse_wxr(SAMPLE).unwrap();
        assert_eq!(
            export.categories,
            vec![WxrTerm { name: "Movies".into(), slug: "movies".into() }]
        );
        assert_eq!(
            export.tags,
            vec![WxrTerm { name: "Action".into(), slug: "action".into() }]
        );
    }

    #[test]
    fn parses_post_item() {
        let export = parse_wxr(SAMPLE).unwrap();
        assert_eq!(export.items.len(), 2);

        let post = &export.items[0];
        assert_eq!(post.wp_id, Some(42));
        assert_eq!(post.title, "Henry Danger S1 & S2");
        assert_eq!(post.effective_slug(), "henry-danger");
        assert_eq!(post.content, "<p>Full <b>season</b> download.</p>");
        assert_eq!(post.excerpt, "Season pack");
        assert_eq!(post.post_type, POST_TYPE_POST);
        assert!(post.is_published());
        assert_eq!(post.post_date, Some(Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()));
        assert_eq!(post.categories.len(), 1);
        assert_eq!(post.categories[0].effective_slug(), "movies");
        assert_eq!(post.tags, vec![WxrTerm { name: "Action".into(), slug: "action".into() }]);
    }

    #[test]
    fn page_item_falls_back_to_local_date_and_title_slug() {
        let export = parse_wxr(SAMPLE).unwrap();
        let page = &export.items[1];
        assert_eq!(page.post_type, POST_TYPE_PAGE);
        assert!(!page.is_published());
        assert_eq!(page.effective_slug(), "about-us");
        assert_eq!(page.post_date, Some(Utc.with_ymd_and_hms(2023, 6, 1, 8, 30, 0).unwrap()));
    }

    #[test]
    fn term_slug_derived_from_name_when_blank() {
        let term = WxrTerm { name: "Nollywood Movies".into(), slug: String::new() };
        assert_eq!(term.effective_slug(), "nollywood-movies");
    }

    #[test]
    fn rejects_non_wxr_documents() {
        assert_matches!(parse_wxr("<feed><entry/></feed>"), Err(WxrError::NotWxr));
    }

    #[test]
    fn rejects_malformed_xml() {
        assert!(parse_wxr("<rss><channel><item></channel></rss>").is_err());
    }
}
