//! Sitemap protocol documents, the browser stylesheet and `robots.txt`.
//!
//! Rendering is pure: callers collect [`UrlEntry`] values from the database
//! and pass absolute URLs in.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

/// Maximum URLs per sitemap page (sitemap protocol limit).
pub const URLS_PER_PAGE: i64 = 50_000;

/// Path of the XSL stylesheet referenced by every sitemap document.
pub const STYLESHEET_PATH: &str = "/sitemap.xsl";

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// How often a page is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// The sections listed in the sitemap index, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Blog,
    Categories,
    Tags,
    Static,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Blog, Section::Categories, Section::Tags, Section::Static];

    pub fn name(self) -> &'static str {
        match self {
            Section::Blog => "blog",
            Section::Categories => "categories",
            Section::Tags => "tags",
            Section::Static => "static",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Section::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn changefreq(self) -> ChangeFreq {
        match self {
            Section::Blog => ChangeFreq::Daily,
            Section::Categories | Section::Tags => ChangeFreq::Weekly,
            Section::Static => ChangeFreq::Monthly,
        }
    }

    pub fn priority(self) -> f32 {
        match self {
            Section::Blog => 0.9,
            Section::Categories | Section::Static => 0.8,
            Section::Tags => 0.7,
        }
    }

    /// Site-relative path of this section's sitemap.
    pub fn path(self) -> String {
        format!("/sitemap-{}.xml", self.name())
    }
}

/// Escape text for inclusion in XML character data or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Join a base URL (no trailing slash needed) and a site-relative path.
pub fn absolute_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn prolog() -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <?xml-stylesheet type=\"text/xsl\" href=\"{STYLESHEET_PATH}\"?>\n"
    )
}

/// Render a `<urlset>` document.
pub fn render_urlset(entries: &[UrlEntry]) -> String {
    let mut xml = prolog();
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NS}\">");
    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc));
        if let Some(lastmod) = entry.lastmod {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", lastmod.format("%Y-%m-%d"));
        }
        let _ = writeln!(xml, "    <changefreq>{}</changefreq>", entry.changefreq.as_str());
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` document listing absolute sitemap URLs.
pub fn render_index(sitemap_urls: &[String]) -> String {
    let mut xml = prolog();
    let _ = writeln!(xml, "<sitemapindex xmlns=\"{SITEMAP_NS}\">");
    for url in sitemap_urls {
        let _ = writeln!(xml, "  <sitemap>\n    <loc>{}</loc>\n  </sitemap>", escape_xml(url));
    }
    xml.push_str("</sitemapindex>\n");
    xml
}

/// `robots.txt` body advertising the sitemap index.
pub fn robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\nDisallow: /api/\nAllow: /\n\nSitemap: {}\n",
        absolute_url(site_url, "/sitemap.xml")
    )
}

/// XSL stylesheet that renders sitemap documents as HTML tables in a browser.
pub const SITEMAP_XSL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xsl:stylesheet version="1.0"
    xmlns:xsl="http://www.w3.org/1999/XSL/Transform"
    xmlns:sitemap="http://www.sitemaps.org/schemas/sitemap/0.9">
  <xsl:output method="html" encoding="UTF-8" indent="yes"/>
  <xsl:template match="/">
    <html>
      <head>
        <title>XML Sitemap</title>
        <style type="text/css">
          body { font-family: sans-serif; color: #333; margin: 2em; }
          table { border-collapse: collapse; width: 100%; }
          th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid #eee; }
          th { background: #f8f9fa; }
          a { color: #0366d6; text-decoration: none; }
        </style>
      </head>
      <body>
        <h1>XML Sitemap</h1>
        <xsl:choose>
          <xsl:when test="sitemap:sitemapindex">
            <p>This index contains <xsl:value-of select="count(sitemap:sitemapindex/sitemap:sitemap)"/> sitemaps.</p>
            <table>
              <tr><th>Sitemap</th></tr>
              <xsl:for-each select="sitemap:sitemapindex/sitemap:sitemap">
                <tr><td><a href="{sitemap:loc}"><xsl:value-of select="sitemap:loc"/></a></td></tr>
              </xsl:for-each>
            </table>
          </xsl:when>
          <xsl:otherwise>
            <p>This sitemap contains <xsl:value-of select="count(sitemap:urlset/sitemap:url)"/> URLs.</p>
            <table>
              <tr><th>URL</th><th>Last modified</th><th>Change frequency</th><th>Priority</th></tr>
              <xsl:for-each select="sitemap:urlset/sitemap:url">
                <tr>
                  <td><a href="{sitemap:loc}"><xsl:value-of select="sitemap:loc"/></a></td>
                  <td><xsl:value-of select="sitemap:lastmod"/></td>
                  <td><xsl:value-of select="sitemap:changefreq"/></td>
                  <td><xsl:value-of select="sitemap:priority"/></td>
                </tr>
              </xsl:for-each>
            </table>
          </xsl:otherwise>
        </xsl:choose>
      </body>
    </html>
  </xsl:template>
</xsl:stylesheet>
"#;
