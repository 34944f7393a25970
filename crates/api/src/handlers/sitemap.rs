//! XML sitemaps, the sitemap stylesheet and `robots.txt`.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use hypeblog_core::sitemap::{
    absolute_url, render_index, render_urlset, robots_txt, Section, UrlEntry, SITEMAP_XSL,
    URLS_PER_PAGE,
};
use hypeblog_core::types::Timestamp;
use hypeblog_db::models::post::post_url;
use hypeblog_db::models::sitemap::TermSitemapRow;
use hypeblog_db::repositories::SitemapRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const XML: &str = "application/xml; charset=utf-8";

/// Static public paths listed in the `static` section.
const STATIC_PATHS: &[&str] = &["/", "/search/"];

#[derive(Debug, Default, Deserialize)]
pub struct SitemapParams {
    /// 1-based page of the section.
    pub p: Option<i64>,
}

/// GET /sitemap.xml
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let urls: Vec<String> = Section::ALL
        .iter()
        .map(|section| absolute_url(&state.config.site_url, &section.path()))
        .collect();

    ([(CONTENT_TYPE, XML)], render_index(&urls))
}

/// GET /sitemap-{section}.xml?p=
///
/// Any other single-segment path without a trailing slash is 404.
pub async fn root_section(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(params): Query<SitemapParams>,
) -> AppResult<impl IntoResponse> {
    let name = file
        .strip_prefix("sitemap-")
        .ok_or_else(|| AppError::NotFound(format!("No page '/{file}'")))?;
    render_section(&state, name, params.p).await
}

/// GET /sitemaps/{section}.xml?p=
pub async fn section(
    State(state): State<AppState>,
    Path(file): Path<String>,
    Query(params): Query<SitemapParams>,
) -> AppResult<impl IntoResponse> {
    render_section(&state, &file, params.p).await
}

/// Unknown sections and empty pages past the first are 404.
async fn render_section(
    state: &AppState,
    file: &str,
    page: Option<i64>,
) -> AppResult<impl IntoResponse> {
    let section = file
        .strip_suffix(".xml")
        .and_then(Section::from_name)
        .ok_or_else(|| AppError::NotFound(format!("No sitemap '{file}'")))?;

    let page = page.unwrap_or(1).max(1);
    let offset = (page - 1).saturating_mul(URLS_PER_PAGE);
    let site_url = state.config.site_url.as_str();

    let entry = |path: String, lastmod: Option<Timestamp>| UrlEntry {
        loc: absolute_url(site_url, &path),
        lastmod,
        changefreq: section.changefreq(),
        priority: section.priority(),
    };
    let terms = |rows: Vec<TermSitemapRow>, prefix: &str| -> Vec<UrlEntry> {
        rows.into_iter()
            .map(|row| entry(format!("/{prefix}/{}/", row.slug), row.lastmod))
            .collect()
    };

    let entries: Vec<UrlEntry> = match section {
        Section::Blog => SitemapRepo::posts(&state.pool, URLS_PER_PAGE, offset)
            .await?
            .into_iter()
            .map(|row| entry(post_url(&row.category_slug, &row.slug), Some(row.updated_at)))
            .collect(),
        Section::Categories => terms(
            SitemapRepo::categories(&state.pool, URLS_PER_PAGE, offset).await?,
            "category",
        ),
        Section::Tags => terms(
            SitemapRepo::tags(&state.pool, URLS_PER_PAGE, offset).await?,
            "tag",
        ),
        Section::Static if page == 1 => STATIC_PATHS
            .iter()
            .map(|path| entry((*path).to_string(), None))
            .collect(),
        Section::Static => Vec::new(),
    };

    if entries.is_empty() && page > 1 {
        return Err(AppError::NotFound(format!(
            "Sitemap '{}' has no page {page}",
            section.name()
        )));
    }

    Ok(([(CONTENT_TYPE, XML)], render_urlset(&entries)))
}

/// GET /sitemap.xsl
pub async fn stylesheet() -> impl IntoResponse {
    ([(CONTENT_TYPE, "text/xsl; charset=utf-8")], SITEMAP_XSL)
}

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.site_url),
    )
}
