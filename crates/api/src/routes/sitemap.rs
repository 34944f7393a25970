use axum::routing::get;
use axum::Router;

use crate::handlers::sitemap;
use crate::state::AppState;

/// ```text
/// GET /sitemap.xml              -> index
/// GET /sitemap-{section}.xml    -> section (?p= page)
/// GET /sitemaps/{section}.xml   -> section, older location
/// GET /sitemap.xsl              -> stylesheet
/// GET /robots.txt               -> robots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap::index))
        .route("/sitemaps/{file}", get(sitemap::section))
        // Shares the first-segment parameter name with the site's `/{slug}/`.
        .route("/{slug}", get(sitemap::root_section))
        .route("/sitemap.xsl", get(sitemap::stylesheet))
        .route("/robots.txt", get(sitemap::robots))
}
