pub mod auth;
pub mod categories;
pub mod comments;
pub mod health;
pub mod homepage_sections;
pub mod media;
pub mod pages;
pub mod posts;
pub mod settings;
pub mod site;
pub mod sitemap;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                   login (public)
/// /auth/me                                      current user
///
/// /posts                                        list, create, bulk list-edit (staff)
/// /posts/quality-choices                        download quality codes
/// /posts/import                                 WordPress import (multipart)
/// /posts/{id}                                   get, update, delete
/// /posts/{id}/tags                              replace tags
/// /posts/{id}/featured-image                    upload, clear
/// /posts/{id}/qualities[/{quality_id}]          download qualities
/// /posts/{id}/subtitles[/{subtitle_id}]         subtitles
///
/// /categories[/{id}]                            CRUD (staff)
/// /tags[/{id}]                                  CRUD (staff)
/// /pages[/{id}]                                 CRUD (staff)
/// /homepage-sections[/{id}]                     CRUD (staff)
/// /comments[/{id}]                              moderation (staff)
/// /comments/approve                             bulk approve
/// /media[/{id}]                                 media library (staff, multipart)
///
/// /settings                                     site settings (admin)
/// /users                                        list, create (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/posts", posts::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/pages", pages::router())
        .nest("/homepage-sections", homepage_sections::router())
        .nest("/comments", comments::router())
        .nest("/media", media::router())
        .nest("/settings", settings::router())
        .nest("/users", users::router())
}
