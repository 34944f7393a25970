//! Public site: home, search, category/tag archives, pages and post detail.
//!
//! Documents are JSON, served at the public URL scheme (trailing slashes
//! included). Only published content is ever visible here.

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::header::LOCATION;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hypeblog_core::content::{page_title, quality_label};
use hypeblog_core::search::DEFAULT_PAGE_SIZE;
use hypeblog_db::models::category::Category;
use hypeblog_db::models::comment::{CreateComment, PublicComment};
use hypeblog_db::models::download::{DownloadQuality, Subtitle};
use hypeblog_db::models::homepage_section::HomepageSection;
use hypeblog_db::models::page::Page;
use hypeblog_db::models::post::{post_url, Post, PostCard, PublishedFilter};
use hypeblog_db::models::site_settings::SiteSettings;
use hypeblog_db::models::tag::Tag;
use hypeblog_db::repositories::{
    CategoryRepo, CommentRepo, DownloadRepo, HomepageSectionRepo, PageRepo, PostRepo,
    SiteSettingsRepo, TagRepo,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::search_pattern;
use crate::query::PageParams;
use crate::response::{DataResponse, Paginated};
use crate::state::AppState;
use crate::storage::MediaStorage;

/// Posts shown under each homepage section.
pub const HOMEPAGE_SECTION_POSTS: i64 = 10;

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A post in a listing, with its public URLs resolved.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub card: PostCard,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl PostSummary {
    pub fn new(card: PostCard, storage: &MediaStorage) -> Self {
        let url = card.url();
        let thumbnail_url = card.thumbnail.as_deref().map(|t| storage.url(t));
        Self {
            card,
            url,
            thumbnail_url,
        }
    }
}

fn summaries(cards: Vec<PostCard>, storage: &MediaStorage) -> Vec<PostSummary> {
    cards
        .into_iter()
        .map(|card| PostSummary::new(card, storage))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    #[serde(flatten)]
    pub section: HomepageSection,
    pub posts: Vec<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub site: SiteSettings,
    pub sections: Vec<SectionView>,
    pub posts: Paginated<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub posts: Paginated<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub category: Category,
    pub url: String,
    pub posts: Paginated<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub tag: Tag,
    pub url: String,
    pub posts: Paginated<PostSummary>,
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub page: Page,
    pub url: String,
}

/// A download button on the post page.
#[derive(Debug, Serialize)]
pub struct QualityLink {
    #[serde(flatten)]
    pub quality: DownloadQuality,
    pub label: Option<String>,
    pub download_path: String,
}

#[derive(Debug, Serialize)]
pub struct SubtitleLink {
    #[serde(flatten)]
    pub subtitle: Subtitle,
    pub download_path: String,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub page_title: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub category: Category,
    pub tags: Vec<Tag>,
    pub qualities: Vec<QualityLink>,
    pub subtitles: Vec<SubtitleLink>,
    pub comments: Vec<PublicComment>,
    pub related: Vec<PostSummary>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<i64>,
}

// ---------------------------------------------------------------------------
// Listings
// ---------------------------------------------------------------------------

async fn published_page(
    state: &AppState,
    filter: &PublishedFilter,
    params: &PageParams,
) -> AppResult<Paginated<PostSummary>> {
    let page_size = DEFAULT_PAGE_SIZE;
    let cards =
        PostRepo::list_published(&state.pool, filter, page_size, params.offset(page_size)).await?;
    let total = PostRepo::count_published(&state.pool, filter).await?;

    Ok(Paginated::new(
        summaries(cards, &state.storage),
        params.number(),
        page_size,
        total,
    ))
}

/// GET /
///
/// Site settings, the enabled homepage sections in display order with
/// their latest posts, and the paginated list of latest posts.
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<HomeResponse>> {
    let site = SiteSettingsRepo::load(&state.pool).await?;

    let mut sections = Vec::new();
    for section in HomepageSectionRepo::list_enabled(&state.pool).await? {
        let category_ids = HomepageSectionRepo::category_ids(&state.pool, section.id).await?;
        let cards = PostRepo::list_published_in_categories(
            &state.pool,
            &category_ids,
            HOMEPAGE_SECTION_POSTS,
        )
        .await?;
        sections.push(SectionView {
            section,
            posts: summaries(cards, &state.storage),
        });
    }

    let posts = published_page(&state, &PublishedFilter::default(), &params).await?;

    Ok(Json(HomeResponse {
        site,
        sections,
        posts,
    }))
}

/// GET /search/?q=
///
/// A blank query returns no results.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let paging = PageParams { page: params.page };
    let query = params.q.unwrap_or_default();

    let posts = match search_pattern(Some(&query)) {
        Some(pattern) => {
            let filter = PublishedFilter {
                search: Some(pattern),
                ..Default::default()
            };
            published_page(&state, &filter, &paging).await?
        }
        None => Paginated::new(Vec::new(), 1, DEFAULT_PAGE_SIZE, 0),
    };

    Ok(Json(SearchResponse {
        query: query.trim().to_string(),
        posts,
    }))
}

/// GET /category/{slug}/
pub async fn category_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<CategoryResponse>> {
    let category = CategoryRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No category '{slug}'")))?;

    let filter = PublishedFilter {
        category_id: Some(category.id),
        ..Default::default()
    };
    let posts = published_page(&state, &filter, &params).await?;

    Ok(Json(CategoryResponse {
        url: category.url(),
        category,
        posts,
    }))
}

/// GET /tag/{slug}/
pub async fn tag_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<TagResponse>> {
    let tag = TagRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No tag '{slug}'")))?;

    let filter = PublishedFilter {
        tag_id: Some(tag.id),
        ..Default::default()
    };
    let posts = published_page(&state, &filter, &params).await?;

    Ok(Json(TagResponse {
        url: tag.url(),
        tag,
        posts,
    }))
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

/// GET /{slug}/
pub async fn page_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PageResponse>> {
    let page = PageRepo::find_published_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No page '{slug}'")))?;

    Ok(Json(PageResponse {
        url: page.url(),
        page,
    }))
}

/// GET /posts/{slug}/
///
/// Permanent redirect to the canonical `/{category}/{slug}/` URL. The query
/// string is carried over.
pub async fn post_redirect(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> AppResult<impl IntoResponse> {
    let url = PostRepo::find_published_card(&state.pool, &slug)
        .await?
        .and_then(|card| card.url())
        .ok_or_else(|| AppError::NotFound(format!("No post '{slug}'")))?;

    let location = match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{url}?{q}"),
        None => url,
    };

    Ok((StatusCode::MOVED_PERMANENTLY, [(LOCATION, location)]))
}

async fn find_post(state: &AppState, category_slug: &str, slug: &str) -> AppResult<Post> {
    PostRepo::find_published(&state.pool, category_slug, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post '{category_slug}/{slug}'")))
}

/// GET /{category}/{slug}/
///
/// Counts a view, then returns the post with everything its page shows.
pub async fn post_detail(
    State(state): State<AppState>,
    Path((category_slug, slug)): Path<(String, String)>,
) -> AppResult<Json<PostDetail>> {
    let mut post = find_post(&state, &category_slug, &slug).await?;
    post.views = PostRepo::increment_views(&state.pool, post.id).await?;

    let category = CategoryRepo::find_by_slug(&state.pool, &category_slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No category '{category_slug}'")))?;
    let tags = TagRepo::list_for_post(&state.pool, post.id).await?;
    let comments = CommentRepo::list_approved_for_post(&state.pool, post.id).await?;
    let related = PostRepo::list_related(&state.pool, &post).await?;

    let (qualities, subtitles) = if post.enable_downloads {
        let qualities = DownloadRepo::list_qualities(&state.pool, post.id)
            .await?
            .into_iter()
            .map(|quality| QualityLink {
                label: quality_label(&quality.quality),
                download_path: format!("/download/quality/{}/", quality.id),
                quality,
            })
            .collect();
        let subtitles = DownloadRepo::list_subtitles(&state.pool, post.id)
            .await?
            .into_iter()
            .map(|subtitle| SubtitleLink {
                download_path: format!("/download/subtitle/{}/", subtitle.id),
                subtitle,
            })
            .collect();
        (qualities, subtitles)
    } else {
        (Vec::new(), Vec::new())
    };

    Ok(Json(PostDetail {
        page_title: page_title(post.seo_title.as_deref(), &post.title).to_string(),
        url: post_url(&category.slug, &post.slug),
        thumbnail_url: post.thumbnail.as_deref().map(|t| state.storage.url(t)),
        category,
        tags,
        qualities,
        subtitles,
        comments,
        related: summaries(related, &state.storage),
        post,
    }))
}

/// POST /{category}/{slug}/
///
/// Submit a comment. Comments wait for moderation before they are shown.
pub async fn create_comment(
    State(state): State<AppState>,
    Path((category_slug, slug)): Path<(String, String)>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let post = find_post(&state, &category_slug, &slug).await?;

    let comment = CommentRepo::create(&state.pool, post.id, &input).await?;
    tracing::info!(comment_id = comment.id, post_id = post.id, "Comment submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
