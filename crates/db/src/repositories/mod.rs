//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod comment_repo;
pub mod download_repo;
pub mod homepage_section_repo;
pub mod media_repo;
pub mod page_repo;
pub mod post_repo;
pub mod site_settings_repo;
pub mod sitemap_repo;
pub mod tag_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use download_repo::DownloadRepo;
pub use homepage_section_repo::HomepageSectionRepo;
pub use media_repo::MediaRepo;
pub use page_repo::PageRepo;
pub use post_repo::PostRepo;
pub use site_settings_repo::SiteSettingsRepo;
pub use sitemap_repo::SitemapRepo;
pub use tag_repo::TagRepo;
pub use user_repo::UserRepo;
