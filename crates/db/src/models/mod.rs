//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//! - Filter structs for the back-office list views where they exist

pub mod category;
pub mod comment;
pub mod download;
pub mod homepage_section;
pub mod media;
pub mod page;
pub mod post;
pub mod site_settings;
pub mod sitemap;
pub mod tag;
pub mod user;
