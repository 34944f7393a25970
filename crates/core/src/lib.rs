//! Domain logic for the Hypeblog content platform.
//!
//! This crate has no database or HTTP dependencies so both the API server
//! and the management CLI can use it.

pub mod content;
pub mod error;
pub mod media;
pub mod roles;
pub mod search;
pub mod sitemap;
pub mod slug;
pub mod thumbnail;
pub mod types;
pub mod wordpress;
