//! Hypeblog API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes,
//! media storage and the import/shortener services) so integration tests,
//! the server binary and the management CLI can all use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod importer;
pub mod media_service;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod shortener;
pub mod state;
pub mod storage;
