//! Lectern Library Catalog Server
//!
//! A small Rust REST API server for managing a library catalog of authors
//! and their books, backed by SQLite.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: repository::Repository,
}
