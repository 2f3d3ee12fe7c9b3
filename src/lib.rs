//! Maktabty Library Reservation Server
//!
//! A small REST JSON API for a library catalog: readers register, log in,
//! reserve and return copies of books, and admins manage the inventory.
//! User-facing messages are served in English or Arabic.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
