//! Book (catalog) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Most copies a single book may have on the shelf
pub const MAX_COPIES: i64 = 1_000_000;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    /// Copies not currently reserved
    pub copies_available: i64,
    pub created_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 200))]
    pub author: Option<String>,
    /// Initial copies (default: 1)
    #[validate(range(min = 0, max = 1_000_000, message = "Copies must be between 0 and 1000000"))]
    pub copies: Option<i64>,
}

impl CreateBook {
    pub const DEFAULT_COPIES: i64 = 1;

    /// Trimmed title, author with blanks dropped, copies with the default applied
    pub fn normalized(&self) -> (String, Option<String>, i64) {
        let title = self.title.trim().to_string();
        let author = self
            .author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);
        let copies = self.copies.unwrap_or(Self::DEFAULT_COPIES);
        (title, author, copies)
    }
}

/// Add copies request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddCopies {
    #[validate(range(min = 1, max = 1_000_000, message = "Count must be between 1 and 1000000"))]
    pub count: i64,
}
