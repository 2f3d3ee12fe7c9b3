//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, MAX_COPIES},
};

const BOOK_COLUMNS: &str = "id, title, author, copies_available, created_at";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books WHERE id = ?", BOOK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// All books
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!("SELECT {} FROM books ORDER BY id", BOOK_COLUMNS))
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Most recently added books first
    pub async fn latest(&self, limit: i64) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books ORDER BY id DESC LIMIT ?",
            BOOK_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Create a new book
    pub async fn create(&self, title: &str, author: Option<&str>, copies: i64) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, copies_available, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(title)
        .bind(author)
        .bind(copies)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(book)
    }

    /// Put extra copies on the shelf.
    ///
    /// Refuses with `Validation`, leaving the row untouched, when the total
    /// would go past `MAX_COPIES`.
    pub async fn add_copies(&self, id: i64, count: i64) -> AppResult<Book> {
        let updated = sqlx::query_as::<_, Book>(&format!(
            r#"
            UPDATE books SET copies_available = copies_available + ?
            WHERE id = ? AND copies_available <= ? - ?
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(count)
        .bind(id)
        .bind(MAX_COPIES)
        .bind(count)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(book) => Ok(book),
            None => {
                let book = self.get_by_id(id).await?;
                Err(AppError::Validation(format!(
                    "Book {} has {} copies, adding {} would exceed {}",
                    book.id, book.copies_available, count, MAX_COPIES
                )))
            }
        }
    }

    /// Count books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
