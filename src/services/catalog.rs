//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{AddCopies, Book, CreateBook},
        user::Identity,
    },
    repository::Repository,
};

/// Size of the recommendations list
pub const RECOMMENDATIONS_LIMIT: i64 = 5;

const SAMPLE_BOOKS: [(&str, &str, i64); 3] = [
    ("Python Programming", "John Zelle", 5),
    ("Flask Web Development", "Miguel Grinberg", 3),
    ("Data Science Handbook", "Jake VanderPlas", 4),
];

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books in the catalog
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Get a book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    /// Latest additions, standing in for recommendations
    pub async fn recommendations(&self) -> AppResult<Vec<Book>> {
        self.repository.books.latest(RECOMMENDATIONS_LIMIT).await
    }

    /// Add a book to the catalog (admin only)
    pub async fn add_book(&self, identity: &Identity, request: CreateBook) -> AppResult<Book> {
        identity.require_admin()?;

        let (title, author, copies) = request.normalized();
        if title.is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }
        request.validate()?;

        let book = self
            .repository
            .books
            .create(&title, author.as_deref(), copies)
            .await?;

        tracing::info!(
            "Book added id={} title={:?} copies={} by user id={}",
            book.id,
            book.title,
            book.copies_available,
            identity.user_id
        );
        Ok(book)
    }

    /// Put more copies of an existing book on the shelf (admin only)
    pub async fn add_copies(&self, identity: &Identity, book_id: i64, request: AddCopies) -> AppResult<Book> {
        identity.require_admin()?;
        request.validate()?;

        let book = self.repository.books.add_copies(book_id, request.count).await?;

        tracing::info!(
            "Added {} copies to book id={}, now {} available",
            request.count,
            book.id,
            book.copies_available
        );
        Ok(book)
    }

    /// Insert the sample books into an empty catalog
    pub async fn seed_samples(&self) -> AppResult<usize> {
        if self.repository.books.count().await? > 0 {
            return Ok(0);
        }

        for (title, author, copies) in SAMPLE_BOOKS {
            self.repository.books.create(title, Some(author), copies).await?;
        }

        tracing::info!("Seeded {} sample books", SAMPLE_BOOKS.len());
        Ok(SAMPLE_BOOKS.len())
    }
}
