//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds the full service stack on an
//! in-memory SQLite database with migrations applied. [`TestHarness::with_server`]
//! also starts the router on a random port for HTTP-level testing, and
//! [`TestHarness::with_file_db`] uses a temporary database file behind a
//! multi-connection pool.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use maktabty_server::{
    api,
    config::{AppConfig, DatabaseConfig},
    models::{Book, Identity},
    repository::{self, Repository},
    services::Services,
    AppState,
};

/// Stored for accounts that never log in, so tests skip Argon2 work
const UNUSABLE_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$unused";

pub struct TestHarness {
    pub state: AppState,
    pub services: Arc<Services>,
    db_path: Option<PathBuf>,
}

impl TestHarness {
    /// Create a new harness with default configuration and in-memory DB.
    pub async fn new() -> Self {
        Self::build(
            DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                ..DatabaseConfig::default()
            },
            None,
        )
        .await
    }

    /// Create a harness on a fresh database file with a pool of
    /// `max_connections`, so concurrent callers really overlap.
    pub async fn with_file_db(max_connections: u32) -> Self {
        let path = std::env::temp_dir().join(format!("maktabty-test-{}.db", uuid::Uuid::new_v4()));
        Self::build(
            DatabaseConfig {
                url: format!("sqlite://{}", path.display()),
                max_connections,
                min_connections: 1,
            },
            Some(path),
        )
        .await
    }

    async fn build(database: DatabaseConfig, db_path: Option<PathBuf>) -> Self {
        let mut config = AppConfig::default();
        config.database = database;
        config.auth.jwt_secret = "test-secret".to_string();

        let pool = repository::connect(&config.database)
            .await
            .expect("failed to open in-memory database");
        let repository = Repository::new(pool);
        repository.migrate().await.expect("failed to run migrations");

        let services = Arc::new(Services::new(repository, config.auth.clone()));
        let state = AppState {
            config: Arc::new(config),
            services: services.clone(),
        };

        Self {
            state,
            services,
            db_path,
        }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the API base URL.
    pub async fn with_server() -> (Self, String) {
        let harness = Self::new().await;
        let app = api::create_router(harness.state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr: SocketAddr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, format!("http://{addr}/api/v1"))
    }

    /// Insert an account directly. It cannot log in.
    pub async fn create_user(&self, username: &str, is_admin: bool) -> Identity {
        self.services
            .repository
            .users
            .create(username, UNUSABLE_HASH, is_admin)
            .await
            .expect("failed to create user")
            .identity()
    }

    /// Insert an account with a real password hash.
    pub async fn create_account(&self, username: &str, password: &str, is_admin: bool) -> Identity {
        let hash = self
            .services
            .users
            .hash_password(password)
            .expect("failed to hash password");
        self.services
            .repository
            .users
            .create(username, &hash, is_admin)
            .await
            .expect("failed to create account")
            .identity()
    }

    /// Insert a book directly.
    pub async fn create_book(&self, title: &str, copies: i64) -> Book {
        self.services
            .repository
            .books
            .create(title, None, copies)
            .await
            .expect("failed to create book")
    }

    /// Current availability of a book.
    pub async fn copies(&self, book_id: i64) -> i64 {
        self.services
            .catalog
            .get_book(book_id)
            .await
            .expect("book should exist")
            .copies_available
    }

    /// Outstanding reservations on a book.
    pub async fn reserved(&self, book_id: i64) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE book_id = ? AND status = 'reserved'")
            .bind(book_id)
            .fetch_one(&self.services.repository.pool)
            .await
            .expect("failed to count bookings")
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        if let Some(path) = &self.db_path {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
            }
        }
    }
}
