//! Bookings (reservation ledger) repository for database operations
//!
//! Reserve and return touch both the ledger and the book's availability, so
//! each runs in one transaction with conditional updates. A decrement only
//! happens while a copy is left and a credit only happens on the row that
//! actually flipped from reserved to returned.

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, BookingDetails},
};

const BOOKING_COLUMNS: &str = "id, user_id, book_id, status, created_at, returned_at";

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Sqlite>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Bookings of a user, newest first
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<BookingDetails>> {
        let bookings = sqlx::query_as::<_, BookingDetails>(
            r#"
            SELECT bk.id, bk.book_id, b.title AS book_title, bk.status,
                   bk.created_at, bk.returned_at
            FROM bookings bk
            JOIN books b ON b.id = bk.book_id
            WHERE bk.user_id = ?
            ORDER BY bk.created_at DESC, bk.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Take one copy of a book and record the reservation.
    ///
    /// Fails with `NotFound` for an unknown book and `Unavailable` when no
    /// copy is left; neither leaves any change behind.
    pub async fn reserve(&self, user_id: i64, book_id: i64) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let taken = sqlx::query(
            "UPDATE books SET copies_available = copies_available - 1 WHERE id = ? AND copies_available > 0",
        )
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if taken.rows_affected() == 0 {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = ?)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(if exists {
                AppError::Unavailable(format!("No copies of book {} available", book_id))
            } else {
                AppError::NotFound(format!("Book with id {} not found", book_id))
            });
        }

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (user_id, book_id, status, created_at)
            VALUES (?, ?, 'reserved', ?)
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        ))
        .bind(user_id)
        .bind(book_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(booking)
    }

    /// Flip a reserved booking to returned and credit its book.
    ///
    /// Returns false, with nothing changed, when the booking was no longer
    /// reserved by the time the update ran.
    pub async fn mark_returned(&self, booking_id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        let book_id: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE bookings SET status = 'returned', returned_at = ?
            WHERE id = ? AND status = 'reserved'
            RETURNING book_id
            "#,
        )
        .bind(Utc::now())
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(book_id) = book_id else {
            tx.rollback().await?;
            return Ok(false);
        };

        sqlx::query("UPDATE books SET copies_available = copies_available + 1 WHERE id = ?")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(true)
    }
}
