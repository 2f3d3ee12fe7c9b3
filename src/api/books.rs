//! Catalog and reservation endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    i18n::{Lang, Message},
    models::{book::Book, booking::Booking},
    AppState,
};

use super::MaybeAuthenticatedUser;

/// Reservation response
#[derive(Serialize, ToSchema)]
pub struct ReservationResponse {
    pub booking: Booking,
    /// Copies left after this reservation
    pub copies_available: i64,
    pub message: String,
}

/// List all books
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Reserve one copy of a book
#[utoipa::path(
    post,
    path = "/books/{id}/reserve",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Book reserved", body = ReservationResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse),
        (status = 409, description = "No copies available", body = crate::error::ErrorResponse)
    )
)]
pub async fn reserve_book(
    State(state): State<AppState>,
    user: MaybeAuthenticatedUser,
    lang: Lang,
    WithRejection(Path(book_id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<(StatusCode, Json<ReservationResponse>)> {
    let identity = user.identity();

    let booking = state
        .services
        .reservations
        .reserve(identity.as_ref(), book_id)
        .await?;
    let book = state.services.catalog.get_book(booking.book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReservationResponse {
            booking,
            copies_available: book.copies_available,
            message: Message::BookReserved.text(lang).to_string(),
        }),
    ))
}

/// Latest additions to the catalog
#[utoipa::path(
    get,
    path = "/recommendations",
    tag = "books",
    responses(
        (status = 200, description = "Recommended books", body = Vec<Book>)
    )
)]
pub async fn recommendations(State(state): State<AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.recommendations().await?;
    Ok(Json(books))
}
