//! Admin inventory endpoints

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
    models::book::{AddCopies, Book, CreateBook},
    AppState,
};

use super::AuthenticatedUser;

/// Book response with status message
#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub book: Book,
    pub message: String,
}

/// Admin view of the catalog
#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All books", body = Vec<Book>),
        (status = 403, description = "Admin privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<Book>>> {
    user.identity().require_admin()?;

    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Add a book to the catalog
#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book added", body = BookResponse),
        (status = 400, description = "Title missing or copies negative", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin privileges required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    lang: Lang,
    WithRejection(Json(request), _): WithRejection<Json<CreateBook>, AppError>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.add_book(&user.identity(), request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            book,
            message: Message::BookAdded.text(lang).to_string(),
        }),
    ))
}

/// Add copies of an existing book
#[utoipa::path(
    post,
    path = "/admin/books/{id}/copies",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Book ID")
    ),
    request_body = AddCopies,
    responses(
        (status = 200, description = "Copies added", body = BookResponse),
        (status = 400, description = "Count not positive", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin privileges required", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn add_copies(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    lang: Lang,
    WithRejection(Path(book_id), _): WithRejection<Path<i64>, AppError>,
    WithRejection(Json(request), _): WithRejection<Json<AddCopies>, AppError>,
) -> AppResult<Json<BookResponse>> {
    let book = state
        .services
        .catalog
        .add_copies(&user.identity(), book_id, request)
        .await?;

    Ok(Json(BookResponse {
        book,
        message: Message::CopiesAdded.text(lang).to_string(),
    }))
}
