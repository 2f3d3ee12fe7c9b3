//! Reservation ledger endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    i18n::{Lang, Message},
    models::booking::{Booking, BookingDetails},
    AppState,
};

use super::{AuthenticatedUser, MaybeAuthenticatedUser};

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    pub booking: Booking,
    /// False when the booking had already been returned
    pub credited: bool,
    /// Copies available after the return
    pub copies_available: i64,
    pub message: String,
}

/// The caller's bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings, newest first", body = Vec<BookingDetails>),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<Json<Vec<BookingDetails>>> {
    let bookings = state.services.reservations.my_bookings(&user.identity()).await?;
    Ok(Json(bookings))
}

/// Return a booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/return",
    tag = "bookings",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking returned (or already returned)", body = ReturnResponse),
        (status = 401, description = "Not logged in", body = crate::error::ErrorResponse),
        (status = 403, description = "Booking belongs to another user", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn return_booking(
    State(state): State<AppState>,
    user: MaybeAuthenticatedUser,
    lang: Lang,
    WithRejection(Path(booking_id), _): WithRejection<Path<i64>, AppError>,
) -> AppResult<Json<ReturnResponse>> {
    let identity = user.identity();

    let outcome = state
        .services
        .reservations
        .return_booking(identity.as_ref(), booking_id)
        .await?;
    let book = state.services.catalog.get_book(outcome.booking.book_id).await?;

    let message = if outcome.credited {
        Message::BookingReturned
    } else {
        Message::BookingAlreadyReturned
    };

    Ok(Json(ReturnResponse {
        booking: outcome.booking,
        credited: outcome.credited,
        copies_available: book.copies_available,
        message: message.text(lang).to_string(),
    }))
}
