//! Reservation and return service

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingStatus, ReturnOutcome},
        user::Identity,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ReservationsService {
    repository: Repository,
}

impl ReservationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Reserve one copy of a book for the caller
    pub async fn reserve(&self, identity: Option<&Identity>, book_id: i64) -> AppResult<Booking> {
        let identity = identity
            .ok_or_else(|| AppError::Unauthenticated("Login required to reserve".to_string()))?;

        match self.repository.bookings.reserve(identity.user_id, book_id).await {
            Ok(booking) => {
                tracing::info!(
                    "Booking id={} created: user id={} reserved book id={}",
                    booking.id,
                    booking.user_id,
                    booking.book_id
                );
                Ok(booking)
            }
            Err(e) => {
                tracing::warn!(
                    "Reservation of book id={} by user id={} rejected: {}",
                    book_id,
                    identity.user_id,
                    e
                );
                Err(e)
            }
        }
    }

    /// Return a booking. Owners return their own bookings, admins any.
    /// Returning twice credits the book once.
    pub async fn return_booking(&self, identity: Option<&Identity>, booking_id: i64) -> AppResult<ReturnOutcome> {
        let identity = identity
            .ok_or_else(|| AppError::Unauthenticated("Login required to return".to_string()))?;

        let booking = self.repository.bookings.get_by_id(booking_id).await?;

        if !identity.can_act_for(booking.user_id) {
            tracing::warn!(
                "User id={} tried to return booking id={} owned by user id={}",
                identity.user_id,
                booking.id,
                booking.user_id
            );
            return Err(AppError::Forbidden(format!(
                "Booking {} belongs to another user",
                booking.id
            )));
        }

        if booking.status == BookingStatus::Returned {
            return Ok(ReturnOutcome {
                booking,
                credited: false,
            });
        }

        let credited = self.repository.bookings.mark_returned(booking.id).await?;
        let booking = self.repository.bookings.get_by_id(booking.id).await?;

        if credited {
            tracing::info!(
                "Booking id={} returned, book id={} credited",
                booking.id,
                booking.book_id
            );
        }

        Ok(ReturnOutcome { booking, credited })
    }

    /// The caller's bookings, newest first
    pub async fn my_bookings(&self, identity: &Identity) -> AppResult<Vec<BookingDetails>> {
        self.repository.bookings.list_for_user(identity.user_id).await
    }
}
