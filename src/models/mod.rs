//! Data models for Maktabty

pub mod book;
pub mod booking;
pub mod user;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use booking::{Booking, BookingDetails, BookingStatus};
pub use user::{Identity, User, UserClaims};
