//! Booking error types.

use common::BookingId;
use domain::DomainError;
use storage::StoreError;
use thiserror::Error;

/// Faults raised by the booking service.
///
/// Business failures such as an unknown user or a rejected card are not
/// errors; they come back as a failed [`BookingResult`](crate::BookingResult).
#[derive(Debug, Error)]
pub enum BookingError {
    /// A repository operation failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// A domain invariant was violated.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// The booking to operate on does not exist.
    #[error("Booking with ID {0} not found")]
    BookingNotFound(BookingId),
}

/// Convenience type alias for booking results.
pub type Result<T> = std::result::Result<T, BookingError>;
