//! Shared identifier types for the booking system.

mod types;

pub use types::{BookingId, EventId, UserId, VenueId};
