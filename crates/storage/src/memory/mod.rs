//! In-memory repositories.
//!
//! Entities are kept in id order so listings are deterministic. Clones
//! share the same underlying state.

mod bookings;
mod events;
mod users;
mod venues;

pub use bookings::InMemoryBookingRepository;
pub use events::InMemoryEventRepository;
pub use users::InMemoryUserRepository;
pub use venues::InMemoryVenueRepository;
