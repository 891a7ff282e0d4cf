//! Persistence for the event booking system.
//!
//! Repository contracts for users, venues, events and the booking ledger,
//! with an in-memory implementation and a PostgreSQL one.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod repository;
pub mod seed;

pub use error::{Result, StoreError};
pub use memory::{
    InMemoryBookingRepository, InMemoryEventRepository, InMemoryUserRepository,
    InMemoryVenueRepository,
};
pub use postgres::PostgresStore;
pub use repository::{
    BookingRepository, EventRepository, Repositories, UserRepository, VenueRepository,
};
pub use seed::seed_demo_data;
