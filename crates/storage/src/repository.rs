//! Repository contracts consumed by the booking service.
//!
//! All implementations must be thread-safe (Send + Sync). `add` assigns a
//! fresh identifier and ignores whatever id the entity carries.

use std::sync::Arc;

use async_trait::async_trait;
use common::{BookingId, EventId, UserId, VenueId};
use domain::{Booking, Event, User, Venue};

use crate::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>>;

    async fn get_all(&self) -> Result<Vec<User>>;

    /// Looks a user up by email, ignoring ASCII case.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn add(&self, user: User) -> Result<UserId>;

    /// Replaces the stored user with the same id.
    ///
    /// Fails with `StoreError::NotFound` if no such user exists.
    async fn update(&self, user: User) -> Result<()>;

    /// Removes a user. Returns false if there was nothing to remove.
    async fn delete(&self, id: UserId) -> Result<bool>;
}

#[async_trait]
pub trait VenueRepository: Send + Sync {
    async fn get_by_id(&self, id: VenueId) -> Result<Option<Venue>>;

    async fn get_all(&self) -> Result<Vec<Venue>>;

    async fn add(&self, venue: Venue) -> Result<VenueId>;

    async fn update(&self, venue: Venue) -> Result<()>;

    async fn delete(&self, id: VenueId) -> Result<bool>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get_by_id(&self, id: EventId) -> Result<Option<Event>>;

    async fn get_all(&self) -> Result<Vec<Event>>;

    /// Events dated strictly after now, earliest first.
    async fn get_future_events(&self) -> Result<Vec<Event>>;

    async fn add(&self, event: Event) -> Result<EventId>;

    async fn update(&self, event: Event) -> Result<()>;

    async fn delete(&self, id: EventId) -> Result<bool>;
}

/// The booking ledger.
///
/// Seat totals count bookings of every payment status: pending, failed
/// and refunded bookings all still consume capacity.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>>;

    async fn get_all(&self) -> Result<Vec<Booking>>;

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Booking>>;

    async fn get_by_venue_id(&self, venue_id: VenueId) -> Result<Vec<Booking>>;

    async fn get_by_event_id(&self, event_id: EventId) -> Result<Vec<Booking>>;

    async fn add(&self, booking: Booking) -> Result<BookingId>;

    async fn update(&self, booking: Booking) -> Result<()>;

    async fn delete(&self, id: BookingId) -> Result<bool>;

    /// Sum of seats over all bookings of the event.
    async fn booking_count_for_event(&self, event_id: EventId) -> Result<i64>;

    /// Sum of seats over the bookings of the event targeting `section`.
    async fn booking_count_for_event_section(&self, event_id: EventId, section: &str)
    -> Result<i64>;

    /// Semi-join: every booking at the venue made by a user who holds at
    /// least one `Paid` booking at that venue, whatever the returned row's
    /// own status.
    async fn find_bookings_for_paid_users_at_venue(&self, venue_id: VenueId)
    -> Result<Vec<Booking>>;

    /// Anti-join: users that appear in any booking anywhere, minus those
    /// with a booking at the venue. Users who never booked are not reported.
    async fn find_users_without_bookings_in_venue(&self, venue_id: VenueId) -> Result<Vec<UserId>>;
}

/// The set of repositories the booking service depends on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub venues: Arc<dyn VenueRepository>,
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Repositories {
    /// Empty in-memory repositories.
    pub fn in_memory() -> Self {
        use crate::memory::{
            InMemoryBookingRepository, InMemoryEventRepository, InMemoryUserRepository,
            InMemoryVenueRepository,
        };

        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            venues: Arc::new(InMemoryVenueRepository::new()),
            events: Arc::new(InMemoryEventRepository::new()),
            bookings: Arc::new(InMemoryBookingRepository::new()),
        }
    }

    /// All four repositories backed by one PostgreSQL pool.
    pub fn postgres(store: crate::PostgresStore) -> Self {
        let store = Arc::new(store);
        Self {
            users: store.clone(),
            venues: store.clone(),
            events: store.clone(),
            bookings: store,
        }
    }
}
