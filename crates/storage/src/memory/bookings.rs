use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use common::{BookingId, EventId, UserId, VenueId};
use domain::{Booking, PaymentStatus};
use tokio::sync::RwLock;

use crate::repository::BookingRepository;
use crate::{Result, StoreError};

#[derive(Debug, Default)]
struct LedgerState {
    bookings: BTreeMap<BookingId, Booking>,
    last_id: i64,
}

impl LedgerState {
    fn matching<'a>(
        &'a self,
        predicate: impl Fn(&Booking) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings.values().filter(move |b| predicate(*b))
    }

    fn seat_total(&self, predicate: impl Fn(&Booking) -> bool) -> i64 {
        self.bookings
            .values()
            .filter(|b| predicate(*b))
            .map(|b| i64::from(b.number_of_seats()))
            .sum()
    }
}

/// In-memory booking ledger.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingRepository {
    state: Arc<RwLock<LedgerState>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bookings stored.
    pub async fn booking_count(&self) -> usize {
        self.state.read().await.bookings.len()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn get_by_id(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.state.read().await.bookings.get(&id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Booking>> {
        Ok(self.state.read().await.bookings.values().cloned().collect())
    }

    async fn get_by_user_id(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let state = self.state.read().await;
        Ok(state.matching(|b| b.user_id == user_id).cloned().collect())
    }

    async fn get_by_venue_id(&self, venue_id: VenueId) -> Result<Vec<Booking>> {
        let state = self.state.read().await;
        Ok(state.matching(|b| b.venue_id == venue_id).cloned().collect())
    }

    async fn get_by_event_id(&self, event_id: EventId) -> Result<Vec<Booking>> {
        let state = self.state.read().await;
        Ok(state.matching(|b| b.event_id == event_id).cloned().collect())
    }

    async fn add(&self, mut booking: Booking) -> Result<BookingId> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        booking.id = BookingId::new(state.last_id);
        let id = booking.id;
        state.bookings.insert(id, booking);
        Ok(id)
    }

    async fn update(&self, booking: Booking) -> Result<()> {
        let mut state = self.state.write().await;
        match state.bookings.get_mut(&booking.id) {
            Some(stored) => {
                *stored = booking;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: "Booking",
                id: booking.id.as_i64(),
            }),
        }
    }

    async fn delete(&self, id: BookingId) -> Result<bool> {
        Ok(self.state.write().await.bookings.remove(&id).is_some())
    }

    async fn booking_count_for_event(&self, event_id: EventId) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.seat_total(|b| b.event_id == event_id))
    }

    async fn booking_count_for_event_section(
        &self,
        event_id: EventId,
        section: &str,
    ) -> Result<i64> {
        let state = self.state.read().await;
        Ok(state.seat_total(|b| {
            b.event_id == event_id && b.section_identifier.as_deref() == Some(section)
        }))
    }

    async fn find_bookings_for_paid_users_at_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<Booking>> {
        let state = self.state.read().await;

        let paid_users: BTreeSet<UserId> = state
            .matching(|b| b.venue_id == venue_id && b.payment_status() == PaymentStatus::Paid)
            .map(|b| b.user_id)
            .collect();

        Ok(state
            .matching(|b| b.venue_id == venue_id && paid_users.contains(&b.user_id))
            .cloned()
            .collect())
    }

    async fn find_users_without_bookings_in_venue(
        &self,
        venue_id: VenueId,
    ) -> Result<Vec<UserId>> {
        let state = self.state.read().await;

        let at_venue: BTreeSet<UserId> = state
            .matching(|b| b.venue_id == venue_id)
            .map(|b| b.user_id)
            .collect();

        let everyone: BTreeSet<UserId> = state.bookings.values().map(|b| b.user_id).collect();

        Ok(everyone.difference(&at_venue).copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use domain::Money;

    use super::*;

    fn booking(user: i64, event: i64, venue: i64, seats: i32, section: Option<&str>) -> Booking {
        Booking::new(
            UserId::new(user),
            EventId::new(event),
            VenueId::new(venue),
            seats,
            section.map(String::from),
            Money::from_units(50),
        )
        .unwrap()
    }

    fn paid(mut booking: Booking, payment_id: &str) -> Booking {
        booking.mark_paid(payment_id).unwrap();
        booking
    }

    #[tokio::test]
    async fn add_assigns_ids_and_counts() {
        let repo = InMemoryBookingRepository::new();
        let id = repo.add(booking(1, 1, 1, 3, None)).await.unwrap();

        assert_eq!(id, BookingId::new(1));
        assert_eq!(repo.booking_count().await, 1);
        assert_eq!(repo.get_by_id(id).await.unwrap().unwrap().number_of_seats(), 3);
        assert!(repo.get_by_id(BookingId::new(9999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn seat_totals_include_every_status() {
        let repo = InMemoryBookingRepository::new();
        repo.add(paid(booking(1, 1, 1, 2, None), "PAY-1")).await.unwrap();
        repo.add(booking(2, 1, 1, 4, None)).await.unwrap();
        let mut failed = booking(3, 1, 1, 5, None);
        failed.mark_failed().unwrap();
        repo.add(failed).await.unwrap();
        repo.add(booking(4, 2, 1, 7, None)).await.unwrap();

        assert_eq!(repo.booking_count_for_event(EventId::new(1)).await.unwrap(), 11);
        assert_eq!(repo.booking_count_for_event(EventId::new(2)).await.unwrap(), 7);
        assert_eq!(repo.booking_count_for_event(EventId::new(3)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_counts_are_stable() {
        let repo = InMemoryBookingRepository::new();
        repo.add(booking(1, 1, 1, 2, None)).await.unwrap();

        let first = repo.booking_count_for_event(EventId::new(1)).await.unwrap();
        let second = repo.booking_count_for_event(EventId::new(1)).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn section_totals_filter_by_section() {
        let repo = InMemoryBookingRepository::new();
        repo.add(booking(1, 3, 3, 2, Some("GoldenCircle"))).await.unwrap();
        repo.add(booking(4, 3, 3, 3, Some("Balcony"))).await.unwrap();
        repo.add(booking(5, 3, 3, 4, Some("GoldenCircle"))).await.unwrap();
        repo.add(booking(6, 3, 3, 8, None)).await.unwrap();

        let event = EventId::new(3);
        assert_eq!(repo.booking_count_for_event_section(event, "GoldenCircle").await.unwrap(), 6);
        assert_eq!(repo.booking_count_for_event_section(event, "Balcony").await.unwrap(), 3);
        assert_eq!(repo.booking_count_for_event_section(event, "Pit").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn paid_users_query_returns_all_their_bookings_at_venue() {
        let repo = InMemoryBookingRepository::new();
        let venue = VenueId::new(1);
        let paid_id = repo.add(paid(booking(1, 1, 1, 2, None), "PAY-1")).await.unwrap();
        let pending_same_user = repo.add(booking(1, 2, 1, 1, None)).await.unwrap();
        repo.add(booking(2, 1, 1, 4, None)).await.unwrap();
        repo.add(paid(booking(1, 5, 2, 1, None), "PAY-2")).await.unwrap();
        repo.add(paid(booking(3, 5, 2, 1, None), "PAY-3")).await.unwrap();

        let result = repo.find_bookings_for_paid_users_at_venue(venue).await.unwrap();
        let ids: Vec<_> = result.iter().map(|b| b.id).collect();

        assert_eq!(ids, vec![paid_id, pending_same_user]);
        assert!(result.iter().all(|b| b.venue_id == venue && b.user_id == UserId::new(1)));
    }

    #[tokio::test]
    async fn users_without_bookings_come_from_booking_universe() {
        let repo = InMemoryBookingRepository::new();
        repo.add(booking(1, 1, 1, 2, None)).await.unwrap();
        repo.add(booking(2, 2, 2, 2, None)).await.unwrap();
        repo.add(booking(3, 3, 3, 2, None)).await.unwrap();
        repo.add(booking(3, 1, 1, 2, None)).await.unwrap();

        let absent = repo.find_users_without_bookings_in_venue(VenueId::new(1)).await.unwrap();
        assert_eq!(absent, vec![UserId::new(2)]);

        let absent = repo.find_users_without_bookings_in_venue(VenueId::new(42)).await.unwrap();
        assert_eq!(absent, vec![UserId::new(1), UserId::new(2), UserId::new(3)]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let repo = InMemoryBookingRepository::new();
        let id = repo.add(paid(booking(1, 1, 1, 2, None), "PAY-1")).await.unwrap();

        let mut stored = repo.get_by_id(id).await.unwrap().unwrap();
        stored.mark_refunded().unwrap();
        repo.update(stored).await.unwrap();
        assert_eq!(
            repo.get_by_id(id).await.unwrap().unwrap().payment_status(),
            PaymentStatus::Refunded
        );

        assert!(repo.delete(id).await.unwrap());
        assert!(!repo.delete(id).await.unwrap());
        assert_eq!(repo.booking_count().await, 0);
    }
}
