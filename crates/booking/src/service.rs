//! The booking pipeline.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use common::{BookingId, EventId};
use domain::{Booking, DomainError, Event, SeatingPolicy, Venue};
use storage::{Repositories, StoreError};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::{BookingError, Result};
use crate::payment::{PaymentGateway, PaymentRequest, PaymentResponse};
use crate::request::{BookingRejection, BookingResult, CreateBookingRequest};

/// Why the pipeline stopped early.
enum Halt {
    Rejected(BookingRejection),
    Fault(BookingError),
}

impl From<BookingRejection> for Halt {
    fn from(rejection: BookingRejection) -> Self {
        Halt::Rejected(rejection)
    }
}

impl From<StoreError> for Halt {
    fn from(err: StoreError) -> Self {
        Halt::Fault(err.into())
    }
}

impl From<DomainError> for Halt {
    fn from(err: DomainError) -> Self {
        Halt::Fault(err.into())
    }
}

/// Validates, charges and records bookings.
///
/// Bookings for the same event are serialized from the capacity check to
/// the insert, so concurrent requests in one process cannot oversell.
/// Processes sharing a database are not coordinated.
#[derive(Clone)]
pub struct BookingService {
    repos: Repositories,
    payments: Arc<dyn PaymentGateway>,
    event_locks: Arc<Mutex<HashMap<EventId, Arc<Mutex<()>>>>>,
}

impl BookingService {
    pub fn new(repos: Repositories, payments: Arc<dyn PaymentGateway>) -> Self {
        Self {
            repos,
            payments,
            event_locks: Arc::default(),
        }
    }

    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// Runs the booking pipeline.
    ///
    /// Validation happens in a fixed order and stops at the first failure:
    /// seat count, user, event, event date, venue, capacity, payment. A
    /// booking is only written once everything passed, already `Paid`.
    /// Business failures come back as `Ok` with `success == false`; `Err`
    /// is reserved for storage faults.
    #[tracing::instrument(
        skip(self, request),
        fields(
            user_id = %request.user_id,
            event_id = %request.event_id,
            seats = request.number_of_seats,
        )
    )]
    pub async fn create_booking(&self, request: CreateBookingRequest) -> Result<BookingResult> {
        match self.run_pipeline(&request).await {
            Ok((booking_id, payment_id)) => {
                metrics::counter!("bookings_created_total").increment(1);
                tracing::info!(%booking_id, %payment_id, "booking created");
                Ok(BookingResult::succeeded(booking_id, payment_id))
            }
            Err(Halt::Rejected(rejection)) => {
                metrics::counter!("booking_rejections_total", "reason" => rejection.reason())
                    .increment(1);
                tracing::info!(reason = rejection.reason(), message = %rejection, "booking rejected");
                Ok(rejection.into())
            }
            Err(Halt::Fault(err)) => {
                tracing::error!(error = %err, "booking failed");
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &CreateBookingRequest,
    ) -> std::result::Result<(BookingId, String), Halt> {
        if request.number_of_seats <= 0 {
            return Err(BookingRejection::NonPositiveSeats.into());
        }

        self.repos
            .users
            .get_by_id(request.user_id)
            .await?
            .ok_or(BookingRejection::UserNotFound(request.user_id))?;

        let event = self
            .repos
            .events
            .get_by_id(request.event_id)
            .await?
            .ok_or(BookingRejection::EventNotFound(request.event_id))?;

        if !event.is_future() {
            return Err(BookingRejection::PastEvent.into());
        }

        let venue = self
            .repos
            .venues
            .get_by_id(event.venue_id)
            .await?
            .ok_or(BookingRejection::VenueNotFound(event.venue_id))?;

        let guard = self.lock_event(request.event_id).await;
        let outcome = self.reserve_and_record(request, &event, &venue).await;
        drop(guard);
        self.release_event(request.event_id).await;
        outcome
    }

    /// Capacity check, payment and insert. Runs under the event's lock.
    async fn reserve_and_record(
        &self,
        request: &CreateBookingRequest,
        event: &Event,
        venue: &Venue,
    ) -> std::result::Result<(BookingId, String), Halt> {
        let booked = self
            .repos
            .bookings
            .booking_count_for_event(request.event_id)
            .await?;
        let available = event
            .seating
            .available_capacity(i64::from(venue.total_capacity()), booked);

        let section = request.section();
        let effective = match (&event.seating, section) {
            (SeatingPolicy::SectionReserved(layout), Some(name)) => {
                let section_booked = self
                    .repos
                    .bookings
                    .booking_count_for_event_section(request.event_id, name)
                    .await?;
                event
                    .seating
                    .available_capacity(i64::from(layout.capacity_of(name)), section_booked)
            }
            _ => available,
        };

        if !event
            .seating
            .can_accommodate(request.number_of_seats, effective, section)
        {
            let rejection = match section {
                Some(name) => BookingRejection::InsufficientSectionCapacity {
                    section: name.to_string(),
                    requested: request.number_of_seats,
                    available: effective,
                },
                None => BookingRejection::InsufficientCapacity {
                    requested: request.number_of_seats,
                    available,
                },
            };
            return Err(rejection.into());
        }

        let payment_id = self.charge(&request.credit_card_number).await?;

        let mut booking = Booking::new(
            request.user_id,
            request.event_id,
            event.venue_id,
            request.number_of_seats,
            request.section_identifier.clone(),
            request.total_amount,
        )?;
        booking.mark_paid(payment_id.as_str())?;

        let booking_id = self.repos.bookings.add(booking).await?;
        Ok((booking_id, payment_id))
    }

    /// Calls the gateway once. Every gateway failure becomes a rejection.
    async fn charge(&self, card_number: &str) -> std::result::Result<String, BookingRejection> {
        let started = Instant::now();
        let outcome = self
            .payments
            .process_payment(&PaymentRequest::new(card_number))
            .await;
        metrics::histogram!("payment_duration_seconds").record(started.elapsed().as_secs_f64());

        match outcome {
            Ok(PaymentResponse {
                is_valid: true,
                payment_id: Some(payment_id),
            }) => {
                metrics::counter!("payment_requests_total", "outcome" => "approved").increment(1);
                Ok(payment_id)
            }
            Ok(PaymentResponse {
                is_valid: true,
                payment_id: None,
            }) => {
                metrics::counter!("payment_requests_total", "outcome" => "error").increment(1);
                tracing::warn!("payment approved without a payment id");
                Err(BookingRejection::PaymentFailed(
                    "gateway approved the payment without a payment id".to_string(),
                ))
            }
            Ok(_) => {
                metrics::counter!("payment_requests_total", "outcome" => "rejected").increment(1);
                Err(BookingRejection::PaymentRejected)
            }
            Err(err) => {
                metrics::counter!("payment_requests_total", "outcome" => "error").increment(1);
                tracing::warn!(error = %err, "payment gateway call failed");
                Err(BookingRejection::PaymentFailed(err.to_string()))
            }
        }
    }

    async fn lock_event(&self, event_id: EventId) -> OwnedMutexGuard<()> {
        let lock = self
            .event_locks
            .lock()
            .await
            .entry(event_id)
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    /// Drops the event's lock entry once no other booking holds or awaits it.
    async fn release_event(&self, event_id: EventId) {
        let mut locks = self.event_locks.lock().await;
        if locks
            .get(&event_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&event_id);
        }
    }

    #[cfg(test)]
    async fn tracked_events(&self) -> usize {
        self.event_locks.lock().await.len()
    }

    /// Flags a paid booking as refunded. No money is moved.
    #[tracing::instrument(skip(self))]
    pub async fn refund_booking(&self, booking_id: BookingId) -> Result<Booking> {
        let mut booking = self
            .repos
            .bookings
            .get_by_id(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        booking.mark_refunded()?;
        self.repos.bookings.update(booking.clone()).await?;

        metrics::counter!("bookings_refunded_total").increment(1);
        tracing::info!(%booking_id, "booking refunded");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use domain::{Money, User};

    use super::*;
    use crate::SimulatedPaymentGateway;

    async fn service_with_event(capacity: i32) -> (BookingService, CreateBookingRequest) {
        let repos = Repositories::in_memory();
        let user = repos
            .users
            .add(User::new("Jane", "Smith", "jane.smith@example.com"))
            .await
            .unwrap();
        let venue = repos
            .venues
            .add(Venue::new("Jazz Club Downtown", "789 Blues Road, Chicago", capacity).unwrap())
            .await
            .unwrap();
        let event = repos
            .events
            .add(Event::new(
                "Jazz Night",
                venue,
                Utc::now() + Duration::days(15),
                "Concert",
                SeatingPolicy::Open,
            ))
            .await
            .unwrap();

        let service = BookingService::new(repos, Arc::new(SimulatedPaymentGateway::new()));
        let request =
            CreateBookingRequest::new(user, event, 1, "4111111111111111", Money::from_units(40));
        (service, request)
    }

    #[tokio::test]
    async fn test_event_locks_are_released_after_booking() {
        let (service, request) = service_with_event(3).await;

        let mut handles = Vec::new();
        for _ in 0..5 {
            let service = service.clone();
            let request = request.clone();
            handles.push(tokio::spawn(async move {
                service.create_booking(request).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(service.tracked_events().await, 0);
    }

    #[tokio::test]
    async fn test_event_lock_is_released_after_rejection() {
        let (service, mut request) = service_with_event(1).await;
        request.number_of_seats = 2;

        let result = service.create_booking(request).await.unwrap();
        assert!(!result.success);
        assert_eq!(service.tracked_events().await, 0);
    }
}
