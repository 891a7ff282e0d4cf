//! Seat availability of upcoming events.

use domain::{Event, Venue};
use serde::Serialize;

use crate::error::Result;
use crate::service::BookingService;

/// An upcoming event with its venue and seat counts.
#[derive(Debug, Clone, Serialize)]
pub struct EventAvailability {
    pub event: Event,
    pub seating_type: &'static str,
    pub section_info: String,
    pub venue: Venue,
    pub booked_seats: i64,
    pub available_seats: i64,
    pub is_available: bool,
}

impl BookingService {
    /// Future events, earliest first, with venue-wide availability.
    ///
    /// Events whose venue no longer exists are left out.
    #[tracing::instrument(skip(self))]
    pub async fn future_events_with_availability(&self) -> Result<Vec<EventAvailability>> {
        let repos = self.repositories();
        let mut listing = Vec::new();

        for event in repos.events.get_future_events().await? {
            let Some(venue) = repos.venues.get_by_id(event.venue_id).await? else {
                tracing::debug!(event_id = %event.id, venue_id = %event.venue_id, "skipping event without venue");
                continue;
            };

            let booked_seats = repos.bookings.booking_count_for_event(event.id).await?;
            let available_seats = event
                .seating
                .available_capacity(i64::from(venue.total_capacity()), booked_seats);

            listing.push(EventAvailability {
                seating_type: event.seating.display_name(),
                section_info: event.seating.section_info(),
                booked_seats,
                available_seats,
                is_available: available_seats > 0,
                event,
                venue,
            });
        }

        Ok(listing)
    }
}
