use chrono::{DateTime, Utc};
use common::{EventId, VenueId};
use serde::{Deserialize, Serialize};

use crate::SeatingPolicy;

/// A scheduled event at a venue.
///
/// The seating policy is chosen when the event is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub venue_id: VenueId,
    pub event_date: DateTime<Utc>,
    pub event_type: String,
    pub seating: SeatingPolicy,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Creates an event; the id is assigned by the store on insert.
    pub fn new(
        name: impl Into<String>,
        venue_id: VenueId,
        event_date: DateTime<Utc>,
        event_type: impl Into<String>,
        seating: SeatingPolicy,
    ) -> Self {
        Self {
            id: EventId::UNASSIGNED,
            name: name.into(),
            description: None,
            venue_id,
            event_date,
            event_type: event_type.into(),
            seating,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the event starts strictly after `now`.
    pub fn is_future_at(&self, now: DateTime<Utc>) -> bool {
        self.event_date > now
    }

    pub fn is_future(&self) -> bool {
        self.is_future_at(Utc::now())
    }
}
