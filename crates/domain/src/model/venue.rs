use chrono::{DateTime, Utc};
use common::VenueId;
use serde::Serialize;

use crate::DomainError;

/// A place hosting events. `total_capacity` caps the seats of every event held there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub location: String,
    total_capacity: i32,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    /// Creates a venue; the id is assigned by the store on insert.
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        total_capacity: i32,
    ) -> Result<Self, DomainError> {
        if total_capacity <= 0 {
            return Err(DomainError::InvalidCapacity(total_capacity));
        }

        Ok(Self {
            id: VenueId::UNASSIGNED,
            name: name.into(),
            location: location.into(),
            total_capacity,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a venue from stored columns.
    pub fn restore(
        id: VenueId,
        name: String,
        location: String,
        total_capacity: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            location,
            total_capacity,
            created_at,
        }
    }

    pub fn total_capacity(&self) -> i32 {
        self.total_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_venue_keeps_capacity() {
        let venue = Venue::new("Jazz Club Downtown", "789 Blues Road, Chicago", 300).unwrap();
        assert_eq!(venue.total_capacity(), 300);
        assert_eq!(venue.name, "Jazz Club Downtown");
    }

    #[test]
    fn test_new_venue_rejects_non_positive_capacity() {
        assert_eq!(
            Venue::new("Empty", "Nowhere", 0).unwrap_err(),
            DomainError::InvalidCapacity(0)
        );
        assert!(Venue::new("Negative", "Nowhere", -5).is_err());
    }
}
