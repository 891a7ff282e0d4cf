//! Booking request and outcome types.

use common::{BookingId, EventId, UserId, VenueId};
use domain::Money;
use serde::{Deserialize, Serialize};

/// Input of [`BookingService::create_booking`](crate::BookingService::create_booking).
#[derive(Clone, Deserialize)]
pub struct CreateBookingRequest {
    pub user_id: UserId,
    pub event_id: EventId,
    pub number_of_seats: i32,
    pub credit_card_number: String,
    pub total_amount: Money,
    #[serde(default)]
    pub section_identifier: Option<String>,
}

impl CreateBookingRequest {
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        number_of_seats: i32,
        credit_card_number: impl Into<String>,
        total_amount: Money,
    ) -> Self {
        Self {
            user_id,
            event_id,
            number_of_seats,
            credit_card_number: credit_card_number.into(),
            total_amount,
            section_identifier: None,
        }
    }

    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section_identifier = Some(section.into());
        self
    }

    /// The section, if one was given and is not empty.
    pub(crate) fn section(&self) -> Option<&str> {
        self.section_identifier.as_deref().filter(|s| !s.is_empty())
    }
}

impl std::fmt::Debug for CreateBookingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateBookingRequest")
            .field("user_id", &self.user_id)
            .field("event_id", &self.event_id)
            .field("number_of_seats", &self.number_of_seats)
            .field("credit_card_number", &"<redacted>")
            .field("total_amount", &self.total_amount)
            .field("section_identifier", &self.section_identifier)
            .finish()
    }
}

/// Outcome of a booking attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResult {
    pub success: bool,
    pub message: String,
    pub booking_id: Option<BookingId>,
    pub payment_id: Option<String>,
}

impl BookingResult {
    pub fn succeeded(booking_id: BookingId, payment_id: impl Into<String>) -> Self {
        Self {
            success: true,
            message: "Booking created successfully".to_string(),
            booking_id: Some(booking_id),
            payment_id: Some(payment_id.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            booking_id: None,
            payment_id: None,
        }
    }
}

impl From<BookingRejection> for BookingResult {
    fn from(rejection: BookingRejection) -> Self {
        Self::failed(rejection.to_string())
    }
}

/// Why a booking was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingRejection {
    NonPositiveSeats,
    UserNotFound(UserId),
    EventNotFound(EventId),
    PastEvent,
    VenueNotFound(VenueId),
    InsufficientSectionCapacity {
        section: String,
        requested: i32,
        available: i64,
    },
    InsufficientCapacity {
        requested: i32,
        available: i64,
    },
    PaymentFailed(String),
    PaymentRejected,
}

impl BookingRejection {
    /// Metric label for this kind of rejection.
    pub fn reason(&self) -> &'static str {
        match self {
            BookingRejection::NonPositiveSeats => "invalid_seats",
            BookingRejection::UserNotFound(_) => "user_not_found",
            BookingRejection::EventNotFound(_) => "event_not_found",
            BookingRejection::PastEvent => "past_event",
            BookingRejection::VenueNotFound(_) => "venue_not_found",
            BookingRejection::InsufficientSectionCapacity { .. }
            | BookingRejection::InsufficientCapacity { .. } => "insufficient_capacity",
            BookingRejection::PaymentFailed(_) => "payment_failed",
            BookingRejection::PaymentRejected => "payment_rejected",
        }
    }
}

impl std::fmt::Display for BookingRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingRejection::NonPositiveSeats => {
                f.write_str("Number of seats must be greater than zero")
            }
            BookingRejection::UserNotFound(id) => write!(f, "User with ID {id} not found"),
            BookingRejection::EventNotFound(id) => write!(f, "Event with ID {id} not found"),
            BookingRejection::PastEvent => f.write_str("Cannot book tickets for past events"),
            BookingRejection::VenueNotFound(id) => write!(f, "Venue with ID {id} not found"),
            BookingRejection::InsufficientSectionCapacity {
                section,
                requested,
                available,
            } => write!(
                f,
                "Insufficient capacity in section '{section}'. Requested: {requested}, Available: {available}"
            ),
            BookingRejection::InsufficientCapacity {
                requested,
                available,
            } => write!(
                f,
                "Insufficient capacity. Requested: {requested}, Available: {available}"
            ),
            BookingRejection::PaymentFailed(detail) => {
                write!(f, "Payment processing failed: {detail}")
            }
            BookingRejection::PaymentRejected => {
                f.write_str("Payment was rejected. Please check your payment information")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_debug_redacts_card_number() {
        let request = CreateBookingRequest::new(
            UserId::new(1),
            EventId::new(2),
            3,
            "4111111111111111",
            Money::from_units(90),
        );
        let debug = format!("{request:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("4111111111111111"));
    }

    #[test]
    fn test_empty_section_counts_as_absent() {
        let request =
            CreateBookingRequest::new(UserId::new(1), EventId::new(2), 1, "x", Money::zero());
        assert_eq!(request.section(), None);
        assert_eq!(request.clone().in_section("").section(), None);
        assert_eq!(request.in_section("VIP").section(), Some("VIP"));
    }

    #[test]
    fn test_rejection_messages() {
        let rejection = BookingRejection::InsufficientSectionCapacity {
            section: "VIP".to_string(),
            requested: 10,
            available: 4,
        };
        assert_eq!(
            rejection.to_string(),
            "Insufficient capacity in section 'VIP'. Requested: 10, Available: 4"
        );

        let result = BookingResult::from(BookingRejection::UserNotFound(UserId::new(7)));
        assert!(!result.success);
        assert_eq!(result.message, "User with ID 7 not found");
        assert!(result.booking_id.is_none() && result.payment_id.is_none());
    }

    #[test]
    fn test_request_deserializes_without_section() {
        let request: CreateBookingRequest = serde_json::from_str(
            r#"{"user_id":1,"event_id":2,"number_of_seats":2,"credit_card_number":"4111111111111111","total_amount":15000}"#,
        )
        .unwrap();
        assert_eq!(request.total_amount, Money::from_cents(15000));
        assert!(request.section_identifier.is_none());
    }
}
