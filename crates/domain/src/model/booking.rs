use chrono::{DateTime, Utc};
use common::{BookingId, EventId, UserId, VenueId};
use serde::{Deserialize, Serialize};

use crate::{DomainError, Money};

/// Payment state of a booking.
///
/// State transitions:
/// ```text
/// Pending ──┬──► Paid ──► Refunded
///           └──► Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    /// Returns true if the lifecycle allows moving to `next`.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Paid)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Paid, PaymentStatus::Refunded)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Refunded => "Refunded",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(PaymentStatus::Pending),
            "Paid" => Ok(PaymentStatus::Paid),
            "Failed" => Ok(PaymentStatus::Failed),
            "Refunded" => Ok(PaymentStatus::Refunded),
            other => Err(DomainError::UnknownPaymentStatus(other.to_string())),
        }
    }
}

/// A reservation of seats for one event by one user.
///
/// `venue_id` is a copy of the event's venue taken at creation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub venue_id: VenueId,
    number_of_seats: i32,
    pub section_identifier: Option<String>,
    pub total_amount: Money,
    payment_status: PaymentStatus,
    payment_id: Option<String>,
    pub booking_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates an unpersisted `Pending` booking.
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        venue_id: VenueId,
        number_of_seats: i32,
        section_identifier: Option<String>,
        total_amount: Money,
    ) -> Result<Self, DomainError> {
        if number_of_seats <= 0 {
            return Err(DomainError::InvalidSeatCount(number_of_seats));
        }

        let now = Utc::now();
        Ok(Self {
            id: BookingId::UNASSIGNED,
            user_id,
            event_id,
            venue_id,
            number_of_seats,
            section_identifier,
            total_amount,
            payment_status: PaymentStatus::Pending,
            payment_id: None,
            booking_date: now,
            created_at: now,
        })
    }

    /// Rebuilds a booking from stored columns without re-validating the lifecycle.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: BookingId,
        user_id: UserId,
        event_id: EventId,
        venue_id: VenueId,
        number_of_seats: i32,
        section_identifier: Option<String>,
        total_amount: Money,
        payment_status: PaymentStatus,
        payment_id: Option<String>,
        booking_date: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            event_id,
            venue_id,
            number_of_seats,
            section_identifier,
            total_amount,
            payment_status,
            payment_id,
            booking_date,
            created_at,
        }
    }

    pub fn number_of_seats(&self) -> i32 {
        self.number_of_seats
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    /// Gateway payment identifier, present only once the booking is paid.
    pub fn payment_id(&self) -> Option<&str> {
        self.payment_id.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Records a successful payment. Only legal from `Pending`.
    pub fn mark_paid(&mut self, payment_id: impl Into<String>) -> Result<(), DomainError> {
        self.transition(PaymentStatus::Paid)?;
        self.payment_id = Some(payment_id.into());
        Ok(())
    }

    /// Records a failed payment. Only legal from `Pending`.
    pub fn mark_failed(&mut self) -> Result<(), DomainError> {
        self.transition(PaymentStatus::Failed)
    }

    /// Flags a paid booking as refunded. Only legal from `Paid`.
    pub fn mark_refunded(&mut self) -> Result<(), DomainError> {
        self.transition(PaymentStatus::Refunded)
    }

    fn transition(&mut self, next: PaymentStatus) -> Result<(), DomainError> {
        if !self.payment_status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.payment_status,
                to: next,
            });
        }
        self.payment_status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_booking() -> Booking {
        Booking::new(
            UserId::new(1),
            EventId::new(2),
            VenueId::new(3),
            4,
            None,
            Money::from_units(100),
        )
        .unwrap()
    }

    #[test]
    fn test_new_booking_is_pending_and_unassigned() {
        let booking = pending_booking();
        assert_eq!(booking.id, BookingId::UNASSIGNED);
        assert_eq!(booking.payment_status(), PaymentStatus::Pending);
        assert!(booking.payment_id().is_none());
        assert!(!booking.is_paid());
    }

    #[test]
    fn test_new_booking_rejects_non_positive_seats() {
        for seats in [0, -1] {
            let result = Booking::new(
                UserId::new(1),
                EventId::new(1),
                VenueId::new(1),
                seats,
                None,
                Money::zero(),
            );
            assert_eq!(result.unwrap_err(), DomainError::InvalidSeatCount(seats));
        }
    }

    #[test]
    fn test_mark_paid_records_payment_id() {
        let mut booking = pending_booking();
        booking.mark_paid("PAY-1").unwrap();
        assert!(booking.is_paid());
        assert_eq!(booking.payment_id(), Some("PAY-1"));
    }

    #[test]
    fn test_refund_requires_paid() {
        let mut booking = pending_booking();
        assert_eq!(
            booking.mark_refunded().unwrap_err(),
            DomainError::InvalidStatusTransition {
                from: PaymentStatus::Pending,
                to: PaymentStatus::Refunded,
            }
        );

        booking.mark_paid("PAY-1").unwrap();
        booking.mark_refunded().unwrap();
        assert_eq!(booking.payment_status(), PaymentStatus::Refunded);
    }

    #[test]
    fn test_terminal_states_reject_transitions() {
        let mut failed = pending_booking();
        failed.mark_failed().unwrap();
        assert!(failed.mark_paid("PAY-2").is_err());
        assert!(failed.mark_refunded().is_err());

        let mut refunded = pending_booking();
        refunded.mark_paid("PAY-3").unwrap();
        refunded.mark_refunded().unwrap();
        assert!(refunded.mark_paid("PAY-4").is_err());
        assert!(refunded.mark_failed().is_err());
    }

    #[test]
    fn test_payment_status_parses_stored_names() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(status.as_str().parse::<PaymentStatus>().unwrap(), status);
        }
        assert!("Settled".parse::<PaymentStatus>().is_err());
    }
}
