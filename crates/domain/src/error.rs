//! Domain error types.

use thiserror::Error;

use crate::model::PaymentStatus;

/// Errors raised by domain invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// A payment status change that the lifecycle does not allow.
    #[error("Invalid payment status transition: cannot move from {from} to {to}")]
    InvalidStatusTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// Venue capacity must be strictly positive.
    #[error("Invalid venue capacity: {0} (must be greater than 0)")]
    InvalidCapacity(i32),

    /// A booking must hold at least one seat.
    #[error("Invalid seat count: {0} (must be greater than 0)")]
    InvalidSeatCount(i32),

    /// A stored payment status string could not be recognised.
    #[error("Unknown payment status: {0}")]
    UnknownPaymentStatus(String),
}
