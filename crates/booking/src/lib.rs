//! Booking orchestration for the event booking system.
//!
//! [`BookingService::create_booking`] runs the booking pipeline:
//! 1. Validate the seat count
//! 2. Look up the user, the event and its venue
//! 3. Check capacity against the event's seating policy
//! 4. Charge the card through a [`PaymentGateway`]
//! 5. Record the booking as `Paid`
//!
//! Nothing is written unless every step succeeds.

pub mod availability;
pub mod error;
pub mod http;
pub mod payment;
pub mod request;
pub mod service;

pub use availability::EventAvailability;
pub use error::{BookingError, Result};
pub use http::HttpPaymentGateway;
pub use payment::{
    PaymentError, PaymentGateway, PaymentRequest, PaymentResponse, SimulatedPaymentGateway,
};
pub use request::{BookingRejection, BookingResult, CreateBookingRequest};
pub use service::BookingService;
