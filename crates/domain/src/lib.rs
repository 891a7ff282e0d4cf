//! Domain layer for the event booking system.
//!
//! This crate provides the core booking model:
//! - Users, venues, events and bookings
//! - The booking payment lifecycle (`Pending` → `Paid`|`Failed`, `Paid` → `Refunded`)
//! - Seating policies and their capacity rules

pub mod error;
pub mod model;
pub mod money;
pub mod seating;

pub use error::DomainError;
pub use model::{Booking, Event, PaymentStatus, User, Venue};
pub use money::Money;
pub use seating::{SeatingPolicy, SeatingRecord, SectionLayout, SectionMap};
