//! Entities of the booking system.

mod booking;
mod event;
mod user;
mod venue;

pub use booking::{Booking, PaymentStatus};
pub use event::Event;
pub use user::User;
pub use venue::Venue;
