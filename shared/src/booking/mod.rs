//! Booking wizard types

pub mod step;
pub mod summary;

pub use step::BookingStep;
pub use summary::{BookingSummary, BookingTotals};
