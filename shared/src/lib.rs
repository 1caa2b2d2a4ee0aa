//! Shared types for the booking workspace
//!
//! Models, wizard steps, user notices and error types used by the
//! booking engine and by the UI layer that drives it.

pub mod booking;
pub mod error;
pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use booking::{BookingStep, BookingSummary, BookingTotals};
pub use error::{AppError, AppResult, ErrorCode};
pub use message::{Notice, NoticeKey, NoticeLevel};
