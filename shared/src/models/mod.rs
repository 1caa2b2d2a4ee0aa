//! Data models
//!
//! Shared between the booking engine and the UI layer.
//! Service ids are backend strings.

pub mod catalog;
pub mod customer;
pub mod locale;
pub mod package;
pub mod service;

// Re-exports
pub use catalog::*;
pub use customer::*;
pub use locale::*;
pub use package::*;
pub use service::*;
