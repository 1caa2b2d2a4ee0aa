//! Booking selection state
//!
//! - **store**: the session's selected-services container
//! - **removal**: cascading rules when a service is removed

pub mod removal;
pub mod store;

pub use removal::{Removal, RemovalOutcome, ServiceRemovalPolicy};
pub use store::{SelectionBackend, SelectionStore, ensure_unique_ids};
