//! Booking wizard
//!
//! - **collaborators**: contracts for catalog, upsells, settings, navigation and notices
//! - **gate**: per-step validation
//! - **state**: wizard state and transition results
//! - **controller**: the step state machine
//! - **memory**: in-memory collaborators

pub mod collaborators;
pub mod controller;
pub mod gate;
pub mod memory;
pub mod state;

pub use collaborators::{
    CatalogProvider, Collaborators, Navigator, Notifier, PackageSettingsProvider, UpsellProvider,
};
pub use controller::{BookingInputs, BookingStepController};
pub use gate::{StepContext, StepValidationGate, check_step};
pub use state::{Detour, Transition, WizardState};
