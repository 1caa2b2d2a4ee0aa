//! Wizard state machine types

use serde::{Deserialize, Serialize};
use shared::booking::{BookingStep, BookingSummary};
use shared::message::NoticeKey;
use shared::models::SelectedService;

use crate::package::PackageOffer;

/// Overlay that interrupts a forward transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Detour {
    /// Package builder for the selected base service
    PackageBuilder { offer: PackageOffer },
    /// Upsell prompt with the offered items
    Upsell { offers: Vec<SelectedService> },
}

/// Where the wizard is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WizardState {
    Active {
        step: BookingStep,
    },
    /// A detour is open; `pending` is where `next` was heading
    Suspended {
        current: BookingStep,
        pending: BookingStep,
        detour: Detour,
    },
    /// Left through `prev` on the first step
    Exited,
    /// Summary handed to the navigator
    Submitted,
}

impl WizardState {
    /// Step the user is looking at (None once the wizard is left)
    pub fn current_step(&self) -> Option<BookingStep> {
        match self {
            WizardState::Active { step } => Some(*step),
            WizardState::Suspended { current, .. } => Some(*current),
            WizardState::Exited | WizardState::Submitted => None,
        }
    }

    pub fn is_suspended(&self) -> bool {
        matches!(self, WizardState::Suspended { .. })
    }

    pub fn detour(&self) -> Option<&Detour> {
        match self {
            WizardState::Suspended { detour, .. } => Some(detour),
            _ => None,
        }
    }
}

/// What a navigation request resulted in
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Now on this step
    Moved(BookingStep),
    /// Validation failed; the notice was already shown
    Blocked(NoticeKey),
    /// Forward transition suspended behind a detour
    DetourOpened(Detour),
    /// Request ignored in the current state
    Stayed,
    Exited,
    Submitted(Box<BookingSummary>),
}
