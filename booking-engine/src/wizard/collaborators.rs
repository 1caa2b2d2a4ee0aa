//! External collaborator contracts
//!
//! The booking core never talks to the backend, renders UI or picks
//! strings itself; these traits are the seams the host implements.

use async_trait::async_trait;
use shared::booking::{BookingStep, BookingSummary};
use shared::error::AppResult;
use shared::message::Notice;
use shared::models::{Locale, PackageSettings, SelectedService, ServiceCategory};
use std::sync::Arc;

/// Service catalog source
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn categories(&self) -> AppResult<Vec<ServiceCategory>>;
}

/// Upsell candidates for the current selection
#[async_trait]
pub trait UpsellProvider: Send + Sync {
    async fn upsell_offers(
        &self,
        selection: &[SelectedService],
        locale: Locale,
    ) -> AppResult<Vec<SelectedService>>;
}

/// Package configuration; `None` disables package mode
#[async_trait]
pub trait PackageSettingsProvider: Send + Sync {
    async fn package_settings(&self) -> AppResult<Option<PackageSettings>>;
}

/// Performs screen transitions the controller authorized
pub trait Navigator: Send + Sync {
    fn go_to(&self, step: BookingStep);

    /// Leave the wizard (back from the first step)
    fn exit_wizard(&self);

    /// Hand the finished booking to the submission flow
    fn submit(&self, summary: BookingSummary);
}

/// Renders localized notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Collaborators injected into a booking session
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<dyn CatalogProvider>,
    pub upsells: Arc<dyn UpsellProvider>,
    pub package_settings: Arc<dyn PackageSettingsProvider>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("catalog", &"<CatalogProvider>")
            .field("upsells", &"<UpsellProvider>")
            .field("package_settings", &"<PackageSettingsProvider>")
            .field("navigator", &"<Navigator>")
            .field("notifier", &"<Notifier>")
            .finish()
    }
}
