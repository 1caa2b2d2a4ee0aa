//! In-memory collaborators
//!
//! Fixed catalog, settings and upsell lists plus a navigator and notifier
//! that only log. Used by the demo binary and as a starting point for hosts.

use async_trait::async_trait;
use shared::booking::{BookingStep, BookingSummary};
use shared::error::AppResult;
use shared::message::Notice;
use shared::models::{Locale, PackageSettings, SelectedService, ServiceCategory};
use std::sync::Arc;

use super::collaborators::{
    CatalogProvider, Collaborators, Navigator, Notifier, PackageSettingsProvider, UpsellProvider,
};

#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    categories: Vec<ServiceCategory>,
}

impl StaticCatalog {
    pub fn new(categories: Vec<ServiceCategory>) -> Self {
        Self { categories }
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn categories(&self) -> AppResult<Vec<ServiceCategory>> {
        Ok(self.categories.clone())
    }
}

/// Offers every configured upsell that is not already selected
#[derive(Debug, Clone, Default)]
pub struct StaticUpsells {
    offers: Vec<SelectedService>,
}

impl StaticUpsells {
    pub fn new(offers: Vec<SelectedService>) -> Self {
        Self { offers }
    }
}

#[async_trait]
impl UpsellProvider for StaticUpsells {
    async fn upsell_offers(
        &self,
        selection: &[SelectedService],
        _locale: Locale,
    ) -> AppResult<Vec<SelectedService>> {
        Ok(self
            .offers
            .iter()
            .filter(|o| !selection.iter().any(|s| s.id == o.id))
            .cloned()
            .collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticPackageSettings {
    settings: Option<PackageSettings>,
}

impl StaticPackageSettings {
    pub fn new(settings: Option<PackageSettings>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl PackageSettingsProvider for StaticPackageSettings {
    async fn package_settings(&self) -> AppResult<Option<PackageSettings>> {
        Ok(self.settings.clone())
    }
}

/// Navigator that logs each transition
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn go_to(&self, step: BookingStep) {
        tracing::info!(step = %step, "Navigate");
    }

    fn exit_wizard(&self) {
        tracing::info!("Navigate: exit wizard");
    }

    fn submit(&self, summary: BookingSummary) {
        match serde_json::to_string(&summary) {
            Ok(json) => tracing::info!(draft_id = %summary.draft_id, summary = %json, "Submit booking"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize booking summary"),
        }
    }
}

/// Notifier that logs the i18n key and level
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        tracing::info!(level = ?notice.level, key = %notice.key, "Notice");
    }
}

impl Collaborators {
    /// Static providers with logging navigator and notifier
    pub fn in_memory(
        categories: Vec<ServiceCategory>,
        upsells: Vec<SelectedService>,
        settings: Option<PackageSettings>,
    ) -> Self {
        Self {
            catalog: Arc::new(StaticCatalog::new(categories)),
            upsells: Arc::new(StaticUpsells::new(upsells)),
            package_settings: Arc::new(StaticPackageSettings::new(settings)),
            navigator: Arc::new(LogNavigator),
            notifier: Arc::new(LogNotifier),
        }
    }
}
