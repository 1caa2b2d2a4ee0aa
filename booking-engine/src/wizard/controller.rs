//! Booking Step Controller
//!
//! Owns the wizard state machine for one booking session:
//!
//! ```text
//! services ──next──▶ datetime ──next──▶ barber ──next──▶ details ──next──▶ submit
//!    │                   ◀──prev──          ◀──prev──         ◀──prev──
//!    ├─ package builder detour (base service selected)
//!    └─ upsell detour (upsell provider has offers)
//! ```
//!
//! Forward moves pass the [`StepValidationGate`]; leaving `services` may
//! suspend the transition behind a detour that resumes to the pending step
//! once confirmed or skipped. `prev` is never validated and `jump` only
//! goes backwards.
//!
//! Every failure is logged and turned into a notice here; nothing escapes
//! to the host as a panic.

use chrono::{NaiveDate, NaiveTime};
use parking_lot::Mutex;
use shared::booking::{BookingStep, BookingSummary, BookingTotals};
use shared::message::{Notice, NoticeKey};
use shared::models::{
    CatalogService, CustomerDetails, Locale, SelectedService, ServiceCategory, find_service,
    sort_catalog,
};
use std::sync::Arc;
use uuid::Uuid;

use super::collaborators::Collaborators;
use super::gate::{StepContext, StepValidationGate};
use super::state::{Detour, Transition, WizardState};
use crate::core::{BookingError, Config, Result};
use crate::package::{PackageBuilder, PackageReconciler};
use crate::pricing::PackageDiscountEngine;
use crate::retry::RetryPolicy;
use crate::selection::{RemovalOutcome, SelectionStore, ServiceRemovalPolicy};

/// Date, staff, slot and customer inputs collected along the wizard
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingInputs {
    pub date: Option<NaiveDate>,
    pub staff_id: Option<String>,
    pub time_slot: Option<NaiveTime>,
    pub customer: CustomerDetails,
    pub details_valid: bool,
}

impl BookingInputs {
    pub fn context<'a>(&'a self, selection: &'a [SelectedService]) -> StepContext<'a> {
        StepContext {
            selection,
            date: self.date,
            staff_id: self.staff_id.as_deref(),
            time_slot: self.time_slot,
            details_valid: self.details_valid,
        }
    }
}

pub struct BookingStepController {
    config: Config,
    collaborators: Collaborators,
    catalog: Vec<ServiceCategory>,
    engine: PackageDiscountEngine,
    reconciler: PackageReconciler,
    store: Arc<SelectionStore>,
    state: Mutex<WizardState>,
    inputs: Mutex<BookingInputs>,
}

impl std::fmt::Debug for BookingStepController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingStepController")
            .field("state", &*self.state.lock())
            .field("selection", &self.store.len())
            .field("package_mode", &self.engine.settings().is_some())
            .finish()
    }
}

impl BookingStepController {
    /// Load the catalog and package settings and start on `services`
    ///
    /// A catalog failure aborts the mount. Failing to load package settings
    /// only disables package mode.
    pub async fn mount(config: Config, collaborators: Collaborators) -> Result<Self> {
        let mut catalog = collaborators.catalog.categories().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load service catalog");
            BookingError::from(e)
        })?;
        sort_catalog(&mut catalog);

        let settings = match collaborators.package_settings.package_settings().await {
            Ok(settings) => settings.map(|s| s.normalized()),
            Err(e) => {
                tracing::warn!(error = %e, "Package settings unavailable, package mode disabled");
                None
            }
        };

        tracing::info!(
            categories = catalog.len(),
            package_mode = settings.is_some(),
            locale = config.locale.as_str(),
            "Booking session mounted"
        );

        Ok(Self {
            reconciler: PackageReconciler::new(config.reconcile_stagger()),
            engine: PackageDiscountEngine::new(settings),
            store: Arc::new(SelectionStore::new()),
            state: Mutex::new(WizardState::Active {
                step: BookingStep::Services,
            }),
            inputs: Mutex::new(BookingInputs::default()),
            catalog,
            config,
            collaborators,
        })
    }

    // ========== Accessors ==========

    pub fn state(&self) -> WizardState {
        self.state.lock().clone()
    }

    pub fn current_step(&self) -> Option<BookingStep> {
        self.state.lock().current_step()
    }

    pub fn selection(&self) -> Vec<SelectedService> {
        self.store.snapshot()
    }

    /// Shared handle to the selection store
    pub fn store(&self) -> Arc<SelectionStore> {
        self.store.clone()
    }

    /// Catalog sorted by display order
    pub fn catalog(&self) -> &[ServiceCategory] {
        &self.catalog
    }

    pub fn engine(&self) -> &PackageDiscountEngine {
        &self.engine
    }

    pub fn locale(&self) -> Locale {
        self.config.locale
    }

    pub fn inputs(&self) -> BookingInputs {
        self.inputs.lock().clone()
    }

    pub fn is_package_active(&self) -> bool {
        self.engine.is_package_active(&self.store.snapshot())
    }

    pub fn totals(&self) -> BookingTotals {
        self.engine.calculate_totals(&self.store.snapshot())
    }

    // ========== Selection ==========

    /// Select or deselect a catalog service; returns whether it is selected afterwards
    pub fn toggle_service(&self, service_id: &str) -> bool {
        if self.store.contains(service_id) {
            self.remove_service(service_id);
            return false;
        }

        let Some(service) = find_service(&self.catalog, service_id) else {
            self.report(&BookingError::ServiceNotFound(service_id.to_string()));
            return false;
        };

        let result = self.store.update(|current| {
            let mut next = current.to_vec();
            next.push(SelectedService::from_catalog(service));
            Ok(self.engine.apply_package_discounts(&next))
        });

        match result {
            Ok(selection) => {
                tracing::debug!(service_id = %service_id, selected = selection.len(), "Service selected");
                true
            }
            Err(e) => {
                self.report(&e);
                false
            }
        }
    }

    /// Remove one service, applying the package cascade
    ///
    /// Returns `None` when the removal failed; the previous selection is
    /// kept and a notice is shown.
    pub fn remove_service(&self, service_id: &str) -> Option<RemovalOutcome> {
        let policy = ServiceRemovalPolicy::new(&self.engine);
        let mut outcome = None;

        let result = self.store.update(|current| {
            let removal = policy.remove_service(service_id, current)?;
            outcome = Some(removal.outcome);
            Ok(removal.selection)
        });

        match result {
            Ok(selection) => {
                tracing::info!(
                    service_id = %service_id,
                    outcome = ?outcome,
                    remaining = selection.len(),
                    "Service removed"
                );
                outcome
            }
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    // ========== Step inputs ==========

    /// Changing the date drops the staff and slot picked for the old date
    pub fn set_date(&self, date: NaiveDate) {
        let mut inputs = self.inputs.lock();
        if inputs.date != Some(date) {
            inputs.date = Some(date);
            inputs.staff_id = None;
            inputs.time_slot = None;
            tracing::debug!(date = %date, "Booking date changed");
        }
    }

    pub fn set_staff(&self, staff_id: impl Into<String>) {
        self.inputs.lock().staff_id = Some(staff_id.into());
    }

    pub fn set_time_slot(&self, time_slot: NaiveTime) {
        self.inputs.lock().time_slot = Some(time_slot);
    }

    pub fn set_customer_details(&self, customer: CustomerDetails) {
        self.inputs.lock().customer = customer;
    }

    /// Validity reported by the customer-details form
    pub fn set_details_valid(&self, valid: bool) {
        self.inputs.lock().details_valid = valid;
    }

    // ========== Navigation ==========

    pub async fn next(&self) -> Transition {
        let step = match self.state() {
            WizardState::Active { step } => step,
            state => {
                tracing::debug!(state = ?state, "Next ignored");
                return Transition::Stayed;
            }
        };

        let selection = self.store.snapshot();
        let inputs = self.inputs();
        let ctx = inputs.context(&selection);
        let gate = StepValidationGate::new(self.collaborators.notifier.as_ref());

        let Some(pending) = step.next() else {
            if let Some(key) = gate.validate_through(step, &ctx) {
                return Transition::Blocked(key);
            }
            return self.submit(selection, inputs);
        };

        if let Some(key) = gate.validate(step, &ctx) {
            return Transition::Blocked(key);
        }

        if step == BookingStep::Services
            && let Some(detour) = self.detour_for(&selection).await
        {
            let mut state = self.state.lock();
            if *state != (WizardState::Active { step }) {
                tracing::debug!("State changed while loading detour, next dropped");
                return Transition::Stayed;
            }
            *state = WizardState::Suspended {
                current: step,
                pending,
                detour: detour.clone(),
            };
            tracing::info!(step = %step, pending = %pending, "Transition suspended behind detour");
            return Transition::DetourOpened(detour);
        }

        self.move_to(pending)
    }

    /// Back one step; from the first step this leaves the wizard
    ///
    /// With a detour open, `prev` only closes the detour.
    pub fn prev(&self) -> Transition {
        let state = self.state();
        match state {
            WizardState::Active { step } => match step.prev() {
                Some(prev) => self.move_to(prev),
                None => {
                    *self.state.lock() = WizardState::Exited;
                    tracing::info!("Booking wizard exited");
                    self.collaborators.navigator.exit_wizard();
                    Transition::Exited
                }
            },
            WizardState::Suspended { .. } => self.cancel_detour(),
            WizardState::Exited | WizardState::Submitted => Transition::Stayed,
        }
    }

    /// Jump to an already visited step (never forward)
    pub fn jump(&self, target: BookingStep) -> Transition {
        match self.state() {
            WizardState::Active { step } if target.index() <= step.index() => self.move_to(target),
            state => {
                tracing::debug!(target = %target, state = ?state, "Jump rejected");
                Transition::Stayed
            }
        }
    }

    // ========== Detours ==========

    /// Commit the package builder choice and resume the pending step
    ///
    /// On failure the detour stays open so the user can retry or cancel.
    pub async fn confirm_package(&self, add_on_ids: &[String]) -> Transition {
        let WizardState::Suspended {
            detour: Detour::PackageBuilder { offer },
            ..
        } = self.state()
        else {
            tracing::warn!(error = %BookingError::NoPendingDetour, "Package confirm ignored");
            return Transition::Stayed;
        };

        let Some(base) = find_service(&self.catalog, &offer.base.id) else {
            return self.fail(BookingError::MissingBaseService);
        };

        let add_ons: Vec<CatalogService> = add_on_ids
            .iter()
            .filter_map(|id| {
                let found = offer.candidates.iter().find(|c| &c.id == id).cloned();
                if found.is_none() {
                    tracing::warn!(service_id = %id, "Unknown add-on ignored");
                }
                found
            })
            .collect();

        let composition = match PackageBuilder::new(&self.engine).compose(base, &add_ons) {
            Ok(composition) => composition,
            Err(e) => return self.fail(e),
        };

        let policy = self.commit_retry_policy();
        let committed = match self
            .reconciler
            .reconcile_with_retry(self.store.as_ref(), &self.engine, &composition, &policy)
            .await
        {
            Ok(committed) => committed,
            Err(e) => return self.fail(e),
        };

        tracing::info!(
            base = %offer.base.id,
            add_ons = composition.services.len() - 1,
            services = committed.len(),
            "Package applied"
        );
        self.notify(NoticeKey::PackageApplied);
        self.resume()
    }

    /// Add the chosen upsell offers and resume the pending step
    pub fn accept_upsells(&self, offer_ids: &[String]) -> Transition {
        let WizardState::Suspended {
            detour: Detour::Upsell { offers },
            ..
        } = self.state()
        else {
            tracing::warn!(error = %BookingError::NoPendingDetour, "Upsell accept ignored");
            return Transition::Stayed;
        };

        let chosen: Vec<SelectedService> = offers
            .into_iter()
            .filter(|o| offer_ids.contains(&o.id))
            .map(SelectedService::into_upsell)
            .collect();

        if !chosen.is_empty() {
            let count = chosen.len();
            let result = self.store.update(|current| {
                let mut next = current.to_vec();
                next.extend(
                    chosen
                        .into_iter()
                        .filter(|c| !current.iter().any(|s| s.id == c.id)),
                );
                Ok(self.engine.apply_package_discounts(&next))
            });

            if let Err(e) = result {
                return self.fail(e);
            }
            tracing::info!(count, "Upsell items added");
            self.notify(NoticeKey::UpsellAdded);
        }

        self.resume()
    }

    /// Close the detour without changes and continue to the pending step
    pub fn skip_detour(&self) -> Transition {
        if !self.state.lock().is_suspended() {
            tracing::warn!(error = %BookingError::NoPendingDetour, "Skip ignored");
            return Transition::Stayed;
        }
        tracing::debug!("Detour skipped");
        self.resume()
    }

    /// Close the detour and stay on the current step
    pub fn cancel_detour(&self) -> Transition {
        let mut state = self.state.lock();
        if let WizardState::Suspended { current, .. } = *state {
            *state = WizardState::Active { step: current };
            tracing::debug!(step = %current, "Detour cancelled");
        }
        Transition::Stayed
    }

    // ========== Internals ==========

    async fn detour_for(&self, selection: &[SelectedService]) -> Option<Detour> {
        if let Some(offer) = PackageBuilder::new(&self.engine).offer(selection, &self.catalog) {
            return Some(Detour::PackageBuilder { offer });
        }

        match self
            .collaborators
            .upsells
            .upsell_offers(selection, self.config.locale)
            .await
        {
            Ok(offers) => {
                let offers: Vec<SelectedService> = offers
                    .into_iter()
                    .filter(|o| !selection.iter().any(|s| s.id == o.id))
                    .collect();
                (!offers.is_empty()).then_some(Detour::Upsell { offers })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Upsell offers unavailable, continuing without prompt");
                None
            }
        }
    }

    fn move_to(&self, step: BookingStep) -> Transition {
        *self.state.lock() = WizardState::Active { step };
        tracing::debug!(step = %step, "Step changed");
        self.collaborators.navigator.go_to(step);
        Transition::Moved(step)
    }

    fn resume(&self) -> Transition {
        let pending = {
            let state = self.state.lock();
            match &*state {
                WizardState::Suspended { pending, .. } => *pending,
                _ => return Transition::Stayed,
            }
        };
        self.move_to(pending)
    }

    fn submit(&self, selection: Vec<SelectedService>, inputs: BookingInputs) -> Transition {
        let (Some(date), Some(staff_id), Some(time_slot)) =
            (inputs.date, inputs.staff_id, inputs.time_slot)
        else {
            return self.fail(BookingError::InvalidTransition(
                "booking inputs incomplete".into(),
            ));
        };

        let summary = BookingSummary {
            draft_id: Uuid::new_v4(),
            totals: self.engine.calculate_totals(&selection),
            services: selection,
            date,
            staff_id,
            time_slot,
            customer: inputs.customer,
        };

        *self.state.lock() = WizardState::Submitted;
        tracing::info!(
            draft_id = %summary.draft_id,
            services = summary.services.len(),
            total = summary.totals.total,
            "Booking submitted"
        );
        self.collaborators.navigator.submit(summary.clone());
        Transition::Submitted(Box::new(summary))
    }

    fn commit_retry_policy(&self) -> RetryPolicy<BookingError> {
        let max_attempts = self.config.package_commit_max_retries.saturating_add(1);
        self.config
            .package_commit_retry_policy()
            .on_error(move |err: &BookingError, attempt| {
                tracing::warn!(attempt, max_attempts, error = %err, "Package commit attempt failed");
            })
            .on_final_error(|err: &BookingError| {
                tracing::error!(error = %err, "Package commit failed after all retries");
            })
    }

    fn notify(&self, key: NoticeKey) {
        self.collaborators.notifier.notify(Notice::new(key));
    }

    fn report(&self, err: &BookingError) {
        tracing::error!(code = %err.code(), error = %err, "Booking operation failed");
        self.notify(err.notice_key());
    }

    fn fail(&self, err: BookingError) -> Transition {
        self.report(&err);
        Transition::Blocked(err.notice_key())
    }
}
