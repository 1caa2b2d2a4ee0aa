//! Selection store
//!
//! The selected-services list is the single piece of shared mutable state
//! in a booking session. Readers always get a full snapshot and writers
//! always replace the whole list, so a partial update is never visible.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::SelectedService;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{BookingError, Result};

/// Mutation surface used by the package reconciler
///
/// Backends that only support additive mutations (add one / remove one)
/// leave `supports_atomic_replace` at `false`; the reconciler then falls
/// back to staged phases.
#[async_trait]
pub trait SelectionBackend: Send + Sync {
    /// Current selection
    fn snapshot(&self) -> Vec<SelectedService>;

    /// Append one service (ignored when the id is already selected)
    async fn add_service(&self, service: SelectedService) -> Result<()>;

    /// Remove one service by id (ignored when absent)
    async fn remove_service(&self, service_id: &str) -> Result<()>;

    fn supports_atomic_replace(&self) -> bool {
        false
    }

    /// Replace the whole selection in one step
    async fn replace_all(&self, _services: Vec<SelectedService>) -> Result<()> {
        Err(BookingError::InvalidTransition(
            "atomic replace not supported by this selection backend".into(),
        ))
    }
}

/// In-memory selection store owned by the booking controller
#[derive(Debug, Default)]
pub struct SelectionStore {
    services: RwLock<Vec<SelectedService>>,
    version: AtomicU64,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<SelectedService>) -> Self {
        Self {
            services: RwLock::new(services),
            version: AtomicU64::new(0),
        }
    }

    /// Copy of the current selection
    pub fn snapshot(&self) -> Vec<SelectedService> {
        self.services.read().clone()
    }

    /// Bumped on every committed change
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.services.read().iter().any(|s| s.id == service_id)
    }

    pub fn get(&self, service_id: &str) -> Option<SelectedService> {
        self.services
            .read()
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
    }

    /// Replace the whole selection
    pub fn replace(&self, services: Vec<SelectedService>) {
        let mut guard = self.services.write();
        *guard = services;
        self.version.fetch_add(1, Ordering::AcqRel);
    }

    /// Read, compute and replace under one write lock
    ///
    /// When `f` fails nothing is committed and the previous selection stays.
    pub fn update<F>(&self, f: F) -> Result<Vec<SelectedService>>
    where
        F: FnOnce(&[SelectedService]) -> Result<Vec<SelectedService>>,
    {
        let mut guard = self.services.write();
        let next = f(&guard)?;
        ensure_unique_ids(&next)?;
        *guard = next.clone();
        self.version.fetch_add(1, Ordering::AcqRel);
        Ok(next)
    }

    pub fn clear(&self) {
        self.replace(Vec::new());
    }
}

/// Reject selections that contain the same service id twice
pub fn ensure_unique_ids(services: &[SelectedService]) -> Result<()> {
    let mut seen = std::collections::HashSet::with_capacity(services.len());
    for service in services {
        if !seen.insert(service.id.as_str()) {
            return Err(BookingError::DuplicateService(service.id.clone()));
        }
    }
    Ok(())
}

#[async_trait]
impl SelectionBackend for SelectionStore {
    fn snapshot(&self) -> Vec<SelectedService> {
        SelectionStore::snapshot(self)
    }

    async fn add_service(&self, service: SelectedService) -> Result<()> {
        let mut guard = self.services.write();
        if guard.iter().any(|s| s.id == service.id) {
            tracing::debug!(service_id = %service.id, "Service already selected, add ignored");
            return Ok(());
        }
        guard.push(service);
        self.version.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    async fn remove_service(&self, service_id: &str) -> Result<()> {
        let mut guard = self.services.write();
        let before = guard.len();
        guard.retain(|s| s.id != service_id);
        if guard.len() != before {
            self.version.fetch_add(1, Ordering::AcqRel);
        }
        Ok(())
    }

    fn supports_atomic_replace(&self) -> bool {
        true
    }

    async fn replace_all(&self, services: Vec<SelectedService>) -> Result<()> {
        ensure_unique_ids(&services)?;
        self.replace(services);
        Ok(())
    }
}
