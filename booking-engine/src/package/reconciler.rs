//! Package Reconciler
//!
//! Commits a [`PackageComposition`] to the selection while keeping upsell
//! items the customer added on their own.
//!
//! # Strategies
//!
//! ```text
//! atomic backend:   replace_all(base + add-ons + kept upsells)
//! additive backend: clear → anchor → add-ons → restore
//!                   (each phase separated by the stagger delay)
//! ```
//!
//! Only one reconciliation may run at a time; a second call while one is in
//! flight fails with [`BookingError::ReconciliationInProgress`].

use shared::models::SelectedService;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::builder::PackageComposition;
use crate::core::{BookingError, Result};
use crate::pricing::PackageDiscountEngine;
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::selection::{SelectionBackend, ensure_unique_ids};

/// Clears the in-flight flag when the reconciliation ends, success or not
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct PackageReconciler {
    stagger: Duration,
    in_flight: AtomicBool,
}

impl PackageReconciler {
    pub fn new(stagger: Duration) -> Self {
        Self {
            stagger,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| BookingError::ReconciliationInProgress)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    /// Final selection for `composition` given the currently held upsells
    ///
    /// `{base} ∪ add-ons ∪ (upsells \ ids(composition))`, base first.
    /// A composition without a base or with repeated ids is rejected.
    pub fn target_selection(
        engine: &PackageDiscountEngine,
        composition: &PackageComposition,
        upsells: &[SelectedService],
    ) -> Result<Vec<SelectedService>> {
        ensure_unique_ids(&composition.services)?;
        let base = composition
            .services
            .iter()
            .find(|s| engine.is_base_service(s))
            .ok_or(BookingError::MissingBaseService)?;

        let mut target = Vec::with_capacity(composition.services.len() + upsells.len());
        target.push(base.clone());
        target.extend(
            composition
                .services
                .iter()
                .filter(|s| s.id != base.id)
                .cloned(),
        );

        let mut ids: HashSet<String> = target.iter().map(|s| s.id.clone()).collect();
        for upsell in upsells {
            if ids.insert(upsell.id.clone()) {
                target.push(upsell.clone());
            }
        }

        ensure_unique_ids(&target)?;
        Ok(target)
    }

    /// Single reconciliation attempt
    pub async fn reconcile(
        &self,
        backend: &dyn SelectionBackend,
        engine: &PackageDiscountEngine,
        composition: &PackageComposition,
    ) -> Result<Vec<SelectedService>> {
        let _guard = self.acquire()?;
        let upsells = held_upsells(&backend.snapshot());
        // Validates the base before anything is touched
        let target = Self::target_selection(engine, composition, &upsells)?;
        self.commit(backend, &target, composition, &upsells).await
    }

    /// Reconciliation wrapped in the retry executor
    ///
    /// The in-flight flag is held across every attempt. Upsells are captured
    /// and the target is validated once, before the first attempt; an
    /// invalid composition fails without retrying.
    pub async fn reconcile_with_retry(
        &self,
        backend: &dyn SelectionBackend,
        engine: &PackageDiscountEngine,
        composition: &PackageComposition,
        policy: &RetryPolicy<BookingError>,
    ) -> Result<Vec<SelectedService>> {
        let _guard = self.acquire()?;
        let upsells = held_upsells(&backend.snapshot());
        let target = Self::target_selection(engine, composition, &upsells)?;

        execute_with_retry(
            || self.commit(backend, &target, composition, &upsells),
            policy,
        )
        .await
        .map_err(|e| BookingError::CommitFailed(e.to_string()))
    }

    async fn commit(
        &self,
        backend: &dyn SelectionBackend,
        target: &[SelectedService],
        composition: &PackageComposition,
        upsells: &[SelectedService],
    ) -> Result<Vec<SelectedService>> {
        if backend.supports_atomic_replace() {
            backend.replace_all(target.to_vec()).await?;
            tracing::info!(
                services = target.len(),
                upsells = target.iter().filter(|s| s.is_upsell_item).count(),
                "Package committed atomically"
            );
            return Ok(target.to_vec());
        }

        self.commit_staged(backend, target, composition, upsells).await
    }

    async fn commit_staged(
        &self,
        backend: &dyn SelectionBackend,
        target: &[SelectedService],
        composition: &PackageComposition,
        upsells: &[SelectedService],
    ) -> Result<Vec<SelectedService>> {
        let (base, add_ons) = target
            .split_first()
            .ok_or(BookingError::MissingBaseService)?;

        // Phase 1: clear (upsells stay unless the package overrides them)
        for item in backend.snapshot() {
            if !item.is_upsell_item || composition.contains(&item.id) {
                backend.remove_service(&item.id).await?;
            }
        }
        tracing::debug!("Reconcile phase: clear done");
        self.pause().await;

        // Phase 2: anchor
        backend.add_service(base.clone()).await?;
        tracing::debug!(base = %base.id, "Reconcile phase: anchor done");
        self.pause().await;

        // Phase 3: add-ons in supplied order
        for add_on in add_ons.iter().filter(|s| composition.contains(&s.id)) {
            backend.add_service(add_on.clone()).await?;
        }
        tracing::debug!("Reconcile phase: add-ons done");
        self.pause().await;

        // Phase 4: restore upsells that went missing
        let present: HashSet<String> = backend.snapshot().into_iter().map(|s| s.id).collect();
        for upsell in upsells {
            if !present.contains(&upsell.id) && !composition.contains(&upsell.id) {
                backend.add_service(upsell.clone()).await?;
            }
        }

        let committed = backend.snapshot();
        verify_committed(target, &committed)?;
        tracing::info!(services = committed.len(), "Package committed in stages");
        Ok(committed)
    }

    async fn pause(&self) {
        if !self.stagger.is_zero() {
            tokio::time::sleep(self.stagger).await;
        }
    }
}

fn held_upsells(selection: &[SelectedService]) -> Vec<SelectedService> {
    selection
        .iter()
        .filter(|s| s.is_upsell_item)
        .cloned()
        .collect()
}

/// The committed selection must hold exactly the target ids
fn verify_committed(target: &[SelectedService], committed: &[SelectedService]) -> Result<()> {
    ensure_unique_ids(committed)?;
    let expected: HashSet<&str> = target.iter().map(|s| s.id.as_str()).collect();
    let actual: HashSet<&str> = committed.iter().map(|s| s.id.as_str()).collect();
    if expected != actual {
        return Err(BookingError::SelectionInconsistent {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use shared::models::{DiscountTiers, PackageSettings};
    use std::sync::Arc;
    use std::sync::atomic::AtomicU32;

    fn service(id: &str, price: f64) -> SelectedService {
        SelectedService {
            id: id.to_string(),
            name_en: id.to_string(),
            name_ar: String::new(),
            base_price: price,
            duration: 30,
            price,
            original_price: None,
            discount_percentage: None,
            is_base_package_service: false,
            is_package_add_on: false,
            is_upsell_item: false,
        }
    }

    fn engine() -> PackageDiscountEngine {
        PackageDiscountEngine::new(Some(PackageSettings::new(
            "base",
            DiscountTiers::new(10, 15, 20),
        )))
    }

    fn composition(engine: &PackageDiscountEngine, add_ons: &[(&str, f64)]) -> PackageComposition {
        let mut services = vec![service("base", 100.0)];
        services.extend(add_ons.iter().map(|(id, p)| service(id, *p)));
        PackageComposition::new(engine.apply_package_discounts(&services))
    }

    fn sorted_ids(services: &[SelectedService]) -> Vec<String> {
        let mut ids: Vec<String> = services.iter().map(|s| s.id.clone()).collect();
        ids.sort();
        ids
    }

    /// Additive-only backend that records every call
    #[derive(Default)]
    struct AdditiveBackend {
        services: Mutex<Vec<SelectedService>>,
        calls: Mutex<Vec<String>>,
        /// Removing this id also drops every upsell
        drops_upsells_with: Option<String>,
    }

    #[async_trait]
    impl SelectionBackend for AdditiveBackend {
        fn snapshot(&self) -> Vec<SelectedService> {
            self.services.lock().clone()
        }

        async fn add_service(&self, service: SelectedService) -> Result<()> {
            self.calls.lock().push(format!("add:{}", service.id));
            let mut guard = self.services.lock();
            if !guard.iter().any(|s| s.id == service.id) {
                guard.push(service);
            }
            Ok(())
        }

        async fn remove_service(&self, service_id: &str) -> Result<()> {
            self.calls.lock().push(format!("remove:{}", service_id));
            let mut guard = self.services.lock();
            guard.retain(|s| s.id != service_id);
            if self.drops_upsells_with.as_deref() == Some(service_id) {
                guard.retain(|s| !s.is_upsell_item);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_atomic_keeps_upsells() {
        let engine = engine();
        let store = SelectionStore::with_services(vec![
            service("base", 100.0),
            service("old", 20.0),
            service("oil", 30.0).into_upsell(),
        ]);

        let reconciler = PackageReconciler::new(Duration::from_millis(40));
        let result = reconciler
            .reconcile(&store, &engine, &composition(&engine, &[("beard", 50.0)]))
            .await
            .unwrap();

        assert_eq!(sorted_ids(&result), vec!["base", "beard", "oil"]);
        assert_eq!(store.snapshot(), result);
        assert_eq!(result[0].id, "base");
        assert_eq!(result[1].price, 45.0);
        assert!(!reconciler.is_in_flight());
    }

    #[tokio::test]
    async fn test_target_overrides_upsell_with_same_id() {
        let engine = engine();
        let store = SelectionStore::with_services(vec![
            service("base", 100.0),
            service("beard", 50.0).into_upsell(),
        ]);

        let result = PackageReconciler::new(Duration::ZERO)
            .reconcile(&store, &engine, &composition(&engine, &[("beard", 50.0)]))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert!(result[1].is_package_add_on);
        assert!(!result[1].is_upsell_item);
    }

    #[tokio::test]
    async fn test_missing_base_commits_nothing() {
        let engine = engine();
        let before = vec![service("beard", 50.0), service("oil", 30.0).into_upsell()];
        let store = SelectionStore::with_services(before.clone());

        let err = PackageReconciler::new(Duration::ZERO)
            .reconcile(
                &store,
                &engine,
                &PackageComposition::new(vec![service("wash", 40.0)]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::MissingBaseService));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_staged_phase_order() {
        let engine = engine();
        let backend = AdditiveBackend::default();
        *backend.services.lock() = vec![
            service("base", 100.0),
            service("old", 20.0),
            service("oil", 30.0).into_upsell(),
        ];

        let start = tokio::time::Instant::now();
        let result = PackageReconciler::new(Duration::from_millis(40))
            .reconcile(
                &backend,
                &engine,
                &composition(&engine, &[("beard", 50.0), ("wash", 40.0)]),
            )
            .await
            .unwrap();

        assert_eq!(
            *backend.calls.lock(),
            vec!["remove:base", "remove:old", "add:base", "add:beard", "add:wash"]
        );
        assert_eq!(sorted_ids(&result), vec!["base", "beard", "oil", "wash"]);
        assert_eq!(start.elapsed(), Duration::from_millis(120));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_reconcile_rejected() {
        let engine = engine();
        let backend = AdditiveBackend::default();
        *backend.services.lock() = vec![service("base", 100.0)];
        let reconciler = PackageReconciler::new(Duration::from_millis(40));
        let first_composition = composition(&engine, &[("beard", 50.0)]);
        let second_composition = composition(&engine, &[("wash", 40.0)]);

        let (first, second) = tokio::join!(
            reconciler.reconcile(&backend, &engine, &first_composition),
            reconciler.reconcile(&backend, &engine, &second_composition),
        );

        assert_eq!(sorted_ids(&first.unwrap()), vec!["base", "beard"]);
        assert!(matches!(second, Err(BookingError::ReconciliationInProgress)));
        assert!(!reconciler.is_in_flight());

        assert!(
            reconciler
                .reconcile(&backend, &engine, &second_composition)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_staged_restores_dropped_upsells() {
        let engine = engine();
        let backend = AdditiveBackend {
            drops_upsells_with: Some("base".into()),
            ..Default::default()
        };
        *backend.services.lock() = vec![
            service("base", 100.0),
            service("old", 20.0),
            service("oil", 30.0).into_upsell(),
        ];

        let result = PackageReconciler::new(Duration::ZERO)
            .reconcile(&backend, &engine, &composition(&engine, &[("beard", 50.0)]))
            .await
            .unwrap();

        assert_eq!(
            *backend.calls.lock(),
            vec!["remove:base", "remove:old", "add:base", "add:beard", "add:oil"]
        );
        assert_eq!(sorted_ids(&result), vec!["base", "beard", "oil"]);
        let oil = result.iter().find(|s| s.id == "oil").unwrap();
        assert!(oil.is_upsell_item);
        assert_eq!(oil.price, 30.0);
    }

    #[tokio::test]
    async fn test_staged_target_overrides_upsell_with_same_id() {
        let engine = engine();
        let backend = AdditiveBackend::default();
        *backend.services.lock() = vec![
            service("base", 100.0),
            service("beard", 50.0).into_upsell(),
        ];

        let result = PackageReconciler::new(Duration::ZERO)
            .reconcile(&backend, &engine, &composition(&engine, &[("beard", 50.0)]))
            .await
            .unwrap();

        assert_eq!(
            *backend.calls.lock(),
            vec!["remove:base", "remove:beard", "add:base", "add:beard"]
        );
        assert_eq!(result.len(), 2);
        let beard = result.iter().find(|s| s.id == "beard").unwrap();
        assert!(beard.is_package_add_on);
        assert!(!beard.is_upsell_item);
        assert_eq!(beard.price, 45.0);
    }

    #[tokio::test]
    async fn test_duplicate_ids_in_composition_rejected() {
        let engine = engine();
        let before = vec![service("base", 100.0)];
        let store = SelectionStore::with_services(before.clone());
        let base = composition(&engine, &[]).services.remove(0);

        let err = PackageReconciler::new(Duration::ZERO)
            .reconcile(
                &store,
                &engine,
                &PackageComposition::new(vec![base.clone(), base]),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::DuplicateService(id) if id == "base"));
        assert_eq!(store.snapshot(), before);
        assert_eq!(store.version(), 0);
    }

    #[tokio::test]
    async fn test_invalid_composition_is_not_retried() {
        let engine = engine();
        let store = SelectionStore::with_services(vec![service("base", 100.0)]);
        let attempts = Arc::new(AtomicU32::new(0));
        let finals = Arc::new(AtomicU32::new(0));
        let policy = {
            let attempts = attempts.clone();
            let finals = finals.clone();
            RetryPolicy::new(3)
                .on_error(move |_: &BookingError, _| {
                    attempts.fetch_add(1, Ordering::SeqCst);
                })
                .on_final_error(move |_: &BookingError| {
                    finals.fetch_add(1, Ordering::SeqCst);
                })
        };

        let err = PackageReconciler::new(Duration::ZERO)
            .reconcile_with_retry(
                &store,
                &engine,
                &PackageComposition::new(vec![service("wash", 40.0)]),
                &policy,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::MissingBaseService));
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
        assert_eq!(finals.load(Ordering::SeqCst), 0);
    }

    /// Atomic backend that fails the first `failures` replace calls
    struct FlakyBackend {
        inner: SelectionStore,
        failures: Mutex<u32>,
    }

    #[async_trait]
    impl SelectionBackend for FlakyBackend {
        fn snapshot(&self) -> Vec<SelectedService> {
            self.inner.snapshot()
        }

        async fn add_service(&self, service: SelectedService) -> Result<()> {
            self.inner.add_service(service).await
        }

        async fn remove_service(&self, service_id: &str) -> Result<()> {
            self.inner.remove_service(service_id).await
        }

        fn supports_atomic_replace(&self) -> bool {
            true
        }

        async fn replace_all(&self, services: Vec<SelectedService>) -> Result<()> {
            {
                let mut failures = self.failures.lock();
                if *failures > 0 {
                    *failures -= 1;
                    return Err(BookingError::Collaborator("backend busy".into()));
                }
            }
            self.inner.replace_all(services).await
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_transient_failure() {
        let engine = engine();
        let backend = FlakyBackend {
            inner: SelectionStore::with_services(vec![service("base", 100.0)]),
            failures: Mutex::new(2),
        };

        let result = PackageReconciler::new(Duration::ZERO)
            .reconcile_with_retry(
                &backend,
                &engine,
                &composition(&engine, &[("beard", 50.0)]),
                &RetryPolicy::new(2),
            )
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(backend.snapshot(), result);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_maps_to_commit_failed() {
        let engine = engine();
        let before = vec![service("base", 100.0)];
        let backend = FlakyBackend {
            inner: SelectionStore::with_services(before.clone()),
            failures: Mutex::new(10),
        };

        let err = PackageReconciler::new(Duration::ZERO)
            .reconcile_with_retry(
                &backend,
                &engine,
                &composition(&engine, &[("beard", 50.0)]),
                &RetryPolicy::new(1),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::CommitFailed(_)));
        assert_eq!(*backend.failures.lock(), 8);
        assert_eq!(backend.snapshot(), before);
    }
}
