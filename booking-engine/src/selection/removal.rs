//! Service Removal Policy
//!
//! Decides what else changes when one line item leaves the selection:
//!
//! 1. unknown id: nothing changes (benign race with the UI)
//! 2. plain item, or package mode inactive: simple filter-out
//! 3. base service: package mode exits, former add-ons go back to their
//!    original price
//! 4. add-on: the remaining add-ons are repriced at the new tier

use shared::models::SelectedService;

use crate::core::{BookingError, Result};
use crate::pricing::PackageDiscountEngine;

/// What a removal did to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// Id was not in the selection
    NotFound,
    /// Plain filter-out
    Removed,
    /// Base service removed, package pricing dropped
    PackageExited,
    /// Add-on removed, remaining add-ons repriced
    Rebalanced { percentage: u32 },
}

/// Result of planning a removal
#[derive(Debug, Clone)]
pub struct Removal {
    pub selection: Vec<SelectedService>,
    pub outcome: RemovalOutcome,
}

/// Removal policy bound to the session's discount engine
pub struct ServiceRemovalPolicy<'a> {
    engine: &'a PackageDiscountEngine,
}

impl<'a> ServiceRemovalPolicy<'a> {
    pub fn new(engine: &'a PackageDiscountEngine) -> Self {
        Self { engine }
    }

    /// Compute the selection after removing `service_id`
    ///
    /// Pure: `current` is never modified, the caller commits the result.
    pub fn remove_service(&self, service_id: &str, current: &[SelectedService]) -> Result<Removal> {
        let Some(item) = current.iter().find(|s| s.id == service_id) else {
            tracing::debug!(service_id = %service_id, "Service not in selection, removal skipped");
            return Ok(Removal {
                selection: current.to_vec(),
                outcome: RemovalOutcome::NotFound,
            });
        };

        let package_active = self.engine.is_package_active(current);
        let is_package_service = self.engine.is_package_service(item);

        let remaining: Vec<SelectedService> = current
            .iter()
            .filter(|s| s.id != service_id)
            .cloned()
            .collect();

        if !package_active || !is_package_service {
            return Ok(Removal {
                selection: remaining,
                outcome: RemovalOutcome::Removed,
            });
        }

        if self.engine.is_base_service(item) {
            let selection = remaining
                .into_iter()
                .map(|mut s| {
                    if s.is_package_add_on {
                        s.clear_package_pricing();
                    }
                    s
                })
                .collect();

            tracing::info!(service_id = %service_id, "Base package service removed, package mode exited");
            return Ok(Removal {
                selection,
                outcome: RemovalOutcome::PackageExited,
            });
        }

        let repriced = self.engine.apply_package_discounts(&remaining);
        if repriced.len() != remaining.len() {
            return Err(BookingError::SelectionInconsistent {
                expected: remaining.len(),
                actual: repriced.len(),
            });
        }

        let percentage = self.engine.current_percentage(&repriced);
        tracing::info!(
            service_id = %service_id,
            add_on_count = self.engine.add_on_count(&repriced),
            percentage,
            "Package add-on removed, discounts rebalanced"
        );

        Ok(Removal {
            selection: repriced,
            outcome: RemovalOutcome::Rebalanced { percentage },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{DiscountTiers, PackageSettings};

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

    fn package(engine: &PackageDiscountEngine, add_ons: &[(&str, f64)]) -> Vec<SelectedService> {
        let mut selection = vec![service("base", 100.0)];
        selection.extend(add_ons.iter().map(|(id, price)| service(id, *price)));
        engine.apply_package_discounts(&selection)
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let engine = engine();
        let current = package(&engine, &[("beard", 50.0)]);

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("ghost", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::NotFound);
        assert_eq!(removal.selection, current);
    }

    #[test]
    fn test_plain_removal_without_package() {
        let engine = engine();
        let current = vec![service("beard", 50.0), service("wash", 40.0)];

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("beard", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::Removed);
        assert_eq!(removal.selection, vec![service("wash", 40.0)]);
    }

    #[test]
    fn test_upsell_removal_does_not_reprice() {
        let engine = engine();
        let mut current = package(&engine, &[("beard", 50.0), ("wash", 40.0)]);
        current.push(service("oil", 30.0).into_upsell());

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("oil", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::Removed);
        assert_eq!(removal.selection, current[..3].to_vec());
    }

    #[test]
    fn test_removing_base_restores_original_prices() {
        let engine = engine();
        let mut current = package(&engine, &[("beard", 50.0), ("wash", 40.0)]);
        current.push(service("oil", 30.0).into_upsell());

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("base", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::PackageExited);
        assert_eq!(removal.selection.len(), 3);
        for item in &removal.selection {
            assert!(!item.is_package_add_on);
            assert!(item.discount_percentage.is_none());
            assert_eq!(item.price, item.base_price);
        }
        assert!(removal.selection[2].is_upsell_item);
    }

    #[test]
    fn test_removing_add_on_rebalances_tier() {
        let engine = engine();
        let current = package(&engine, &[("beard", 50.0), ("wash", 40.0)]);
        assert_eq!(current[1].price, 42.0);

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("wash", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::Rebalanced { percentage: 10 });
        assert_eq!(removal.selection[1].price, 45.0);
        assert_eq!(removal.selection[1].discount_percentage, Some(10));
    }

    #[test]
    fn test_removing_sole_add_on_leaves_base_at_full_price() {
        let engine = engine();
        let current = package(&engine, &[("beard", 50.0)]);

        let removal = ServiceRemovalPolicy::new(&engine)
            .remove_service("beard", &current)
            .unwrap();

        assert_eq!(removal.outcome, RemovalOutcome::Rebalanced { percentage: 0 });
        assert_eq!(removal.selection.len(), 1);
        assert_eq!(removal.selection[0].id, "base");
        assert_eq!(removal.selection[0].price, 100.0);
        assert_eq!(engine.add_on_count(&removal.selection), 0);
    }
}
