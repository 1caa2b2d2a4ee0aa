//! Package builder
//!
//! Decides whether the package-builder detour should be offered and turns
//! the user's add-on choice into a priced [`PackageComposition`].

use serde::{Deserialize, Serialize};
use shared::models::{CatalogService, DiscountTiers, SelectedService, ServiceCategory};
use std::collections::HashSet;

use crate::core::{BookingError, Result};
use crate::pricing::PackageDiscountEngine;

/// Target selection produced by the package builder: one base service and
/// its add-ons, already priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageComposition {
    pub services: Vec<SelectedService>,
}

impl PackageComposition {
    pub fn new(services: Vec<SelectedService>) -> Self {
        Self { services }
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.services.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn contains(&self, service_id: &str) -> bool {
        self.services.iter().any(|s| s.id == service_id)
    }
}

/// What the package-builder detour shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageOffer {
    pub base: SelectedService,
    /// Catalog services that can be added to the package
    pub candidates: Vec<CatalogService>,
    /// Ids already in the selection that would become add-ons
    pub preselected: Vec<String>,
    pub tiers: DiscountTiers,
    pub max_services: Option<u32>,
}

pub struct PackageBuilder<'a> {
    engine: &'a PackageDiscountEngine,
}

impl<'a> PackageBuilder<'a> {
    pub fn new(engine: &'a PackageDiscountEngine) -> Self {
        Self { engine }
    }

    /// Offer the package builder when settings exist, the base service is
    /// selected and the catalog has at least one other service
    pub fn offer(
        &self,
        selection: &[SelectedService],
        catalog: &[ServiceCategory],
    ) -> Option<PackageOffer> {
        let settings = self.engine.settings()?;
        let base = selection
            .iter()
            .find(|s| !s.is_upsell_item && self.engine.is_base_service(s))?;

        let candidates: Vec<CatalogService> = catalog
            .iter()
            .flat_map(|c| c.services.iter())
            .filter(|s| !settings.is_base_service(&s.id))
            .cloned()
            .collect();

        if candidates.is_empty() {
            tracing::debug!("Base service selected but no add-on candidates in catalog");
            return None;
        }

        let preselected = selection
            .iter()
            .filter(|s| !s.is_upsell_item && !self.engine.is_base_service(s))
            .map(|s| s.id.clone())
            .collect();

        Some(PackageOffer {
            base: base.clone(),
            candidates,
            preselected,
            tiers: settings.discount_tiers,
            max_services: settings.max_services,
        })
    }

    /// Price a base service plus the chosen add-ons
    ///
    /// Duplicate add-on ids and the base id are dropped; exceeding
    /// `max_services` is an error.
    pub fn compose(
        &self,
        base: &CatalogService,
        add_ons: &[CatalogService],
    ) -> Result<PackageComposition> {
        let settings = self.engine.settings().ok_or(BookingError::PackageNotConfigured)?;
        if !settings.is_base_service(&base.id) {
            return Err(BookingError::MissingBaseService);
        }

        let mut seen = HashSet::new();
        let add_ons: Vec<&CatalogService> = add_ons
            .iter()
            .filter(|s| s.id != base.id && seen.insert(s.id.as_str()))
            .collect();

        if let Some(max) = settings.max_services
            && add_ons.len() > max as usize
        {
            return Err(BookingError::MaxServicesExceeded {
                count: add_ons.len(),
                max,
            });
        }

        let mut services = Vec::with_capacity(add_ons.len() + 1);
        services.push(SelectedService::from_catalog(base));
        services.extend(add_ons.into_iter().map(SelectedService::from_catalog));

        Ok(PackageComposition::new(
            self.engine.apply_package_discounts(&services),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PackageSettings;

    fn catalog_service(id: &str, price: f64) -> CatalogService {
        CatalogService {
            id: id.to_string(),
            name_en: id.to_string(),
            name_ar: String::new(),
            price,
            duration: 30,
            display_order: 0,
        }
    }

    fn catalog() -> Vec<ServiceCategory> {
        vec![ServiceCategory {
            id: "all".into(),
            name_en: "All".into(),
            name_ar: String::new(),
            display_order: 0,
            services: vec![
                catalog_service("base", 100.0),
                catalog_service("beard", 50.0),
                catalog_service("wash", 40.0),
            ],
        }]
    }

    fn engine(max: Option<u32>) -> PackageDiscountEngine {
        let mut settings = PackageSettings::new("base", DiscountTiers::new(10, 15, 20));
        settings.max_services = max;
        PackageDiscountEngine::new(Some(settings))
    }

    #[test]
    fn test_offer_requires_base_selected() {
        let engine = engine(None);
        let builder = PackageBuilder::new(&engine);
        let beard = SelectedService::from_catalog(&catalog_service("beard", 50.0));

        assert!(builder.offer(&[beard.clone()], &catalog()).is_none());

        let base = SelectedService::from_catalog(&catalog_service("base", 100.0));
        let offer = builder.offer(&[base, beard], &catalog()).unwrap();
        assert_eq!(offer.base.id, "base");
        assert_eq!(offer.candidates.len(), 2);
        assert_eq!(offer.preselected, vec!["beard".to_string()]);
    }

    #[test]
    fn test_offer_needs_candidates_and_settings() {
        let base = SelectedService::from_catalog(&catalog_service("base", 100.0));
        let only_base = vec![ServiceCategory {
            id: "c".into(),
            name_en: "C".into(),
            name_ar: String::new(),
            display_order: 0,
            services: vec![catalog_service("base", 100.0)],
        }];

        let engine = engine(None);
        assert!(PackageBuilder::new(&engine).offer(&[base.clone()], &only_base).is_none());

        let disabled = PackageDiscountEngine::new(None);
        assert!(PackageBuilder::new(&disabled).offer(&[base], &catalog()).is_none());
    }

    #[test]
    fn test_compose_prices_add_ons() {
        let engine = engine(None);
        let composition = PackageBuilder::new(&engine)
            .compose(
                &catalog_service("base", 100.0),
                &[
                    catalog_service("beard", 50.0),
                    catalog_service("wash", 40.0),
                    catalog_service("beard", 50.0),
                ],
            )
            .unwrap();

        assert_eq!(composition.services.len(), 3);
        assert!(composition.services[0].is_base_package_service);
        assert_eq!(composition.services[1].price, 42.0);
        assert_eq!(composition.services[2].price, 34.0);
    }

    #[test]
    fn test_compose_enforces_max_services() {
        let engine = engine(Some(1));
        let err = PackageBuilder::new(&engine)
            .compose(
                &catalog_service("base", 100.0),
                &[catalog_service("beard", 50.0), catalog_service("wash", 40.0)],
            )
            .unwrap_err();

        assert!(matches!(err, BookingError::MaxServicesExceeded { count: 2, max: 1 }));
    }

    #[test]
    fn test_compose_rejects_wrong_base() {
        let engine = engine(None);
        let err = PackageBuilder::new(&engine)
            .compose(&catalog_service("beard", 50.0), &[])
            .unwrap_err();
        assert!(matches!(err, BookingError::MissingBaseService));
    }
}
