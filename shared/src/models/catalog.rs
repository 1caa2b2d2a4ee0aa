//! Service Catalog Models

use serde::{Deserialize, Serialize};

/// Bookable service as returned by the catalog provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogService {
    pub id: String,
    pub name_en: String,
    pub name_ar: String,
    pub price: f64,
    /// Duration in minutes
    pub duration: u32,
    #[serde(default)]
    pub display_order: i32,
}

/// Catalog category with its services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: String,
    pub name_en: String,
    pub name_ar: String,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub services: Vec<CatalogService>,
}

/// Sort categories and the services inside them by `display_order`
///
/// Stable sort: equal display orders keep the provider's order.
pub fn sort_catalog(categories: &mut [ServiceCategory]) {
    categories.sort_by_key(|c| c.display_order);
    for category in categories.iter_mut() {
        category.services.sort_by_key(|s| s.display_order);
    }
}

/// Find a service anywhere in the catalog
pub fn find_service<'a>(categories: &'a [ServiceCategory], id: &str) -> Option<&'a CatalogService> {
    categories
        .iter()
        .flat_map(|c| c.services.iter())
        .find(|s| s.id == id)
}
