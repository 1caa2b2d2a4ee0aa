//! Selected Service Model

use serde::{Deserialize, Serialize};

use super::catalog::CatalogService;
use super::locale::Locale;

/// A service line item in the current booking selection
///
/// `price` is what the customer is charged right now. `original_price`
/// is only set while a package discount applies and always holds the
/// undiscounted reference (equal to `base_price`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedService {
    pub id: String,
    pub name_en: String,
    pub name_ar: String,
    /// Catalog price, never modified by discounting
    pub base_price: f64,
    /// Duration in minutes
    pub duration: u32,
    /// Currently charged price
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    /// Applied package discount (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<u32>,
    #[serde(default)]
    pub is_base_package_service: bool,
    #[serde(default)]
    pub is_package_add_on: bool,
    #[serde(default)]
    pub is_upsell_item: bool,
}

impl SelectedService {
    /// Create a plain (undiscounted) line item from a catalog service
    pub fn from_catalog(service: &CatalogService) -> Self {
        Self {
            id: service.id.clone(),
            name_en: service.name_en.clone(),
            name_ar: service.name_ar.clone(),
            base_price: service.price,
            duration: service.duration,
            price: service.price,
            original_price: None,
            discount_percentage: None,
            is_base_package_service: false,
            is_package_add_on: false,
            is_upsell_item: false,
        }
    }

    /// Mark this item as coming from the upsell prompt
    ///
    /// The offered price (and any discount the provider quoted) is kept;
    /// only the package role flags are dropped.
    pub fn into_upsell(mut self) -> Self {
        self.is_package_add_on = false;
        self.is_base_package_service = false;
        self.is_upsell_item = true;
        self
    }

    /// Name in the requested locale
    pub fn display_name(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.name_en,
            Locale::Ar if !self.name_ar.is_empty() => &self.name_ar,
            Locale::Ar => &self.name_en,
        }
    }

    /// Drop every package related price adjustment, back to the catalog price
    pub fn clear_package_pricing(&mut self) {
        self.price = self.original_price.unwrap_or(self.base_price);
        self.original_price = None;
        self.discount_percentage = None;
        self.is_package_add_on = false;
        self.is_base_package_service = false;
    }

    /// Amount saved on this line (0 when not discounted)
    pub fn savings(&self) -> f64 {
        self.original_price
            .map(|original| (original - self.price).max(0.0))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(id: &str, price: f64) -> CatalogService {
        CatalogService {
            id: id.to_string(),
            name_en: format!("Service {}", id),
            name_ar: String::new(),
            price,
            duration: 30,
            display_order: 0,
        }
    }

    #[test]
    fn test_from_catalog_is_plain() {
        let item = SelectedService::from_catalog(&catalog("cut", 80.0));
        assert_eq!(item.price, 80.0);
        assert_eq!(item.base_price, 80.0);
        assert!(item.original_price.is_none());
        assert!(!item.is_package_add_on && !item.is_base_package_service && !item.is_upsell_item);
    }

    #[test]
    fn test_display_name_falls_back_to_english() {
        let item = SelectedService::from_catalog(&catalog("cut", 80.0));
        assert_eq!(item.display_name(Locale::Ar), "Service cut");
    }

    #[test]
    fn test_clear_package_pricing_restores_original() {
        let mut item = SelectedService::from_catalog(&catalog("beard", 50.0));
        item.price = 45.0;
        item.original_price = Some(50.0);
        item.discount_percentage = Some(10);
        item.is_package_add_on = true;

        assert_eq!(item.savings(), 5.0);
        item.clear_package_pricing();

        assert_eq!(item.price, 50.0);
        assert!(item.original_price.is_none());
        assert!(item.discount_percentage.is_none());
        assert!(!item.is_package_add_on);
        assert_eq!(item.savings(), 0.0);
    }

    #[test]
    fn test_into_upsell_keeps_offered_price() {
        let mut item = SelectedService::from_catalog(&catalog("oil", 30.0));
        item.price = 25.0;
        item.original_price = Some(30.0);
        item.discount_percentage = Some(17);
        item.is_package_add_on = true;

        let upsell = item.into_upsell();

        assert!(upsell.is_upsell_item);
        assert!(!upsell.is_package_add_on);
        assert_eq!(upsell.price, 25.0);
        assert_eq!(upsell.original_price, Some(30.0));
        assert_eq!(upsell.discount_percentage, Some(17));
    }

    #[test]
    fn test_deserialize_defaults_flags() {
        let json = r#"{"id":"a","name_en":"A","name_ar":"","base_price":10.0,"duration":15,"price":10.0}"#;
        let item: SelectedService = serde_json::from_str(json).unwrap();
        assert!(!item.is_upsell_item);
        assert!(item.discount_percentage.is_none());
    }
}
