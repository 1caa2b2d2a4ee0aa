//! Package Discount Engine
//!
//! Recomputes package pricing for a whole selection. Every call starts from
//! `base_price` and the current add-on count, never from the previous
//! `price`, so applying it to its own output changes nothing.

use rust_decimal::Decimal;
use shared::booking::BookingTotals;
use shared::models::{PackageSettings, SelectedService};

use super::money::{discounted_price, to_decimal, to_f64};
use super::tier::resolve_discount_percentage;

/// Package discount engine for one set of package settings
#[derive(Debug, Clone, Default)]
pub struct PackageDiscountEngine {
    settings: Option<PackageSettings>,
}

impl PackageDiscountEngine {
    /// `None` disables package mode entirely
    pub fn new(settings: Option<PackageSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> Option<&PackageSettings> {
        self.settings.as_ref()
    }

    /// Whether `item` is the anchor service of the package
    pub fn is_base_service(&self, item: &SelectedService) -> bool {
        if item.is_upsell_item {
            return false;
        }
        item.is_base_package_service
            || self
                .settings
                .as_ref()
                .is_some_and(|s| s.is_base_service(&item.id))
    }

    /// Base service, base flag, or discounted add-on
    pub fn is_package_service(&self, item: &SelectedService) -> bool {
        self.settings
            .as_ref()
            .is_some_and(|s| s.is_base_service(&item.id))
            || item.is_base_package_service
            || item.is_package_add_on
    }

    /// Package mode is active while settings exist and the base service is selected
    pub fn is_package_active(&self, services: &[SelectedService]) -> bool {
        self.settings.is_some() && services.iter().any(|s| self.is_base_service(s))
    }

    /// Number of items that count as add-ons (not base, not upsell)
    pub fn add_on_count(&self, services: &[SelectedService]) -> usize {
        if !self.is_package_active(services) {
            return 0;
        }
        services
            .iter()
            .filter(|s| !s.is_upsell_item && !self.is_base_service(s))
            .count()
    }

    /// Current tier percentage for the selection
    pub fn current_percentage(&self, services: &[SelectedService]) -> u32 {
        match &self.settings {
            Some(settings) => {
                resolve_discount_percentage(self.add_on_count(services), &settings.discount_tiers)
            }
            None => 0,
        }
    }

    /// Return a repriced copy of the selection
    ///
    /// - upsell items pass through unchanged
    /// - the base service is charged its catalog price and flagged
    /// - every other item becomes a discounted add-on while the base is
    ///   selected, or a plain item otherwise
    pub fn apply_package_discounts(&self, services: &[SelectedService]) -> Vec<SelectedService> {
        let active = self.is_package_active(services);
        let percentage = self.current_percentage(services);

        services
            .iter()
            .map(|item| {
                if item.is_upsell_item {
                    return item.clone();
                }

                let mut next = item.clone();
                next.price = next.base_price;
                next.original_price = None;
                next.discount_percentage = None;
                next.is_package_add_on = false;
                next.is_base_package_service = false;

                if self.is_base_service(item) {
                    next.is_base_package_service = self.settings.is_some();
                } else if active {
                    next.price = discounted_price(item.base_price, percentage);
                    next.original_price = Some(item.base_price);
                    next.discount_percentage = Some(percentage);
                    next.is_package_add_on = true;
                }
                next
            })
            .collect()
    }

    /// Aggregate amounts for a selection as it is priced now
    pub fn calculate_totals(&self, services: &[SelectedService]) -> BookingTotals {
        let mut subtotal = Decimal::ZERO;
        let mut total = Decimal::ZERO;
        let mut total_duration = 0u32;
        let mut add_on_count = 0usize;
        let mut discount_percentage = 0u32;

        for item in services {
            subtotal += to_decimal(item.original_price.unwrap_or(item.price));
            total += to_decimal(item.price);
            total_duration = total_duration.saturating_add(item.duration);
            if item.is_package_add_on {
                add_on_count += 1;
                discount_percentage = item.discount_percentage.unwrap_or(0);
            }
        }

        BookingTotals {
            subtotal: to_f64(subtotal),
            total: to_f64(total),
            savings: to_f64((subtotal - total).max(Decimal::ZERO)),
            total_duration,
            add_on_count,
            discount_percentage,
        }
    }
}
