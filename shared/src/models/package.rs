//! Package Discount Settings

use serde::{Deserialize, Serialize};

/// Discount percentages keyed by add-on count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscountTiers {
    /// Percentage with exactly one add-on
    pub one_service: u32,
    /// Percentage with exactly two add-ons
    pub two_services: u32,
    /// Percentage with three or more add-ons
    pub three_or_more: u32,
}

impl DiscountTiers {
    pub fn new(one_service: u32, two_services: u32, three_or_more: u32) -> Self {
        Self {
            one_service,
            two_services,
            three_or_more,
        }
    }

    /// Whether percentages never decrease as the add-on count grows
    pub fn is_monotonic(&self) -> bool {
        self.one_service <= self.two_services && self.two_services <= self.three_or_more
    }

    /// Clamp to 0-100 and lift each tier to at least the previous one
    pub fn normalized(&self) -> Self {
        let one_service = self.one_service.min(100);
        let two_services = self.two_services.min(100).max(one_service);
        let three_or_more = self.three_or_more.min(100).max(two_services);
        Self {
            one_service,
            two_services,
            three_or_more,
        }
    }
}

/// Package mode configuration
///
/// When the settings provider returns `None`, package mode is disabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSettings {
    /// Catalog id of the anchor service
    pub base_service_id: String,
    pub discount_tiers: DiscountTiers,
    /// Maximum number of add-ons in one package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_services: Option<u32>,
}

impl PackageSettings {
    pub fn new(base_service_id: impl Into<String>, discount_tiers: DiscountTiers) -> Self {
        Self {
            base_service_id: base_service_id.into(),
            discount_tiers,
            max_services: None,
        }
    }

    pub fn with_max_services(mut self, max_services: u32) -> Self {
        self.max_services = Some(max_services);
        self
    }

    /// Settings boundary check: returns settings whose tiers are in range
    /// and non-decreasing. Logs a warning when anything had to change.
    pub fn normalized(mut self) -> Self {
        let tiers = self.discount_tiers.normalized();
        if tiers != self.discount_tiers {
            tracing::warn!(
                base_service_id = %self.base_service_id,
                configured = ?self.discount_tiers,
                effective = ?tiers,
                "Package discount tiers adjusted to be monotonic"
            );
            self.discount_tiers = tiers;
        }
        self
    }

    pub fn is_base_service(&self, service_id: &str) -> bool {
        self.base_service_id == service_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_tiers_untouched() {
        let tiers = DiscountTiers::new(10, 15, 20);
        assert!(tiers.is_monotonic());
        assert_eq!(tiers.normalized(), tiers);
    }

    #[test]
    fn test_decreasing_tiers_are_lifted() {
        let tiers = DiscountTiers::new(20, 10, 5);
        assert!(!tiers.is_monotonic());
        assert_eq!(tiers.normalized(), DiscountTiers::new(20, 20, 20));
    }

    #[test]
    fn test_tiers_clamped_to_hundred() {
        let tiers = DiscountTiers::new(10, 150, 300);
        assert_eq!(tiers.normalized(), DiscountTiers::new(10, 100, 100));
    }

    #[test]
    fn test_settings_normalized() {
        let settings = PackageSettings::new("cut", DiscountTiers::new(15, 10, 20))
            .with_max_services(3)
            .normalized();
        assert_eq!(settings.discount_tiers, DiscountTiers::new(15, 15, 20));
        assert_eq!(settings.max_services, Some(3));
        assert!(settings.is_base_service("cut"));
    }
}
