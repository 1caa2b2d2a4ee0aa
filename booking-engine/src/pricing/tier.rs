//! Discount Tier Resolver
//!
//! The only place where the 1 / 2 / 3+ add-on boundaries live.

use shared::models::DiscountTiers;

/// Discount percentage for the given number of package add-ons
///
/// - 0 add-ons: 0
/// - 1 add-on: `one_service`
/// - 2 add-ons: `two_services`
/// - 3 or more: `three_or_more`
pub fn resolve_discount_percentage(add_on_count: usize, tiers: &DiscountTiers) -> u32 {
    match add_on_count {
        0 => 0,
        1 => tiers.one_service,
        2 => tiers.two_services,
        _ => tiers.three_or_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_every_tier() {
        let tiers = DiscountTiers::new(10, 15, 20);
        let expected = [0, 10, 15, 20, 20, 20, 20];
        for (count, pct) in expected.iter().enumerate() {
            assert_eq!(resolve_discount_percentage(count, &tiers), *pct, "count={}", count);
        }
        assert_eq!(resolve_discount_percentage(1_000, &tiers), 20);
    }

    #[test]
    fn test_resolve_does_not_reorder_tiers() {
        // Tier order is taken as configured; normalization happens at the settings boundary
        let tiers = DiscountTiers::new(20, 10, 5);
        assert_eq!(resolve_discount_percentage(1, &tiers), 20);
        assert_eq!(resolve_discount_percentage(3, &tiers), 5);
    }
}
