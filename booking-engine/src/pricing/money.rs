//! Money helpers
//!
//! Prices are stored as f64 and calculated with rust_decimal.

use rust_decimal::prelude::*;

/// Rounding for aggregated amounts (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `floor(base_price * (1 - percentage / 100))`
///
/// Always floors so the charged price never exceeds the quoted one.
pub fn discounted_price(base_price: f64, percentage: u32) -> f64 {
    let base = to_decimal(base_price);
    let pct = Decimal::from(percentage.min(100));
    let price = (base * (Decimal::ONE_HUNDRED - pct) / Decimal::ONE_HUNDRED).floor();
    price.max(Decimal::ZERO).to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discounted_price_floors() {
        assert_eq!(discounted_price(50.0, 10), 45.0);
        assert_eq!(discounted_price(50.0, 15), 42.0); // 42.5
        assert_eq!(discounted_price(40.0, 15), 34.0);
        assert_eq!(discounted_price(99.0, 33), 66.0); // 66.33
    }

    #[test]
    fn test_discounted_price_bounds() {
        assert_eq!(discounted_price(80.0, 0), 80.0);
        assert_eq!(discounted_price(80.0, 100), 0.0);
        assert_eq!(discounted_price(80.0, 250), 0.0);
    }

    #[test]
    fn test_to_decimal_precision() {
        let sum = to_decimal(0.1) + to_decimal(0.2);
        assert_eq!(to_f64(sum), 0.3);
    }
}
