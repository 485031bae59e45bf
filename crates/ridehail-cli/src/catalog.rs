//! Bookable ride tiers.

use ridehail_core::RideOption;

/// Tier booked when none is named.
pub const DEFAULT_TIER: &str = "economy";

/// Every tier offered on the booking screen, cheapest first.
pub fn ride_options() -> Vec<RideOption> {
    vec![
        RideOption::new("economy", "Economy", 12.99, 15, 4),
        RideOption::new("comfort", "Comfort", 18.50, 15, 4),
        RideOption::new("premium", "Premium", 25.99, 15, 4),
        RideOption::new("xl", "XL", 29.99, 18, 6),
    ]
}

/// Tier with identifier `id`, matched case-insensitively.
pub fn find(id: &str) -> Option<RideOption> {
    ride_options().into_iter().find(|option| option.id.eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tier_exists() {
        assert!(find(DEFAULT_TIER).is_some());
    }

    #[test]
    fn lookup_ignores_case() {
        let xl = find("XL");
        assert_eq!(xl.as_ref().map(|o| o.capacity), Some(6));
        assert_eq!(xl.map(|o| o.estimated_minutes), Some(18));
        assert!(find("limo").is_none());
    }

    #[test]
    fn tiers_sorted_by_price() {
        let prices: Vec<f64> = ride_options().iter().map(|o| o.price).collect();
        assert!(prices.windows(2).all(|pair| pair[0] < pair[1]));
    }
}
