/// Flat payout per delivery.
pub const BASE_RATE: f64 = 5.00;
pub const PER_MILE_RATE: f64 = 1.50;
pub const PER_ITEM_RATE: f64 = 0.50;
/// Tips pass through to the buddy in full.
pub const TIP_PERCENTAGE: f64 = 1.00;

pub fn calculate_earnings(distance_miles: f64, item_count: usize, tip: f64) -> f64 {
    BASE_RATE
        + (distance_miles * PER_MILE_RATE)
        + (item_count as f64 * PER_ITEM_RATE)
        + (tip * TIP_PERCENTAGE)
}

#[cfg(test)]
mod tests {
    use super::calculate_earnings;

    #[test]
    fn five_miles_two_items_ten_dollar_tip() {
        // 5.00 + 7.50 + 1.00 + 10.00
        let earnings = calculate_earnings(5.0, 2, 10.0);
        assert!((earnings - 23.50).abs() < 1e-9, "got {earnings}");
    }

    #[test]
    fn minimum_delivery_pays_the_base_rate() {
        let earnings = calculate_earnings(0.0, 0, 0.0);
        assert!((earnings - 5.00).abs() < 1e-9);
    }

    #[test]
    fn tip_passes_through_in_full() {
        let untipped = calculate_earnings(3.0, 1, 0.0);
        let tipped = calculate_earnings(3.0, 1, 7.25);
        assert!((tipped - untipped - 7.25).abs() < 1e-9);
    }
}
