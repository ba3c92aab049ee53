use crate::models::assignment::ScoreBreakdown;
use crate::models::buddy::Buddy;

/// Buddies farther than this from the pickup are never considered.
pub const MAX_ASSIGNMENT_DISTANCE_MILES: f64 = 10.0;

/// Buddies rated below this are never considered.
pub const MIN_RATING: f64 = 4.0;

const MAX_RATING: f64 = 5.0;

const DISTANCE_WEIGHT: f64 = 0.40;
const RATING_WEIGHT: f64 = 0.30;
const EXPERIENCE_WEIGHT: f64 = 0.20;
const WORKLOAD_WEIGHT: f64 = 0.10;

/// Suitability score for one candidate; higher is better. The eligibility
/// filter keeps distance and rating inside their normalization ranges, so
/// in practice every sub-score lands in [0, 1].
pub fn compute_score(
    buddy: &Buddy,
    distance_miles: f64,
    max_deliveries: u32,
) -> (f64, ScoreBreakdown) {
    let breakdown = ScoreBreakdown {
        distance_score: distance_score(distance_miles),
        rating_score: rating_score(buddy.rating),
        experience_score: experience_score(buddy.total_deliveries, max_deliveries),
        workload_score: workload_score(buddy.current_order.is_some()),
    };

    let score = weighted_score(&breakdown);
    (score, breakdown)
}

pub fn weighted_score(breakdown: &ScoreBreakdown) -> f64 {
    (breakdown.distance_score * DISTANCE_WEIGHT)
        + (breakdown.rating_score * RATING_WEIGHT)
        + (breakdown.experience_score * EXPERIENCE_WEIGHT)
        + (breakdown.workload_score * WORKLOAD_WEIGHT)
}

fn distance_score(distance_miles: f64) -> f64 {
    1.0 - (distance_miles / MAX_ASSIGNMENT_DISTANCE_MILES)
}

fn rating_score(rating: f64) -> f64 {
    (rating - MIN_RATING) / (MAX_RATING - MIN_RATING)
}

fn experience_score(total_deliveries: u32, max_deliveries: u32) -> f64 {
    // All candidates at zero lifetime deliveries would divide by zero.
    if max_deliveries == 0 {
        return 0.0;
    }

    total_deliveries as f64 / max_deliveries as f64
}

fn workload_score(has_current_order: bool) -> f64 {
    if has_current_order { 0.0 } else { 1.0 }
}
