use crate::models::buddy::GeoPoint;

const EARTH_RADIUS_MILES: f64 = 3_959.0;
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// The two units the app measures in: miles for assignment eligibility and
/// earnings, meters for turn-by-turn navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Miles,
    Meters,
}

impl DistanceUnit {
    fn earth_radius(self) -> f64 {
        match self {
            DistanceUnit::Miles => EARTH_RADIUS_MILES,
            DistanceUnit::Meters => EARTH_RADIUS_METERS,
        }
    }
}

/// Great-circle distance between two points, in the requested unit.
pub fn haversine(a: &GeoPoint, b: &GeoPoint, unit: DistanceUnit) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lng = (b.lng - a.lng).to_radians();

    let sin_lat = (delta_lat / 2.0).sin();
    let sin_lng = (delta_lng / 2.0).sin();

    let haversine = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
    let central_angle = 2.0 * haversine.sqrt().asin();

    unit.earth_radius() * central_angle
}

pub fn haversine_miles(a: &GeoPoint, b: &GeoPoint) -> f64 {
    haversine(a, b, DistanceUnit::Miles)
}
