use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Rejects non-finite or out-of-range coordinates before they reach the
    /// distance formula, which does not guard against them.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err(AppError::MalformedInput(
                "coordinates must be finite".to_string(),
            ));
        }

        if self.lat.abs() > 90.0 || self.lng.abs() > 180.0 {
            return Err(AppError::MalformedInput(format!(
                "coordinates out of range: ({}, {})",
                self.lat, self.lng
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BuddyStatus {
    Available,
    Delivering,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VehicleType {
    Car,
    Motorcycle,
    Bicycle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub license_plate: Option<String>,
}

/// A delivery driver. Never deleted; `Offline` is the soft-removed state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buddy {
    pub id: Uuid,
    pub name: String,
    pub mmcc_id: String,
    pub rating: f64,
    pub total_deliveries: u32,
    pub status: BuddyStatus,
    pub location: Option<GeoPoint>,
    pub current_order: Option<Uuid>,
    pub vehicle_info: VehicleInfo,
    pub updated_at: DateTime<Utc>,
}
