use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::buddy::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Flower,
    Concentrate,
    Edible,
    Other,
}

/// Shared lifecycle for orders and assignments:
/// `Preparing -> SeekingBuddy -> Delivering -> Completed`, with `Cancelled`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentStatus {
    Preparing,
    SeekingBuddy,
    Delivering,
    Completed,
    Cancelled,
}

impl FulfillmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteLocation {
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

impl RouteLocation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.address.trim().is_empty() {
            return Err(AppError::MalformedInput(
                "address cannot be empty".to_string(),
            ));
        }
        self.point().validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
    #[serde(default)]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub thc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub items: Vec<LineItem>,
    pub pickup: RouteLocation,
    pub delivery: RouteLocation,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tip: f64,
    pub total: f64,
    pub status: FulfillmentStatus,
    pub assigned_buddy: Option<Uuid>,
    pub is_mock: bool,
    pub created_at: DateTime<Utc>,
}
