use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::Assignment;
use crate::models::buddy::GeoPoint;
use crate::models::order::{FulfillmentStatus, Order};

/// Everything pushed to connected driver apps. The `type`/`payload` JSON
/// shape matches what the frontend already consumes over its socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DispatchEvent {
    OrderAvailable(Order),
    OrderAssigned(Assignment),
    OrderStatusUpdate {
        assignment_id: Uuid,
        status: FulfillmentStatus,
    },
    EarningsUpdate {
        buddy_id: Uuid,
        amount: f64,
    },
    LocationUpdate {
        buddy_id: Uuid,
        location: GeoPoint,
    },
}
