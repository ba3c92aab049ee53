use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{patch, post};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::events::DispatchEvent;
use crate::models::buddy::{Buddy, BuddyStatus, GeoPoint, VehicleInfo};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/buddies", post(register_buddy).get(list_buddies))
        .route("/buddies/:id/status", patch(update_buddy_status))
        .route("/buddies/:id/location", patch(update_buddy_location))
}

#[derive(Deserialize)]
pub struct RegisterBuddyRequest {
    pub name: String,
    pub mmcc_id: String,
    pub rating: f64,
    #[serde(default)]
    pub total_deliveries: u32,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    pub vehicle_info: VehicleInfo,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BuddyStatus,
}

#[derive(Deserialize)]
pub struct UpdateLocationRequest {
    pub location: GeoPoint,
}

async fn register_buddy(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterBuddyRequest>,
) -> Result<Json<Buddy>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("name cannot be empty".to_string()));
    }

    if payload.mmcc_id.trim().is_empty() {
        return Err(AppError::BadRequest("mmcc_id cannot be empty".to_string()));
    }

    if let Some(location) = &payload.location {
        location.validate()?;
    }

    let buddy = Buddy {
        id: Uuid::new_v4(),
        name: payload.name,
        mmcc_id: payload.mmcc_id,
        rating: payload.rating.clamp(0.0, 5.0),
        total_deliveries: payload.total_deliveries,
        status: BuddyStatus::Available,
        location: payload.location,
        current_order: None,
        vehicle_info: payload.vehicle_info,
        updated_at: Utc::now(),
    };

    state.buddies.insert(buddy.id, buddy.clone());
    Ok(Json(buddy))
}

async fn list_buddies(State(state): State<Arc<AppState>>) -> Json<Vec<Buddy>> {
    let buddies = state
        .buddies
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(buddies)
}

async fn update_buddy_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<Json<Buddy>, AppError> {
    let mut buddy = state
        .buddies
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("buddy {} not found", id)))?;

    buddy.status = payload.status;
    buddy.updated_at = Utc::now();

    Ok(Json(buddy.clone()))
}

async fn update_buddy_location(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<Json<Buddy>, AppError> {
    payload.location.validate()?;

    let updated = {
        let mut buddy = state
            .buddies
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("buddy {} not found", id)))?;

        buddy.location = Some(payload.location);
        buddy.updated_at = Utc::now();
        buddy.clone()
    };

    let _ = state.events_tx.send(DispatchEvent::LocationUpdate {
        buddy_id: id,
        location: payload.location,
    });

    Ok(Json(updated))
}
