use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::engine::queue::enqueue_order;
use crate::error::AppError;
use crate::events::DispatchEvent;
use crate::models::assignment::Assignment;
use crate::models::buddy::BuddyStatus;
use crate::models::order::{FulfillmentStatus, LineItem, Order, RouteLocation};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:id", get(get_order))
        .route("/assignments", get(list_assignments))
        .route("/assignments/:id", get(get_assignment))
        .route("/assignments/:id/status", patch(update_assignment_status))
}

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<LineItem>,
    pub pickup: RouteLocation,
    pub delivery: RouteLocation,
    pub subtotal: f64,
    pub delivery_fee: f64,
    #[serde(default)]
    pub tip: f64,
}

#[derive(Deserialize)]
pub struct UpdateAssignmentStatusRequest {
    pub status: FulfillmentStatus,
    #[serde(default)]
    pub reason: Option<String>,
}

fn validate_money(label: &str, amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::MalformedInput(format!(
            "{label} must be a non-negative amount, got {amount}"
        )));
    }
    Ok(())
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    if payload.items.is_empty() {
        return Err(AppError::BadRequest(
            "order must contain at least one item".to_string(),
        ));
    }

    payload.pickup.validate()?;
    payload.delivery.validate()?;
    validate_money("subtotal", payload.subtotal)?;
    validate_money("delivery_fee", payload.delivery_fee)?;
    validate_money("tip", payload.tip)?;

    let order = Order {
        id: Uuid::new_v4(),
        items: payload.items,
        pickup: payload.pickup,
        delivery: payload.delivery,
        subtotal: payload.subtotal,
        delivery_fee: payload.delivery_fee,
        tip: payload.tip,
        total: payload.subtotal + payload.delivery_fee + payload.tip,
        status: FulfillmentStatus::Preparing,
        assigned_buddy: None,
        // Every order is treated as a mock order until a real storefront
        // backs this service.
        is_mock: true,
        created_at: Utc::now(),
    };

    state.orders.insert(order.id, order.clone());
    let _ = state
        .events_tx
        .send(DispatchEvent::OrderAvailable(order.clone()));
    enqueue_order(&state, order.clone()).await?;

    Ok(Json(order))
}

async fn list_orders(State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    let orders = state
        .orders
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(orders)
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .orders
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("order {} not found", id)))?;

    Ok(Json(order.value().clone()))
}

async fn list_assignments(State(state): State<Arc<AppState>>) -> Json<Vec<Assignment>> {
    let assignments = state
        .assignments
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    Json(assignments)
}

async fn get_assignment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Assignment>, AppError> {
    let assignment = state
        .assignments
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("assignment {} not found", id)))?;

    Ok(Json(assignment.value().clone()))
}

async fn update_assignment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAssignmentStatusRequest>,
) -> Result<Json<Assignment>, AppError> {
    let now = Utc::now();

    let updated = {
        let mut assignment = state
            .assignments
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("assignment {} not found", id)))?;

        assignment.transition(payload.status, now, payload.reason)?;
        assignment.clone()
    };

    apply_side_effects(&state, &updated);

    let _ = state.events_tx.send(DispatchEvent::OrderStatusUpdate {
        assignment_id: updated.id,
        status: updated.status,
    });

    if updated.status == FulfillmentStatus::Completed {
        let _ = state.events_tx.send(DispatchEvent::EarningsUpdate {
            buddy_id: updated.buddy_id,
            amount: updated.earnings,
        });
    }

    Ok(Json(updated))
}

/// Keeps the buddy and order records in step with the assignment lifecycle.
fn apply_side_effects(state: &AppState, assignment: &Assignment) {
    if let Some(mut order) = state.orders.get_mut(&assignment.order_id) {
        order.status = assignment.status;
        if assignment.status == FulfillmentStatus::Cancelled {
            order.assigned_buddy = None;
        }
    }

    if let Some(mut buddy) = state.buddies.get_mut(&assignment.buddy_id) {
        match assignment.status {
            FulfillmentStatus::Delivering => {
                buddy.status = BuddyStatus::Delivering;
            }
            FulfillmentStatus::Completed => {
                buddy.status = BuddyStatus::Available;
                buddy.current_order = None;
                buddy.total_deliveries += 1;
            }
            FulfillmentStatus::Cancelled => {
                buddy.status = BuddyStatus::Available;
                buddy.current_order = None;
            }
            _ => {}
        }
        buddy.updated_at = Utc::now();
    }
}
