use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::engine::earnings::calculate_earnings;
use crate::engine::queue::enqueue_order;
use crate::engine::scoring::{MAX_ASSIGNMENT_DISTANCE_MILES, MIN_RATING, compute_score};
use crate::error::AppError;
use crate::events::DispatchEvent;
use crate::geo::haversine_miles;
use crate::models::assignment::{
    Assignment, AssignmentItem, DispensaryInfo, Route, ScoreBreakdown,
};
use crate::models::buddy::{Buddy, BuddyStatus};
use crate::models::order::{FulfillmentStatus, ItemKind, LineItem, Order};
use crate::models::patient::{Patient, Possession};
use crate::state::AppState;

const REQUEUE_DELAY_MS: u64 = 250;
/// 30 mph speed assumption for the duration estimate.
const MINUTES_PER_MILE: f64 = 2.0;
/// Applied when an order line does not label its THC content.
const DEFAULT_THC: &str = "20%";

#[derive(Debug, Clone)]
pub struct BuddySelection {
    pub buddy: Buddy,
    pub distance_miles: f64,
    pub score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Picks the best eligible buddy for an order.
///
/// Eligibility: status Available, a known location, rating >= 4.0, and at
/// most 10 miles from the pickup. Among eligible candidates the highest
/// score wins; equal scores resolve by ascending buddy id, so the outcome
/// never depends on iteration order.
pub fn select_buddy(order: &Order, candidates: &[Buddy]) -> Result<BuddySelection, AppError> {
    let pickup = order.pickup.point();

    // Experience normalizer spans the whole candidate list, eligible or not.
    let max_deliveries = candidates
        .iter()
        .map(|b| b.total_deliveries)
        .max()
        .unwrap_or(0);

    let mut best: Option<BuddySelection> = None;

    for buddy in candidates {
        if buddy.status != BuddyStatus::Available || buddy.rating < MIN_RATING {
            continue;
        }

        let Some(location) = buddy.location else {
            continue;
        };

        let distance_miles = haversine_miles(&location, &pickup);
        if distance_miles > MAX_ASSIGNMENT_DISTANCE_MILES {
            continue;
        }

        let (score, breakdown) = compute_score(buddy, distance_miles, max_deliveries);

        let beats_best = match &best {
            None => true,
            Some(current) => {
                score > current.score || (score == current.score && buddy.id < current.buddy.id)
            }
        };

        if beats_best {
            best = Some(BuddySelection {
                buddy: buddy.clone(),
                distance_miles,
                score,
                breakdown,
            });
        }
    }

    best.ok_or(AppError::NoEligibleBuddies)
}

/// Builds the initial assignment record for a selected buddy.
pub fn build_assignment(order: &Order, selection: &BuddySelection) -> Assignment {
    let route = Route {
        pickup: order.pickup.clone(),
        delivery: order.delivery.clone(),
        estimated_distance: selection.distance_miles,
        estimated_duration: (selection.distance_miles * MINUTES_PER_MILE).ceil() as u32,
    };

    Assignment {
        id: Uuid::new_v4(),
        order_id: order.id,
        buddy_id: selection.buddy.id,
        status: FulfillmentStatus::SeekingBuddy,
        score: selection.score,
        score_breakdown: selection.breakdown.clone(),
        patient: patient_snapshot(order.id),
        dispensary: DispensaryInfo {
            name: order.pickup.address.clone(),
            license: dispensary_license(),
            address: order.pickup.address.clone(),
            lat: order.pickup.lat,
            lng: order.pickup.lng,
        },
        delivery: order.delivery.clone(),
        items: assignment_items(&order.items),
        route,
        earnings: calculate_earnings(selection.distance_miles, order.items.len(), order.tip),
        assigned_at: Utc::now(),
        accepted_at: None,
        picked_up_at: None,
        delivered_at: None,
        cancelled_at: None,
        cancel_reason: None,
    }
}

// Placeholder until patient records exist; the MMCC id is derived from the
// order so the driver app has something stable to display.
fn patient_snapshot(order_id: Uuid) -> Patient {
    let key = order_id.simple().to_string();
    let suffix = &key[key.len() - 6..];

    Patient {
        name: "Patient Name".to_string(),
        mmcc_id: format!("PT-{suffix}"),
        current_possession: Possession::default(),
    }
}

fn dispensary_license() -> String {
    const CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let code: String = (0..6)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect();
    format!("D-{code}")
}

fn assignment_items(items: &[LineItem]) -> Vec<AssignmentItem> {
    items
        .iter()
        .map(|item| AssignmentItem {
            name: item.name.clone(),
            kind: item.kind.unwrap_or(ItemKind::Flower),
            quantity: format!("{}g", item.quantity),
            thc: item.thc.clone().unwrap_or_else(|| DEFAULT_THC.to_string()),
        })
        .collect()
}

pub async fn run_assignment_engine(state: Arc<AppState>, mut order_rx: mpsc::Receiver<Order>) {
    info!("assignment engine started");

    while let Some(order) = order_rx.recv().await {
        state.metrics.orders_in_queue.dec();

        let start = Instant::now();
        match process_order(state.clone(), order).await {
            Ok(()) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .assignment_latency_seconds
                    .with_label_values(&["success"])
                    .observe(elapsed);
                state
                    .metrics
                    .assignments_total
                    .with_label_values(&["success"])
                    .inc();
            }
            Err(err) => {
                let elapsed = start.elapsed().as_secs_f64();
                state
                    .metrics
                    .assignment_latency_seconds
                    .with_label_values(&["error"])
                    .observe(elapsed);
                state
                    .metrics
                    .assignments_total
                    .with_label_values(&["error"])
                    .inc();
                error!(error = %err, "failed to process order");
            }
        }
    }

    warn!("assignment engine stopped: queue channel closed");
}

async fn process_order(state: Arc<AppState>, order: Order) -> Result<(), AppError> {
    let candidates: Vec<Buddy> = state
        .buddies
        .iter()
        .map(|entry| entry.value().clone())
        .collect();

    let selection = match select_buddy(&order, &candidates) {
        Ok(selection) => selection,
        Err(AppError::NoEligibleBuddies) => {
            warn!(order_id = %order.id, "no eligible buddies; re-queueing order");
            sleep(Duration::from_millis(REQUEUE_DELAY_MS)).await;
            enqueue_order(&state, order).await?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    let assignment = build_assignment(&order, &selection);

    let mut updated_order = order.clone();
    updated_order.status = FulfillmentStatus::SeekingBuddy;
    updated_order.assigned_buddy = Some(selection.buddy.id);
    state.orders.insert(updated_order.id, updated_order.clone());

    if let Some(mut buddy) = state.buddies.get_mut(&selection.buddy.id) {
        buddy.current_order = Some(updated_order.id);
        buddy.updated_at = Utc::now();
    }

    state.assignments.insert(assignment.id, assignment.clone());
    let _ = state
        .events_tx
        .send(DispatchEvent::OrderAssigned(assignment.clone()));

    info!(
        order_id = %updated_order.id,
        buddy_id = %selection.buddy.id,
        score = selection.score,
        distance_miles = selection.distance_miles,
        "order assigned"
    );

    Ok(())
}
