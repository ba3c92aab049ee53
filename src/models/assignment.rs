use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::order::{FulfillmentStatus, ItemKind, RouteLocation};
use crate::models::patient::Patient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub distance_score: f64,
    pub rating_score: f64,
    pub experience_score: f64,
    pub workload_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispensaryInfo {
    pub name: String,
    pub license: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
}

/// Item snapshot carried on an assignment. Quantities keep their display
/// form ("3.5g") and are parsed back out by the compliance checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentItem {
    pub name: String,
    pub kind: ItemKind,
    pub quantity: String,
    pub thc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub pickup: RouteLocation,
    pub delivery: RouteLocation,
    /// Buddy-to-pickup distance in miles, as computed at selection time.
    pub estimated_distance: f64,
    /// Minutes, assuming roughly 30 mph.
    pub estimated_duration: u32,
}

/// Binds one order to one buddy, with denormalized snapshots of everything
/// the driver app needs to run the delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub order_id: Uuid,
    pub buddy_id: Uuid,
    pub status: FulfillmentStatus,
    pub score: f64,
    pub score_breakdown: ScoreBreakdown,
    pub patient: Patient,
    pub dispensary: DispensaryInfo,
    pub delivery: RouteLocation,
    pub items: Vec<AssignmentItem>,
    pub route: Route,
    pub earnings: f64,
    pub assigned_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
}

impl Assignment {
    /// Applies a status transition, stamping the matching timestamp.
    /// Terminal assignments reject every further transition.
    pub fn transition(
        &mut self,
        to: FulfillmentStatus,
        now: DateTime<Utc>,
        reason: Option<String>,
    ) -> Result<(), AppError> {
        use FulfillmentStatus::*;

        match (self.status, to) {
            (SeekingBuddy, Delivering) => {
                self.accepted_at = Some(now);
                self.picked_up_at = Some(now);
            }
            (Delivering, Completed) => {
                self.delivered_at = Some(now);
            }
            (SeekingBuddy | Delivering, Cancelled) => {
                self.cancelled_at = Some(now);
                self.cancel_reason = reason;
            }
            (from, to) => {
                return Err(AppError::Conflict(format!(
                    "invalid assignment transition {from:?} -> {to:?}"
                )));
            }
        }

        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::order::{FulfillmentStatus, RouteLocation};
    use crate::models::patient::{Patient, Possession};

    use super::*;

    fn assignment() -> Assignment {
        let location = RouteLocation {
            address: "1000 W Baltimore St".to_string(),
            lat: 39.2889,
            lng: -76.6369,
        };

        Assignment {
            id: Uuid::from_u128(1),
            order_id: Uuid::from_u128(2),
            buddy_id: Uuid::from_u128(3),
            status: FulfillmentStatus::SeekingBuddy,
            score: 0.9,
            score_breakdown: ScoreBreakdown {
                distance_score: 1.0,
                rating_score: 1.0,
                experience_score: 1.0,
                workload_score: 1.0,
            },
            patient: Patient {
                name: "Patient Name".to_string(),
                mmcc_id: "PT-000001".to_string(),
                current_possession: Possession::default(),
            },
            dispensary: DispensaryInfo {
                name: "StoreHouse Dispensary".to_string(),
                license: "D-abc123".to_string(),
                address: location.address.clone(),
                lat: location.lat,
                lng: location.lng,
            },
            delivery: location.clone(),
            items: Vec::new(),
            route: Route {
                pickup: location.clone(),
                delivery: location,
                estimated_distance: 2.5,
                estimated_duration: 5,
            },
            earnings: 10.0,
            assigned_at: Utc::now(),
            accepted_at: None,
            picked_up_at: None,
            delivered_at: None,
            cancelled_at: None,
            cancel_reason: None,
        }
    }

    #[test]
    fn happy_path_stamps_timestamps() {
        let mut a = assignment();
        let now = Utc::now();

        a.transition(FulfillmentStatus::Delivering, now, None).unwrap();
        assert_eq!(a.status, FulfillmentStatus::Delivering);
        assert_eq!(a.accepted_at, Some(now));
        assert_eq!(a.picked_up_at, Some(now));

        a.transition(FulfillmentStatus::Completed, now, None).unwrap();
        assert_eq!(a.status, FulfillmentStatus::Completed);
        assert_eq!(a.delivered_at, Some(now));
    }

    #[test]
    fn cancel_from_any_non_terminal_state() {
        let mut seeking = assignment();
        seeking
            .transition(
                FulfillmentStatus::Cancelled,
                Utc::now(),
                Some("patient unreachable".to_string()),
            )
            .unwrap();
        assert_eq!(seeking.status, FulfillmentStatus::Cancelled);
        assert_eq!(seeking.cancel_reason.as_deref(), Some("patient unreachable"));
        assert!(seeking.cancelled_at.is_some());

        let mut delivering = assignment();
        delivering
            .transition(FulfillmentStatus::Delivering, Utc::now(), None)
            .unwrap();
        delivering
            .transition(FulfillmentStatus::Cancelled, Utc::now(), None)
            .unwrap();
        assert_eq!(delivering.status, FulfillmentStatus::Cancelled);
    }

    #[test]
    fn terminal_states_are_immutable() {
        let mut a = assignment();
        a.transition(FulfillmentStatus::Delivering, Utc::now(), None)
            .unwrap();
        a.transition(FulfillmentStatus::Completed, Utc::now(), None)
            .unwrap();

        let err = a
            .transition(FulfillmentStatus::Cancelled, Utc::now(), None)
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(a.status, FulfillmentStatus::Completed);
    }

    #[test]
    fn cannot_skip_delivering() {
        let mut a = assignment();
        let err = a
            .transition(FulfillmentStatus::Completed, Utc::now(), None)
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
