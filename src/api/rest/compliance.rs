use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::routing::post;
use serde::Deserialize;

use crate::compliance::{ComplianceCheck, check_compliance};
use crate::error::AppError;
use crate::models::assignment::AssignmentItem;
use crate::models::patient::Patient;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/compliance/check", post(check))
}

#[derive(Deserialize)]
pub struct ComplianceCheckRequest {
    pub patient: Patient,
    pub items: Vec<AssignmentItem>,
}

async fn check(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ComplianceCheckRequest>,
) -> Result<Json<ComplianceCheck>, AppError> {
    let result = check_compliance(&payload.patient.current_possession, &payload.items)?;

    let verdict = if result.is_compliant() {
        "compliant"
    } else {
        "violation"
    };
    state
        .metrics
        .compliance_checks_total
        .with_label_values(&[verdict])
        .inc();

    Ok(Json(result))
}
