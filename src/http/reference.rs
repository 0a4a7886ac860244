//! Health, reference configuration and validation-status handlers.

use super::extract::ApiQuery;
use super::{ApiError, AppState};
use crate::presentation::{StatusBadge, ValidationStatus};
use crate::reference::ReferenceConfig;
use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct Health {
    status: &'static str,
}

#[expect(clippy::unused_async, reason = "axum handlers are async")]
pub(super) async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub(super) async fn config(State(state): State<AppState>) -> Result<Json<ReferenceConfig>, ApiError> {
    Ok(Json(state.reference.load().await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValidationStatusQuery {
    next_due: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ValidationStatusView {
    status: ValidationStatus,
    badge: StatusBadge,
    upcoming_window_days: u32,
}

/// Classifies `nextDue` against the configured upcoming window.
pub(super) async fn validation_status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ValidationStatusQuery>,
) -> Result<Json<ValidationStatusView>, ApiError> {
    let window = state.reference.load().await?.validation.upcoming_window_days;
    let status = ValidationStatus::from_due_date(query.next_due, state.clock.utc(), window);
    Ok(Json(ValidationStatusView {
        status,
        badge: status.badge(),
        upcoming_window_days: window,
    }))
}
