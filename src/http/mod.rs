//! JSON-over-HTTP surface.
//!
//! Thin axum handlers that resolve the acting identity, call a service,
//! and map its errors through [`ApiError`]. Routes:
//!
//! - `GET /health`, `GET /config`, `GET /validation-status?nextDue=`
//! - `POST|GET /usecases`, `GET /usecases/:id`, `GET /usecases/:id/audit`
//! - `POST /usecases/:id/{review,decision,approve,send-back}`
//! - `GET /usecases/:id/attachments`, `PUT|DELETE /usecases/:id/attachments/:name`
//! - `POST|GET /inventory/:model/validations/:validation/findings`
//! - `POST /inventory/:model/validations/:validation/findings/:finding/remediate`

mod actor;
mod attachments;
mod error;
mod extract;
mod findings;
mod reference;
mod state;
mod use_cases;

pub use actor::{ACTOR_HEADER, RequestActor};
pub use error::ApiError;
pub use state::{AppState, Attachments, FindingService, ReviewService};
pub use use_cases::UseCaseView;

use crate::attachment::domain::MIB;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

/// Builds the application router.
///
/// The request body limit sits one MiB above the upload policy so that
/// oversized files reach the policy check and get its message rather than
/// a bare 413.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let body_limit = usize::try_from(state.attachments.policy().max_bytes().saturating_add(MIB))
        .unwrap_or(usize::MAX);

    Router::new()
        .route("/health", get(reference::health))
        .route("/config", get(reference::config))
        .route("/validation-status", get(reference::validation_status))
        .route("/usecases", post(use_cases::submit).get(use_cases::list))
        .route("/usecases/:id", get(use_cases::get))
        .route("/usecases/:id/audit", get(use_cases::audit_trail))
        .route("/usecases/:id/review", post(use_cases::begin_review))
        .route("/usecases/:id/decision", post(use_cases::record_decision))
        .route("/usecases/:id/approve", post(use_cases::approve))
        .route("/usecases/:id/send-back", post(use_cases::send_back))
        .route("/usecases/:id/attachments", get(attachments::list))
        .route(
            "/usecases/:id/attachments/:name",
            put(attachments::upload).delete(attachments::delete),
        )
        .route(
            "/inventory/:model/validations/:validation/findings",
            post(findings::record).get(findings::list),
        )
        .route(
            "/inventory/:model/validations/:validation/findings/:finding/remediate",
            post(findings::remediate),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn parse_id(kind: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("invalid {kind} id: {raw}")))
}
