//! Use-case submission and review handlers.

use super::extract::{ApiJson, ApiQuery, OptionalJson};
use super::{ApiError, AppState, RequestActor, parse_id};
use crate::presentation::{StatusBadge, use_case_badge};
use crate::use_case::domain::{AuditEvent, RiskTier, UseCase, UseCaseId, UseCaseStatus};
use crate::use_case::services::{RecordDecisionRequest, SendBackRequest, SubmitUseCaseRequest};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Use case as returned to clients, with its display badge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UseCaseView {
    #[serde(flatten)]
    use_case: UseCase,
    status_badge: StatusBadge,
}

impl From<UseCase> for UseCaseView {
    fn from(use_case: UseCase) -> Self {
        let status_badge = use_case_badge(use_case.status());
        Self {
            use_case,
            status_badge,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitBody {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct DecisionBody {
    tier: String,
    rationale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SendBackBody {
    notes: Option<String>,
}

fn use_case_id(raw: &str) -> Result<UseCaseId, ApiError> {
    parse_id("use case", raw).map(UseCaseId::from_uuid)
}

pub(super) async fn submit(
    State(state): State<AppState>,
    actor: RequestActor,
    ApiJson(body): ApiJson<SubmitBody>,
) -> Result<(StatusCode, Json<UseCaseView>), ApiError> {
    let mut request = SubmitUseCaseRequest::new(body.title);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    let use_case = state
        .reviews
        .submit(request, &actor.or_model_owner())
        .await?;
    Ok((StatusCode::CREATED, Json(use_case.into())))
}

pub(super) async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<UseCaseView>>, ApiError> {
    let status = query
        .status
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| UseCaseStatus::try_from(raw.as_str()))
        .transpose()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let use_cases = state.reviews.list(status).await?;
    Ok(Json(use_cases.into_iter().map(UseCaseView::from).collect()))
}

pub(super) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UseCaseView>, ApiError> {
    let use_case = state.reviews.get(use_case_id(&id)?).await?;
    Ok(Json(use_case.into()))
}

pub(super) async fn audit_trail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AuditEvent>>, ApiError> {
    Ok(Json(state.reviews.audit_trail(use_case_id(&id)?).await?))
}

pub(super) async fn begin_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: RequestActor,
) -> Result<Json<UseCaseView>, ApiError> {
    let use_case = state
        .reviews
        .begin_review(use_case_id(&id)?, &actor.or_reviewer())
        .await?;
    Ok(Json(use_case.into()))
}

pub(super) async fn record_decision(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: RequestActor,
    ApiJson(body): ApiJson<DecisionBody>,
) -> Result<Json<UseCaseView>, ApiError> {
    let tier = RiskTier::try_from(body.tier.as_str())
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let mut request = RecordDecisionRequest::new(use_case_id(&id)?, tier);
    if let Some(rationale) = body.rationale {
        request = request.with_rationale(rationale);
    }
    let use_case = state
        .reviews
        .record_decision(request, &actor.or_reviewer())
        .await?;
    Ok(Json(use_case.into()))
}

pub(super) async fn approve(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: RequestActor,
) -> Result<Json<UseCaseView>, ApiError> {
    let use_case = state
        .reviews
        .approve(use_case_id(&id)?, &actor.or_reviewer())
        .await?;
    Ok(Json(use_case.into()))
}

/// A missing body means no notes; a malformed one is rejected.
pub(super) async fn send_back(
    State(state): State<AppState>,
    Path(id): Path<String>,
    actor: RequestActor,
    OptionalJson(body): OptionalJson<SendBackBody>,
) -> Result<Json<UseCaseView>, ApiError> {
    let notes = body.and_then(|payload| payload.notes);
    let mut request = SendBackRequest::new(use_case_id(&id)?);
    if let Some(text) = notes {
        request = request.with_notes(text);
    }
    let use_case = state
        .reviews
        .send_back(request, &actor.or_reviewer())
        .await?;
    Ok(Json(use_case.into()))
}
