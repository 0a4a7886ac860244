//! Validation finding handlers.

use super::extract::ApiJson;
use super::{ApiError, AppState, RequestActor, parse_id};
use crate::finding::domain::{FindingId, FindingSeverity, ModelId, ValidationFinding, ValidationId};
use crate::finding::services::{RecordFindingRequest, RemediateFindingRequest};
use crate::identity::Actor;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct RecordBody {
    title: String,
    severity: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RemediateBody {
    #[serde(default)]
    remediation_notes: String,
    remediated_by: Option<String>,
}

fn validation_path(model: &str, validation: &str) -> Result<(ModelId, ValidationId), ApiError> {
    Ok((
        ModelId::from_uuid(parse_id("model", model)?),
        ValidationId::from_uuid(parse_id("validation", validation)?),
    ))
}

pub(super) async fn record(
    State(state): State<AppState>,
    Path((model, validation)): Path<(String, String)>,
    ApiJson(body): ApiJson<RecordBody>,
) -> Result<(StatusCode, Json<ValidationFinding>), ApiError> {
    let (model_id, validation_id) = validation_path(&model, &validation)?;
    let severity = FindingSeverity::try_from(body.severity.as_str())
        .map_err(|err| ApiError::bad_request(err.to_string()))?;
    let mut request = RecordFindingRequest::new(model_id, validation_id, body.title, severity);
    if let Some(description) = body.description {
        request = request.with_description(description);
    }
    let finding = state.findings.record_finding(request).await?;
    Ok((StatusCode::CREATED, Json(finding)))
}

pub(super) async fn list(
    State(state): State<AppState>,
    Path((model, validation)): Path<(String, String)>,
) -> Result<Json<Vec<ValidationFinding>>, ApiError> {
    let (model_id, validation_id) = validation_path(&model, &validation)?;
    Ok(Json(state.findings.list(model_id, validation_id).await?))
}

/// `remediatedBy` in the body wins over the `X-Actor` header.
pub(super) async fn remediate(
    State(state): State<AppState>,
    Path((model, validation, finding)): Path<(String, String, String)>,
    header_actor: RequestActor,
    ApiJson(body): ApiJson<RemediateBody>,
) -> Result<Json<ValidationFinding>, ApiError> {
    let (model_id, validation_id) = validation_path(&model, &validation)?;
    let finding_id = FindingId::from_uuid(parse_id("finding", &finding)?);
    let actor = match body.remediated_by.filter(|name| !name.trim().is_empty()) {
        Some(name) => Actor::new(name).map_err(|err| ApiError::bad_request(err.to_string()))?,
        None => header_actor.or_model_owner(),
    };
    let request =
        RemediateFindingRequest::new(model_id, validation_id, finding_id, body.remediation_notes);
    Ok(Json(state.findings.remediate(request, &actor).await?))
}
