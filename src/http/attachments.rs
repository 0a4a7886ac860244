//! Use-case attachment handlers.

use super::{ApiError, AppState, RequestActor, parse_id};
use crate::attachment::domain::StoredObject;
use crate::use_case::domain::UseCaseId;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn use_case_id(raw: &str) -> Result<UseCaseId, ApiError> {
    parse_id("use case", raw).map(UseCaseId::from_uuid)
}

pub(super) async fn list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<StoredObject>>, ApiError> {
    Ok(Json(state.attachments.list(use_case_id(&id)?).await?))
}

pub(super) async fn upload(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    actor: RequestActor,
    headers: HeaderMap,
    contents: Bytes,
) -> Result<(StatusCode, Json<StoredObject>), ApiError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(FALLBACK_CONTENT_TYPE);
    let stored = state
        .attachments
        .upload(
            use_case_id(&id)?,
            &name,
            content_type,
            &contents,
            &actor.or_model_owner(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(super) async fn delete(
    State(state): State<AppState>,
    Path((id, name)): Path<(String, String)>,
    actor: RequestActor,
) -> Result<StatusCode, ApiError> {
    state
        .attachments
        .delete(use_case_id(&id)?, &name, &actor.or_model_owner())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
