//! Mapping of service errors onto HTTP responses.

use crate::attachment::ports::ObjectStoreError;
use crate::attachment::services::AttachmentError;
use crate::finding::ports::FindingRepositoryError;
use crate::finding::services::RemediationError;
use crate::reference::ReferenceConfigError;
use crate::use_case::ports::UseCaseRepositoryError;
use crate::use_case::services::UseCaseReviewError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Error returned by every handler.
///
/// Rendered as `{"error": "<message>"}` with a status derived from the
/// wrapped error.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Use-case review failure.
    #[error(transparent)]
    Review(#[from] UseCaseReviewError),
    /// Finding failure.
    #[error(transparent)]
    Remediation(#[from] RemediationError),
    /// Attachment failure.
    #[error(transparent)]
    Attachment(#[from] AttachmentError),
    /// Reference configuration could not be served.
    #[error(transparent)]
    Reference(#[from] ReferenceConfigError),
    /// The request itself is malformed.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    /// Creates an [`ApiError::BadRequest`].
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Review(err) => review_status(err),
            Self::Remediation(err) => remediation_status(err),
            Self::Attachment(err) => attachment_status(err),
            Self::Reference(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

const fn review_status(err: &UseCaseReviewError) -> StatusCode {
    match err {
        UseCaseReviewError::NotFound(_) => StatusCode::NOT_FOUND,
        UseCaseReviewError::Domain(_) => StatusCode::BAD_REQUEST,
        UseCaseReviewError::Repository(repo) => use_case_repository_status(repo),
    }
}

const fn use_case_repository_status(err: &UseCaseRepositoryError) -> StatusCode {
    match err {
        UseCaseRepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        UseCaseRepositoryError::StatusConflict { .. }
        | UseCaseRepositoryError::DuplicateUseCase(_) => StatusCode::CONFLICT,
        UseCaseRepositoryError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

const fn remediation_status(err: &RemediationError) -> StatusCode {
    match err {
        RemediationError::NotFound(_)
        | RemediationError::Repository(FindingRepositoryError::NotFound(_)) => {
            StatusCode::NOT_FOUND
        }
        RemediationError::Domain(_)
        | RemediationError::Repository(FindingRepositoryError::AlreadyRemediated(_)) => {
            StatusCode::BAD_REQUEST
        }
        RemediationError::Repository(FindingRepositoryError::DuplicateFinding(_)) => {
            StatusCode::CONFLICT
        }
        RemediationError::Repository(FindingRepositoryError::Persistence(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

const fn attachment_status(err: &AttachmentError) -> StatusCode {
    match err {
        AttachmentError::UseCaseNotFound(_)
        | AttachmentError::AttachmentNotFound(_)
        | AttachmentError::Store(ObjectStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        AttachmentError::InvalidFileName(_) | AttachmentError::Rejected(_) => {
            StatusCode::BAD_REQUEST
        }
        AttachmentError::UseCases(repo) => use_case_repository_status(repo),
        AttachmentError::Store(ObjectStoreError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
