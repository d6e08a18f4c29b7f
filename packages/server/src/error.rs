use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::ArtifactError;
use common::content::ContentError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `PERMISSION_DENIED`, `NOT_FOUND`, `DUPLICATE_SUBMISSION`,
    /// `NOT_OWNER`, `CONCURRENT_MODIFICATION`, `REMOTE_UNAVAILABLE`,
    /// `REMOTE_REJECTED`, `STORE_FAILURE`, `INTERNAL_ERROR`.
    #[schema(example = "DUPLICATE_SUBMISSION")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "A submission for this problem already exists")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    PermissionDenied,
    NotFound(String),
    /// The acting user already has a submission for the problem.
    DuplicateSubmission,
    /// The acting user does not own the submission.
    NotOwner,
    /// The remote file changed between resolve and write.
    ConcurrentModification(String),
    RemoteUnavailable(String),
    RemoteRejected(String),
    /// Object store or database failure. The detail is logged, not returned.
    StoreFailure(String),
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::DuplicateSubmission => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "DUPLICATE_SUBMISSION",
                    message: "A submission for this problem already exists".into(),
                },
            ),
            AppError::NotOwner => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "NOT_OWNER",
                    message: "Only the author can modify this submission".into(),
                },
            ),
            AppError::ConcurrentModification(path) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "CONCURRENT_MODIFICATION",
                    message: format!("'{path}' was changed concurrently; resubmit to retry"),
                },
            ),
            AppError::RemoteUnavailable(detail) => {
                tracing::warn!("Remote content store unavailable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorBody {
                        code: "REMOTE_UNAVAILABLE",
                        message: "The remote repository is unavailable".into(),
                    },
                )
            }
            AppError::RemoteRejected(msg) => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    code: "REMOTE_REJECTED",
                    message: msg,
                },
            ),
            AppError::StoreFailure(detail) => {
                tracing::error!("Store failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "STORE_FAILURE",
                        message: "Failed to persist the submission".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::StoreFailure(err.to_string())
    }
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::RemoteUnavailable(detail) => AppError::RemoteUnavailable(detail),
            ContentError::RemoteRejected { status, message } => {
                AppError::RemoteRejected(format!("remote repository returned {status}: {message}"))
            }
            ContentError::ConcurrentModification { path } => AppError::ConcurrentModification(path),
        }
    }
}

impl From<ArtifactError> for AppError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Content(e) => e.into(),
            ArtifactError::Storage(e) => AppError::StoreFailure(e.to_string()),
            ArtifactError::Document(e) => AppError::Internal(e.to_string()),
        }
    }
}
