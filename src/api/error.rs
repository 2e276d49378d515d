use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::catalog::FieldViolation;
use crate::services::CatalogError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    InvalidReference(String),

    ValidationError {
        message: String,
        violations: Vec<FieldViolation>,
    },

    StorageError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InvalidReference(msg) => write!(f, "Invalid reference: {}", msg),
            ApiError::ValidationError { message, .. } => {
                write!(f, "Validation error: {}", message)
            }
            ApiError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::<()>::error(msg)),
            ApiError::InvalidReference(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiResponse::<()>::error(msg),
            ),
            ApiError::ValidationError {
                message,
                violations,
            } => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::rejected(message, violations),
            ),
            ApiError::StorageError(msg) => {
                tracing::error!("Storage error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("A storage error occurred"),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::<()>::error("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            CatalogError::InvalidReference { .. } => ApiError::InvalidReference(err.to_string()),
            CatalogError::ValidationFailed(violations) => ApiError::ValidationError {
                message: "Request failed validation".to_string(),
                violations,
            },
            CatalogError::Storage(msg) => ApiError::StorageError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: msg.into(),
            violations: Vec::new(),
        }
    }

    /// Validation error pinned to a single field.
    pub fn field(field: &str, msg: impl Into<String>) -> Self {
        let message = msg.into();
        ApiError::ValidationError {
            message: message.clone(),
            violations: vec![FieldViolation::new(field, message)],
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntityKind;

    #[test]
    fn catalog_errors_map_to_distinct_statuses() {
        let cases = [
            (
                CatalogError::not_found(EntityKind::Movie, 1),
                StatusCode::NOT_FOUND,
            ),
            (
                CatalogError::InvalidReference {
                    kind: EntityKind::Actor,
                    ids: vec![9],
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                CatalogError::ValidationFailed(vec![FieldViolation::new("title", "required")]),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::Storage("disk full".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn display_keeps_storage_detail_for_logs() {
        let err = ApiError::from(CatalogError::Storage("disk full".to_string()));
        assert_eq!(err.to_string(), "Storage error: disk full");
    }
}
