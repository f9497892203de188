//! Mapping of history use-case failures to HTTP responses.

use crate::api::dto::MessageResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calc_core::HistoryServiceError;
use log::{error, warn};

pub const MISSING_FIELDS_MESSAGE: &str = "Equation and result are required";
pub const NOT_FOUND_MESSAGE: &str = "Not found";

/// Error response carrying a status and a `{message}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Create rejects every store failure with `400`, not only validation.
    pub fn create_failed(err: HistoryServiceError) -> Self {
        match err {
            HistoryServiceError::InvalidCalculation(_) => {
                Self::bad_request(MISSING_FIELDS_MESSAGE)
            }
            other => Self::bad_request(other.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<HistoryServiceError> for ApiError {
    fn from(value: HistoryServiceError) -> Self {
        match value {
            HistoryServiceError::InvalidCalculation(_) => {
                Self::bad_request(MISSING_FIELDS_MESSAGE)
            }
            HistoryServiceError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
            }
            HistoryServiceError::Repo(err) => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                "event=http_error module=api status={} message={}",
                self.status.as_u16(),
                self.message
            );
        } else {
            warn!(
                "event=http_error module=api status={} message={}",
                self.status.as_u16(),
                self.message
            );
        }
        (self.status, Json(MessageResponse::new(self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, MISSING_FIELDS_MESSAGE, NOT_FOUND_MESSAGE};
    use axum::http::StatusCode;
    use calc_core::db::DbError;
    use calc_core::{CalculationValidationError, HistoryServiceError, RepoError};

    #[test]
    fn service_errors_map_to_status_codes() {
        let invalid = ApiError::from(HistoryServiceError::InvalidCalculation(
            CalculationValidationError::EmptyResult,
        ));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.message(), MISSING_FIELDS_MESSAGE);

        let missing = ApiError::from(HistoryServiceError::NotFound("abc".to_string()));
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(missing.message(), NOT_FOUND_MESSAGE);

        let db = ApiError::from(HistoryServiceError::Repo(RepoError::InvalidData(
            "bad row".to_string(),
        )));
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(db.message().contains("bad row"));
    }

    #[test]
    fn create_failures_are_bad_requests() {
        let err = ApiError::create_failed(HistoryServiceError::Repo(RepoError::Db(
            DbError::UnsupportedSchemaVersion {
                db_version: 9,
                latest_supported: 1,
            },
        )));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message().contains("schema version"));
    }
}
