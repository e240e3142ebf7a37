use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{
    DbErr,
    validation::{FieldErrors, WriteError},
};
use reports::ReportError;
use thiserror::Error;
use utils_core::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("Invalid payload: {0}")]
    Validation(FieldErrors),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<WriteError> for ApiError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Database(db_err) => ApiError::Database(db_err),
            WriteError::Invalid(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Report(err) => match err {
                ReportError::Database(DbErr::RecordNotFound(_)) => {
                    (StatusCode::NOT_FOUND, "ReportError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ReportError"),
            },
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        match self {
            ApiError::Validation(errors) => {
                let response: ApiResponse<(), FieldErrors> =
                    ApiResponse::error_with_message_and_data("Validation failed", errors);
                (status_code, Json(response)).into_response()
            }
            other => {
                let error_message = match &other {
                    ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg.clone(),
                    _ => format!("{}: {}", error_type, other),
                };
                let response = ApiResponse::<()>::error(&error_message);
                (status_code, Json(response)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    #[test]
    fn api_error_maps_to_expected_http_statuses() {
        assert_eq!(
            ApiError::BadRequest("bad".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".to_string())
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbErr::RecordNotFound("Ticket not found".to_string()))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DbErr::Custom("disk full".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn validation_errors_carry_field_messages() {
        let err = ApiError::from(WriteError::Invalid(FieldErrors::single(
            "title",
            "This field may not be blank.",
        )));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(
            json["error_data"],
            serde_json::json!({ "title": ["This field may not be blank."] })
        );
    }
}
