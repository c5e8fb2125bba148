use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;
use tracing::{error, warn};

/// Every failure a handler can surface to the client.
///
/// The `Display` text is what ends up in the `{"error": ...}` body, so it
/// must never carry database or internal details.
#[derive(Debug, Display, PartialEq)]
pub enum ApiError {
    #[display(fmt = "Unauthorized")]
    Unauthorized,

    #[display(fmt = "Invalid token")]
    InvalidToken,

    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,

    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Carries the resource label, e.g. `Employee` or `Attendance record`.
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),

    #[display(fmt = "Method not allowed")]
    MethodNotAllowed,

    #[display(fmt = "{}", _0)]
    Conflict(String),

    #[display(fmt = "Too many requests")]
    TooManyRequests,

    #[display(fmt = "Internal server error")]
    Internal,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string()
        }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                warn!(error = %e, "Unique constraint violated");
                return ApiError::Conflict("Record already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                warn!(error = %e, "Foreign key constraint violated");
                return ApiError::validation("Referenced employee does not exist");
            }
        }

        error!(error = %e, "Database error");
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn renders_error_body_with_message() {
        let resp = ApiError::NotFound("Attendance record").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, json!({ "error": "Attendance record not found" }));
    }

    #[test]
    fn maps_statuses() {
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::validation("All fields are required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::TooManyRequests.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(ApiError::Internal.to_string(), "Internal server error");
    }

    #[test]
    fn hides_database_detail() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert_eq!(err, ApiError::Internal);
    }
}
