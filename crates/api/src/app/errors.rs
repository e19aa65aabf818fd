use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use meridian_auth::AuthzError;
use meridian_core::DomainError;

/// Message returned when required path parameters are missing.
pub const INVALID_REQUEST_PARAMETERS: &str = "Invalid request parameters";

/// Every failure a handler or middleware can surface.
///
/// Domain errors bubble up from services untouched and are mapped here, in
/// one place, to status codes and JSON bodies.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Client input error. `None` produces an empty 400.
    #[error("bad request")]
    BadRequest(Option<String>),

    /// Request body failed model validation.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    pub fn invalid_parameters() -> Self {
        Self::BadRequest(Some(INVALID_REQUEST_PARAMETERS.to_string()))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Domain(e) => match e {
                DomainError::Validation(_) | DomainError::InvalidId(_) => StatusCode::BAD_REQUEST,
                DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                DomainError::Unauthorized => StatusCode::FORBIDDEN,
                DomainError::NotFound(_) => StatusCode::NOT_FOUND,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::InvariantViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthenticated => "unauthenticated",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Domain(e) => match e {
                DomainError::Validation(_) => "validation_error",
                DomainError::InvalidId(_) => "invalid_id",
                DomainError::InvalidCredentials => "invalid_credentials",
                DomainError::Unauthorized => "unauthorized",
                DomainError::NotFound(_) => "not_found",
                DomainError::Conflict(_) => "conflict",
                DomainError::InvariantViolation(_) => "invariant_violation",
                DomainError::Unavailable(_) => "service_unavailable",
            },
        }
    }
}

/// Malformed or mistyped request bodies are client errors with the usual JSON body.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(Some(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::info!(status = status.as_u16(), error = %self, "request rejected");
        }

        match self {
            ApiError::BadRequest(None) => status.into_response(),
            ApiError::BadRequest(Some(msg)) => json_error(status, "bad_request", msg),
            ApiError::Validation(errors) => (
                status,
                axum::Json(json!({
                    "error": "validation_error",
                    "message": errors.join("; "),
                    "errors": errors,
                })),
            )
                .into_response(),
            other => {
                let code = other.code();
                json_error(status, code, other.to_string())
            }
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::validation("x"), StatusCode::BAD_REQUEST),
            (DomainError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DomainError::Unauthorized, StatusCode::FORBIDDEN),
            (DomainError::not_found("country 'ZZ'"), StatusCode::NOT_FOUND),
            (DomainError::conflict("x"), StatusCode::CONFLICT),
            (DomainError::invariant("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn empty_bad_request_has_no_body() {
        let resp = ApiError::BadRequest(None).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get(axum::http::header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn forbidden_comes_from_authz() {
        let err: ApiError = AuthzError::MissingRole("admin".into()).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
