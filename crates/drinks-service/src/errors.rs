use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified failure type for the request pipeline.
///
/// Every variant translates to exactly one wire-visible status and message
/// via `IntoResponse`; this is the single point where internal failures
/// become observable. Auth-pipeline variants additionally carry a stable
/// `code` string so clients can distinguish rejection causes without
/// parsing prose.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authorization header is expected")]
    MissingAuthorization,

    #[error("{0}")]
    InvalidAuthHeader(&'static str),

    /// The token's `kid` does not match any trusted signing key.
    #[error("Unable to find the appropriate key")]
    UnknownSigningKey,

    #[error("Token expired")]
    TokenExpired,

    #[error("The access token is invalid")]
    InvalidToken,

    /// Legacy create-path rejection; see the create handler.
    #[error("Incorrect claims. Please, check the audience and issuer")]
    InvalidClaims,

    #[error("Permission not found: {required}")]
    PermissionDenied { required: String },

    #[error("Bad request")]
    BadRequest,

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid method")]
    MethodNotAllowed,

    #[error("Duplicate resource")]
    Conflict,

    #[error("Unprocessable")]
    Unprocessable,

    /// Internal store fault. The carried detail is logged, never sent.
    #[error("Database error: {0}")]
    Database(String),
}

/// Wire envelope: `{success:false, error:<status>, message:<string>}`,
/// plus a machine-readable `code` for auth failures.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl ApiError {
    /// Stable code string for auth-pipeline failures.
    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::MissingAuthorization => Some("authorization_header_missing"),
            ApiError::InvalidAuthHeader(_) | ApiError::UnknownSigningKey => Some("invalid_header"),
            ApiError::TokenExpired => Some("token_expired"),
            ApiError::InvalidToken => Some("invalid_token"),
            ApiError::InvalidClaims => Some("invalid_claims"),
            ApiError::PermissionDenied { .. } => Some("unauthorized"),
            _ => None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingAuthorization
            | ApiError::InvalidAuthHeader(_)
            | ApiError::UnknownSigningKey
            | ApiError::TokenExpired
            | ApiError::InvalidToken
            | ApiError::InvalidClaims => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied { .. } => StatusCode::FORBIDDEN,
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wire-safe message. Internal detail stays out of the response body.
    fn message(&self) -> String {
        match self {
            ApiError::BadRequest => "bad request".to_string(),
            ApiError::NotFound => "resource not found".to_string(),
            ApiError::MethodNotAllowed => "invalid method".to_string(),
            ApiError::Conflict => "duplicate resource".to_string(),
            ApiError::Unprocessable => "unprocessable".to_string(),
            ApiError::Database(_) => "server error".to_string(),
            ApiError::PermissionDenied { .. } => "Permission not found".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(detail) = &self {
            tracing::error!(target: "drinks.errors", detail = %detail, "store fault");
        }

        let status = self.status();
        let body = ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.message(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
