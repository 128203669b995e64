use crate::auth::{self, Claims};
use crate::errors::ApiError;
use crate::handlers::drinks_handler::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Verified claims extracted from the `Authorization: Bearer <token>` header.
///
/// Extraction runs the whole verification pipeline: header parse → key
/// lookup by `kid` → signature/issuer/audience/expiry validation. Handlers
/// receive the claims and call [`auth::Claims::require_permission`]
/// explicitly for the scope they guard.
pub struct BearerClaims(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .ok_or(ApiError::MissingAuthorization)?
            .to_str()
            .map_err(|_| ApiError::InvalidAuthHeader("Authorization header is not valid text"))?;

        let token = parse_bearer(header)?;

        let kid = auth::extract_kid(token)?;
        let jwk = state
            .keys
            .get(&kid)
            .ok_or(ApiError::UnknownSigningKey)?;
        let key = jwk.decoding_key()?;

        let claims =
            auth::verify_token(token, &key, &state.config.issuer, &state.config.audience)?;

        Ok(BearerClaims(claims))
    }
}

/// Split the header into exactly `Bearer <token>`.
fn parse_bearer(header: &str) -> Result<&str, ApiError> {
    let parts: Vec<&str> = header.split_whitespace().collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(ApiError::InvalidAuthHeader(
            "Authorization header must start with Bearer",
        )),
        [] | [_] => Err(ApiError::InvalidAuthHeader("Token not found")),
        _ => Err(ApiError::InvalidAuthHeader(
            "Authorization header must be a bearer token",
        )),
    }
}
