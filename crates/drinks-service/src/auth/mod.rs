//! Bearer-token verification and permission checks.
//!
//! The verifier accepts only EdDSA (Ed25519) signatures, validates issuer,
//! audience, and expiry, and produces a [`Claims`] value for the request.
//! Rejection messages are intentionally generic; detail is logged at debug
//! level.

pub mod keys;

use crate::errors::ApiError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Maximum allowed JWT size in bytes (8KB).
///
/// Oversized tokens are rejected before any base64 decoding or signature
/// work, bounding the cost of junk input.
pub const MAX_JWT_SIZE_BYTES: usize = 8192;

/// Verified per-request claims.
///
/// Never persisted; lives only for the duration of one request. The `sub`
/// field identifies the caller and is redacted in Debug output.
#[derive(Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(default)]
    pub iat: i64,

    /// Permission strings granted to this token. A token carrying no
    /// permissions claim at all gets the empty set.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("exp", &self.exp)
            .field("iat", &self.iat)
            .field("permissions", &self.permissions)
            .finish()
    }
}

impl Claims {
    /// Permission Gate: fail with 403 `unauthorized` unless this token
    /// carries `required`. Pure check, no side effects.
    pub fn require_permission(&self, required: &str) -> Result<(), ApiError> {
        if self.permissions.iter().any(|p| p == required) {
            return Ok(());
        }

        tracing::debug!(
            target: "drinks.auth",
            required = required,
            provided = ?self.permissions,
            "Permission check failed"
        );
        Err(ApiError::PermissionDenied {
            required: required.to_string(),
        })
    }
}

/// Extract the `kid` (key ID) from a JWT header without verifying the
/// signature.
///
/// The `kid` is only used to look up a key in the trusted set; the token is
/// always verified afterwards. A structurally broken token is an
/// `invalid_token` failure, while a missing `kid` means no trusted key can
/// be resolved and maps to `invalid_header`, same as an unknown `kid`.
#[instrument(skip_all)]
pub fn extract_kid(token: &str) -> Result<String, ApiError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "drinks.auth",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(ApiError::InvalidToken);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(ApiError::InvalidToken);
    }

    let header_part = parts.first().ok_or(ApiError::InvalidToken)?;
    let header_bytes = URL_SAFE_NO_PAD.decode(header_part).map_err(|e| {
        tracing::debug!(target: "drinks.auth", error = %e, "Failed to decode JWT header base64");
        ApiError::InvalidToken
    })?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes).map_err(|e| {
        tracing::debug!(target: "drinks.auth", error = %e, "Failed to parse JWT header JSON");
        ApiError::InvalidToken
    })?;

    header
        .get("kid")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .ok_or(ApiError::UnknownSigningKey)
}

/// Verify a bearer JWT and extract its claims.
///
/// Validates the EdDSA signature against `key`, then `exp`, `aud`, and
/// `iss`. Expiry is the only failure distinguished on the wire
/// (`token_expired`); everything else collapses to `invalid_token`.
#[instrument(skip_all)]
pub fn verify_token(
    token: &str,
    key: &DecodingKey,
    issuer: &str,
    audience: &str,
) -> Result<Claims, ApiError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "drinks.auth",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(ApiError::InvalidToken);
    }

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[audience]);
    validation.set_issuer(&[issuer]);

    let token_data = decode::<Claims>(token, key, &validation).map_err(|e| {
        tracing::debug!(target: "drinks.auth", error = %e, "Token verification failed");
        match e.kind() {
            ErrorKind::ExpiredSignature => ApiError::TokenExpired,
            _ => ApiError::InvalidToken,
        }
    })?;

    Ok(token_data.claims)
}
