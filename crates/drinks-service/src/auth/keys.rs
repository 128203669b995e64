use crate::errors::ApiError;
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// JWKS response (RFC 7517)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<JsonWebKey>,
}

/// JSON Web Key (RFC 7517)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonWebKey {
    pub kid: String, // Key ID
    pub kty: String, // Key Type ("OKP" for EdDSA)
    pub crv: String, // Curve ("Ed25519")
    pub x: String,   // Public key (base64url encoded)
    #[serde(rename = "use")]
    pub use_: String, // Public key use ("sig")
    pub alg: String, // Algorithm ("EdDSA")
}

impl JsonWebKey {
    /// Build a verification key from this JWK.
    ///
    /// Only OKP/Ed25519 keys are accepted; anything else is treated as an
    /// unresolvable key, same as an unknown `kid`.
    pub fn decoding_key(&self) -> Result<DecodingKey, ApiError> {
        if self.kty != "OKP" || self.crv != "Ed25519" {
            tracing::debug!(
                target: "drinks.auth",
                kid = %self.kid,
                kty = %self.kty,
                crv = %self.crv,
                "Rejecting JWK with unsupported key type"
            );
            return Err(ApiError::UnknownSigningKey);
        }

        DecodingKey::from_ed_components(&self.x).map_err(|e| {
            tracing::debug!(target: "drinks.auth", kid = %self.kid, error = %e, "Unusable JWK");
            ApiError::UnknownSigningKey
        })
    }
}

#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("JWKS request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JWKS document contains no keys")]
    Empty,
}

/// Trusted signing keys, indexed by `kid`.
///
/// Fetched once at startup and immutable for the process lifetime; concurrent
/// reads need no locking. Rotated keys are picked up on restart.
#[derive(Debug, Clone, Default)]
pub struct KeyStore {
    keys: HashMap<String, JsonWebKey>,
}

impl KeyStore {
    pub fn from_jwks(jwks: Jwks) -> Self {
        let keys = jwks
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), key))
            .collect();
        KeyStore { keys }
    }

    /// Retrieve the JWKS document from the configured key source.
    pub async fn fetch(jwks_url: &str) -> Result<Self, KeyFetchError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let jwks: Jwks = client
            .get(jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if jwks.keys.is_empty() {
            return Err(KeyFetchError::Empty);
        }

        tracing::info!(target: "drinks.auth", count = jwks.keys.len(), "Loaded trusted signing keys");
        Ok(Self::from_jwks(jwks))
    }

    pub fn get(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.get(kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
