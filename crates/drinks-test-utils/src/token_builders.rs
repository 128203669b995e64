//! Builder for minting bearer tokens in tests.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::json;

use crate::crypto_fixtures::{TestSigningKey, TEST_AUDIENCE, TEST_ISSUER, TEST_KEY_ID};

/// Mints EdDSA-signed JWTs with full control over the claims and the
/// header `kid`, so tests can exercise both happy paths and rejections.
pub struct TestTokenBuilder {
    sub: String,
    issuer: String,
    audience: String,
    kid: Option<String>,
    permissions: Vec<String>,
    expires_in_secs: i64,
}

impl TestTokenBuilder {
    pub fn new() -> Self {
        Self {
            sub: "auth0|test-user".to_string(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
            kid: Some(TEST_KEY_ID.to_string()),
            permissions: Vec::new(),
            expires_in_secs: 3600,
        }
    }

    pub fn with_subject(mut self, sub: &str) -> Self {
        self.sub = sub.to_string();
        self
    }

    pub fn with_permission(mut self, permission: &str) -> Self {
        self.permissions.push(permission.to_string());
        self
    }

    pub fn with_permissions(mut self, permissions: &[&str]) -> Self {
        self.permissions
            .extend(permissions.iter().map(|p| p.to_string()));
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = issuer.to_string();
        self
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.audience = audience.to_string();
        self
    }

    /// Overrides the header `kid`; `None` omits it entirely.
    pub fn with_kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(|k| k.to_string());
        self
    }

    /// Makes the token already expired (by one hour).
    pub fn expired(mut self) -> Self {
        self.expires_in_secs = -3600;
        self
    }

    /// Signs the token with the given key's private material.
    ///
    /// # Panics
    ///
    /// Panics on signing failure; this is test-only code.
    pub fn build(self, key: &TestSigningKey) -> String {
        let now = Utc::now().timestamp();
        let claims = json!({
            "iss": self.issuer,
            "aud": self.audience,
            "sub": self.sub,
            "iat": now,
            "exp": now + self.expires_in_secs,
            "permissions": self.permissions,
        });

        let mut header = Header::new(Algorithm::EdDSA);
        header.kid = self.kid;

        let encoding_key =
            EncodingKey::from_ed_der(&key.pkcs8);
        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .expect("Failed to sign test token")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
