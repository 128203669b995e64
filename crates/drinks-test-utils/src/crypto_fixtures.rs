//! Ed25519 signing fixtures for tests.
//!
//! Each test server generates a fresh keypair; its public half is exposed
//! as the JWKS the service trusts, and the private half signs test tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use drinks_service::auth::keys::{JsonWebKey, Jwks};
use ring::signature::{Ed25519KeyPair, KeyPair};

/// Key id published in the test JWKS and stamped into test token headers.
pub const TEST_KEY_ID: &str = "drinks-test-key-01";

/// Issuer the test server expects.
pub const TEST_ISSUER: &str = "https://auth.drinks.test/";

/// Audience the test server expects.
pub const TEST_AUDIENCE: &str = "drinks";

/// One Ed25519 keypair: PKCS8 private material plus the base64url public
/// key as it appears in a JWK `x` field.
pub struct TestSigningKey {
    pub kid: String,
    pub pkcs8: Vec<u8>,
    pub public_b64url: String,
}

impl TestSigningKey {
    pub fn generate(kid: &str) -> Result<Self, anyhow::Error> {
        let rng = ring::rand::SystemRandom::new();
        let pkcs8 = Ed25519KeyPair::generate_pkcs8(&rng)
            .map_err(|e| anyhow::anyhow!("Keypair generation failed: {}", e))?;
        let pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref())
            .map_err(|e| anyhow::anyhow!("Keypair parsing failed: {}", e))?;

        Ok(Self {
            kid: kid.to_string(),
            pkcs8: pkcs8.as_ref().to_vec(),
            public_b64url: URL_SAFE_NO_PAD.encode(pair.public_key().as_ref()),
        })
    }

    /// The public half as an RFC 7517 JWK.
    pub fn jwk(&self) -> JsonWebKey {
        JsonWebKey {
            kid: self.kid.clone(),
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: self.public_b64url.clone(),
            use_: "sig".to_string(),
            alg: "EdDSA".to_string(),
        }
    }

    /// A one-key JWKS document trusting only this key.
    pub fn jwks(&self) -> Jwks {
        Jwks {
            keys: vec![self.jwk()],
        }
    }
}
