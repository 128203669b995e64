//! E2E test harness: a real drinks service on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use drinks_service::auth::keys::KeyStore;
use drinks_service::config::Config;
use drinks_service::handlers::drinks_handler::AppState;
use drinks_service::routes;
use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::crypto_fixtures::{TestSigningKey, TEST_AUDIENCE, TEST_ISSUER, TEST_KEY_ID};
use crate::token_builders::TestTokenBuilder;

/// A drinks service listening on `127.0.0.1:0`, wired to trust a freshly
/// generated Ed25519 key. Tests mint tokens against that key through the
/// helpers below.
pub struct TestDrinksServer {
    addr: SocketAddr,
    client: reqwest::Client,
    signing_key: TestSigningKey,
    _server_handle: JoinHandle<()>,
}

impl TestDrinksServer {
    /// Spawn the service on an ephemeral port, backed by the given pool.
    ///
    /// The trusted key set is built directly from the generated keypair, so
    /// no JWKS endpoint needs to be running.
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        let signing_key = TestSigningKey::generate(TEST_KEY_ID)?;
        let keys = KeyStore::from_jwks(signing_key.jwks());

        let config = Config {
            database_url: String::new(),
            bind_address: "127.0.0.1:0".to_string(),
            jwks_url: String::new(),
            issuer: TEST_ISSUER.to_string(),
            audience: TEST_AUDIENCE.to_string(),
        };

        let state = Arc::new(AppState { pool, config, keys });
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let server_handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            signing_key,
            _server_handle: server_handle,
        })
    }

    /// Base URL of the running server, e.g. `http://127.0.0.1:54321`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn signing_key(&self) -> &TestSigningKey {
        &self.signing_key
    }

    /// A valid token carrying the given permissions.
    pub fn token(&self, permissions: &[&str]) -> String {
        TestTokenBuilder::new()
            .with_permissions(permissions)
            .build(&self.signing_key)
    }

    /// A token that expired an hour ago.
    pub fn expired_token(&self, permissions: &[&str]) -> String {
        TestTokenBuilder::new()
            .with_permissions(permissions)
            .expired()
            .build(&self.signing_key)
    }

    /// A correctly signed token whose `kid` is not in the trusted set.
    pub fn token_with_unknown_kid(&self, permissions: &[&str]) -> String {
        TestTokenBuilder::new()
            .with_permissions(permissions)
            .with_kid(Some("not-a-trusted-key"))
            .build(&self.signing_key)
    }

    /// A token minted for a different audience.
    pub fn token_with_wrong_audience(&self, permissions: &[&str]) -> String {
        TestTokenBuilder::new()
            .with_permissions(permissions)
            .with_audience("some-other-api")
            .build(&self.signing_key)
    }
}
