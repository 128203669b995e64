//! # Drinks Test Utilities
//!
//! Shared test utilities for the drinks service:
//! - Ed25519 signing fixtures that double as the server's trusted JWKS
//! - `TestTokenBuilder` for minting bearer tokens with chosen claims
//! - `TestDrinksServer` harness for E2E tests against a real listener

pub mod crypto_fixtures;
pub mod server_harness;
pub mod token_builders;

pub use crypto_fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
