//! Drinks Service Library
//!
//! A small HTTP service exposing CRUD over the drinks resource, gated by
//! permission claims carried in signed bearer tokens.
//!
//! # Modules
//!
//! - `auth` - Token verification and permission checks
//! - `config` - Service configuration
//! - `errors` - Error types and the wire error envelope
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer-claims extraction
//! - `models` - Data models and view shaping
//! - `repositories` - Database access layer
//! - `routes` - Router assembly

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
