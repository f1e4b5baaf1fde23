//! # Trading Core Library
//!
//! Shared service plumbing for the broker mocks and the analytics server.
//!
//! ## Modules
//! - `args`: Standardized argument parsing.
//! - `config`: Layered configuration (defaults, TOML file, environment).
//! - `auth`: JWT claims, signing keys and the explicit auth steps.
//! - `error`: `ApiError` and its JSON rendering.
//! - `broker_service`: Generic REST service of a mock broker.
//! - `server`: HTTP bootstrap helpers.

pub mod args;
pub mod auth;
pub mod broker_service;
pub mod config;
pub mod error;
pub mod server;

pub use auth::{AuthKeys, Claims};
pub use error::ApiError;

/// Development fallback for the shared token secret.
pub const DEFAULT_JWT_SECRET: &str = "your_jwt_secret_key";
