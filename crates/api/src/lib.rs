//! HTTP service for the page builder.
//!
//! Exposes config, state, auth, error handling, storage backends and routes
//! so the binary and the integration tests build the same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
