//! MOSAIC aircraft catalog HTTP API.
//!
//! Exposes the building blocks (config, state, error handling, routes) so
//! integration tests, the server binary, and the operator CLI share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
