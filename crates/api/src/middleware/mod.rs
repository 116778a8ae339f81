//! Request extractors for bearer-token authentication.

pub mod auth;

pub use auth::{AuthUser, RequireAdmin, RequireAuth};
