//! Domain logic for the MOSAIC aircraft catalog.
//!
//! Everything here is pure: no database or HTTP access. The `db` crate calls
//! into these functions on its write paths and the `api` crate uses them to
//! shape responses.

pub mod choices;
pub mod correction;
pub mod eligibility;
pub mod error;
pub mod feature_flag;
pub mod listing;
pub mod patch;
pub mod roles;
pub mod types;
pub mod validation;
