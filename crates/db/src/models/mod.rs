//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` input DTO for create and full update
//! - A `Deserialize` patch DTO (all `Option` fields) merged onto the row
//! - Serialized response views where the API shape differs from the row

pub mod aircraft;
pub mod correction;
pub mod engine;
pub mod feature_flag;
pub mod manufacturer;
