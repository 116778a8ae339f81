//! Aircraft manufacturer entity model and DTOs.

use mosaic_core::patch::{double_option, merge_nullable};
use mosaic_core::types::{DbId, Timestamp};
use mosaic_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `manufacturers` table with its computed aircraft count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Manufacturer {
    pub id: DbId,
    pub name: String,
    pub logo: Option<String>,
    pub is_currently_manufacturing: bool,
    pub aircraft_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn default_true() -> bool {
    true
}

/// DTO for creating or fully replacing a manufacturer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ManufacturerInput {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    #[validate(url)]
    pub logo: Option<String>,
    #[serde(default = "default_true")]
    pub is_currently_manufacturing: bool,
}

/// DTO for a partial update. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct ManufacturerPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub logo: Option<Option<String>>,
    pub is_currently_manufacturing: Option<bool>,
}

impl ManufacturerPatch {
    /// Overlay this patch on `current`, producing a full input to validate.
    pub fn merge(self, current: &Manufacturer) -> ManufacturerInput {
        ManufacturerInput {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            logo: merge_nullable(self.logo, current.logo.clone()),
            is_currently_manufacturing: self
                .is_currently_manufacturing
                .unwrap_or(current.is_currently_manufacturing),
        }
    }
}

/// List filters for `GET /manufacturers/`.
#[derive(Debug, Default, Clone)]
pub struct ManufacturerFilter {
    pub is_currently_manufacturing: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}
