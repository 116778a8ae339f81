//! User-submitted aircraft correction model and DTOs.

use mosaic_core::choices::{CorrectionField, CorrectionStatus};
use mosaic_core::types::{DbId, Timestamp};
use mosaic_core::validation::validate_not_blank;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from `aircraft_corrections` joined with the aircraft's display name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AircraftCorrection {
    pub id: DbId,
    #[serde(rename = "aircraft")]
    pub aircraft_id: DbId,
    pub aircraft_name: String,
    #[sqlx(try_from = "String")]
    pub field_name: CorrectionField,
    pub current_value: String,
    pub suggested_value: String,
    pub reason: String,
    pub source_documentation: String,
    pub submitter_email: Option<String>,
    pub submitter_name: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: CorrectionStatus,
    pub admin_notes: String,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public response shape: the row plus display labels.
#[derive(Debug, Clone, Serialize)]
pub struct CorrectionView {
    #[serde(flatten)]
    pub correction: AircraftCorrection,
    pub field_name_display: &'static str,
    pub status_display: &'static str,
}

impl From<AircraftCorrection> for CorrectionView {
    fn from(correction: AircraftCorrection) -> Self {
        Self {
            field_name_display: correction.field_name.label(),
            status_display: correction.status.label(),
            correction,
        }
    }
}

/// DTO for submitting a correction.
///
/// There is deliberately no `current_value`: the server snapshots it from the
/// live aircraft, and any value a client sends is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCorrection {
    #[serde(rename = "aircraft")]
    pub aircraft_id: DbId,
    pub field_name: CorrectionField,
    #[validate(custom(function = "validate_not_blank"))]
    pub suggested_value: String,
    #[validate(custom(function = "validate_not_blank"))]
    pub reason: String,
    #[serde(default)]
    pub source_documentation: String,
    #[validate(email)]
    pub submitter_email: Option<String>,
    #[validate(length(max = 100))]
    pub submitter_name: Option<String>,
}

/// Body for the admin review endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewCorrection {
    pub notes: Option<String>,
    #[serde(default)]
    pub force: bool,
}
