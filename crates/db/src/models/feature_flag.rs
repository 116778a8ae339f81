//! Feature flag and flag-history models.

use mosaic_core::choices::FeatureKey;
use mosaic_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `feature_flags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeatureFlag {
    pub id: DbId,
    #[sqlx(try_from = "String")]
    pub feature_key: FeatureKey,
    pub enabled: bool,
    pub description: String,
    pub last_modified_by: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public detailed shape: `{feature_key, display_name, enabled, description}`.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureFlagSummary {
    pub feature_key: FeatureKey,
    pub display_name: &'static str,
    pub enabled: bool,
    pub description: String,
}

impl From<FeatureFlag> for FeatureFlagSummary {
    fn from(flag: FeatureFlag) -> Self {
        Self {
            feature_key: flag.feature_key,
            display_name: flag.feature_key.label(),
            enabled: flag.enabled,
            description: flag.description,
        }
    }
}

/// A row from the append-only `feature_flag_history` table.
///
/// `feature_flag_id` becomes `NULL` once the flag itself is deleted; the key
/// snapshot keeps the row attributable.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeatureFlagHistory {
    pub id: DbId,
    pub feature_flag_id: Option<DbId>,
    pub feature_key: String,
    pub previous_state: bool,
    pub new_state: bool,
    pub changed_by: String,
    pub reason: String,
    pub changed_at: Timestamp,
}

/// Body for `PUT /admin/feature-flags/{key}/`.
#[derive(Debug, Deserialize)]
pub struct SetFeatureFlag {
    pub enabled: bool,
    #[serde(default)]
    pub reason: String,
}
