//! Public read-only feature flag endpoints.
//!
//! Clients poll these to decide which optional UI features to show. State
//! changes go through the admin endpoints or the CLI.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::choices::FeatureKey;
use mosaic_core::error::CoreError;
use mosaic_db::models::feature_flag::FeatureFlagSummary;
use mosaic_db::repositories::FeatureFlagRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// 404 for a key that is unknown or has no stored flag.
pub(crate) fn flag_not_found(key: &str) -> AppError {
    AppError::Core(CoreError::NotFoundByKey {
        entity: "Feature flag",
        key: key.to_string(),
    })
}

/// Parse a path key into the closed enum, mapping unknown keys to 404.
pub(crate) fn parse_key(raw: &str) -> AppResult<FeatureKey> {
    raw.parse::<FeatureKey>().map_err(|_| flag_not_found(raw))
}

/// GET /v1/feature-flags/
///
/// `{feature_key: enabled}` for every stored flag.
pub async fn flag_map(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let flags = FeatureFlagRepo::list(&state.pool).await?;
    let map: BTreeMap<&'static str, bool> = flags
        .iter()
        .map(|f| (f.feature_key.as_str(), f.enabled))
        .collect();
    Ok(Json(map))
}

/// GET /v1/feature-flags/detailed/
pub async fn list_detailed(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let flags: Vec<FeatureFlagSummary> = FeatureFlagRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(FeatureFlagSummary::from)
        .collect();
    Ok(Json(flags))
}

/// GET /v1/feature-flags/{key}/
pub async fn get_flag(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let key = parse_key(&raw_key)?;
    let flag = FeatureFlagRepo::find_by_key(&state.pool, key)
        .await?
        .ok_or_else(|| flag_not_found(&raw_key))?;
    Ok(Json(FeatureFlagSummary::from(flag)))
}
