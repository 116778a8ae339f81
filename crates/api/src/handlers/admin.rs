//! Admin-only handlers: feature flag management and correction review.
//!
//! All endpoints require the `admin` role via [`RequireAdmin`]. The acting
//! username is recorded as `changed_by` on flag history.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::correction::{review, ReviewAction};
use mosaic_core::error::CoreError;
use mosaic_core::feature_flag::FlagChange;
use mosaic_core::types::DbId;
use mosaic_db::models::correction::{CorrectionView, ReviewCorrection};
use mosaic_db::models::feature_flag::{FeatureFlag, SetFeatureFlag};
use mosaic_db::repositories::{CorrectionRepo, FeatureFlagRepo};
use serde::Serialize;

use super::feature_flags::{flag_not_found, parse_key};
use crate::error::{AppError, AppResult};
use crate::middleware::RequireAdmin;
use crate::query::{CorrectionListParams, HistoryParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// Response for a state-change request.
#[derive(Debug, Serialize)]
pub struct FlagUpdateResponse {
    #[serde(flatten)]
    pub flag: FeatureFlag,
    /// `false` when the flag was already in the requested state.
    pub changed: bool,
}

/// GET /v1/admin/feature-flags/
pub async fn list_flags(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let flags = FeatureFlagRepo::list(&state.pool).await?;
    Ok(Json(flags))
}

/// PUT /v1/admin/feature-flags/{key}/
pub async fn set_flag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
    Json(input): Json<SetFeatureFlag>,
) -> AppResult<impl IntoResponse> {
    let key = parse_key(&raw_key)?;

    let update = FeatureFlagRepo::set_enabled(
        &state.pool,
        key,
        input.enabled,
        &admin.username,
        &input.reason,
    )
    .await?
    .ok_or_else(|| flag_not_found(&raw_key))?;

    let changed = matches!(update.change, FlagChange::Changed { .. });
    tracing::info!(
        feature_key = %key,
        enabled = input.enabled,
        changed,
        user = %admin.username,
        "Feature flag set via admin API",
    );

    Ok(Json(FlagUpdateResponse {
        flag: update.flag,
        changed,
    }))
}

/// GET /v1/admin/feature-flags/{key}/history/
///
/// Still answers for a deleted flag as long as history exists for the key.
pub async fn flag_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
    Query(params): Query<HistoryParams>,
) -> AppResult<impl IntoResponse> {
    let key = parse_key(&raw_key)?;
    let history = FeatureFlagRepo::history(&state.pool, key, params.limit()).await?;
    Ok(Json(history))
}

// ---------------------------------------------------------------------------
// Correction review
// ---------------------------------------------------------------------------

fn correction_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Correction",
        id,
    })
}

/// GET /v1/admin/corrections/?status=pending
///
/// Newest first.
pub async fn list_corrections(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CorrectionListParams>,
) -> AppResult<impl IntoResponse> {
    let corrections: Vec<CorrectionView> = CorrectionRepo::list(&state.pool, params.status)
        .await?
        .into_iter()
        .map(CorrectionView::from)
        .collect();
    Ok(Json(corrections))
}

/// GET /v1/admin/corrections/{id}/
pub async fn get_correction(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let correction = CorrectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| correction_not_found(id))?;
    Ok(Json(CorrectionView::from(correction)))
}

async fn apply_action(
    state: &AppState,
    admin_username: &str,
    id: DbId,
    action: ReviewAction,
    body: &ReviewCorrection,
) -> AppResult<CorrectionView> {
    let current = CorrectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| correction_not_found(id))?;

    let outcome = review(
        current.status,
        &current.admin_notes,
        action,
        body.notes.as_deref(),
        body.force,
    )?;

    let updated = CorrectionRepo::apply_review(&state.pool, id, &outcome)
        .await?
        .ok_or_else(|| correction_not_found(id))?;

    tracing::info!(
        correction_id = id,
        from = %current.status,
        to = %updated.status,
        forced = body.force,
        user = %admin_username,
        "Correction reviewed",
    );

    Ok(CorrectionView::from(updated))
}

/// POST /v1/admin/corrections/{id}/approve/
pub async fn approve_correction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReviewCorrection>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state, &admin.username, id, ReviewAction::Approve, &body).await?;
    Ok(Json(view))
}

/// POST /v1/admin/corrections/{id}/reject/
pub async fn reject_correction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReviewCorrection>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state, &admin.username, id, ReviewAction::Reject, &body).await?;
    Ok(Json(view))
}

/// POST /v1/admin/corrections/{id}/implement/
///
/// 409 unless the correction is approved or `force` is set.
pub async fn implement_correction(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<ReviewCorrection>,
) -> AppResult<impl IntoResponse> {
    let view = apply_action(&state, &admin.username, id, ReviewAction::Implement, &body).await?;
    Ok(Json(view))
}
