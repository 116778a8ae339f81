//! Public correction submission.
//!
//! Anyone may report a data error; the current value is snapshotted from the
//! live aircraft at submission time. Review happens in [`super::admin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::error::CoreError;
use mosaic_core::types::DbId;
use mosaic_db::models::correction::{CorrectionView, CreateCorrection};
use mosaic_db::repositories::CorrectionRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /v1/corrections/
pub async fn create_correction(
    State(state): State<AppState>,
    Json(input): Json<CreateCorrection>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let correction = CorrectionRepo::create(&state.pool, &input)
        .await?
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Aircraft with id {} does not exist",
                input.aircraft_id
            ))
        })?;

    tracing::info!(
        correction_id = correction.id,
        aircraft_id = correction.aircraft_id,
        field_name = %correction.field_name,
        "Correction submitted",
    );

    Ok((StatusCode::CREATED, Json(CorrectionView::from(correction))))
}

/// GET /v1/corrections/{id}/
pub async fn get_correction(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let correction = CorrectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Correction",
            id,
        }))?;
    Ok(Json(CorrectionView::from(correction)))
}
