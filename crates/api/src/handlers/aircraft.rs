//! Handlers for aircraft.
//!
//! List, compare, and write responses are list-shaped ([`AircraftView`]);
//! single-record reads are detail-shaped with the MOSAIC analysis attached.
//! Eligibility flags are never taken from the request body.
//!
//! [`AircraftView`]: mosaic_db::models::aircraft::AircraftView

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::error::CoreError;
use mosaic_core::listing::parse_id_list;
use mosaic_core::types::DbId;
use mosaic_db::models::aircraft::{AircraftInput, AircraftPatch, AircraftView};
use mosaic_db::repositories::{AircraftRepo, EngineRepo, ManufacturerRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::RequireAuth;
use crate::query::{AircraftListParams, CompareParams};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Aircraft",
        id,
    })
}

/// Validate `input` and check that every id it references exists.
async fn check_input(state: &AppState, input: &AircraftInput) -> AppResult<()> {
    input.validate()?;

    if ManufacturerRepo::find_by_id(&state.pool, input.manufacturer_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "Manufacturer with id {} does not exist",
            input.manufacturer_id
        )));
    }

    if let Some(engine_ids) = &input.engine_ids {
        let missing = EngineRepo::missing_ids(&state.pool, engine_ids).await?;
        if !missing.is_empty() {
            let ids: Vec<String> = missing.iter().map(ToString::to_string).collect();
            return Err(AppError::BadRequest(format!(
                "Unknown engine ids: {}",
                ids.join(", ")
            )));
        }
    }

    Ok(())
}

/// Re-read a written aircraft in list shape.
async fn written_view(state: &AppState, id: DbId) -> AppResult<AircraftView> {
    AircraftRepo::find_view(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// GET /v1/aircraft/
pub async fn list_aircraft(
    State(state): State<AppState>,
    Query(params): Query<AircraftListParams>,
) -> AppResult<impl IntoResponse> {
    let aircraft = AircraftRepo::list_views(&state.pool, &params.into()).await?;
    Ok(Json(aircraft))
}

/// GET /v1/aircraft/{id}/
pub async fn get_aircraft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = AircraftRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(detail))
}

/// GET /v1/aircraft/compare/?ids=1,2,3
///
/// Detail-shaped records for the ids that exist, in request order.
pub async fn compare_aircraft(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> AppResult<impl IntoResponse> {
    let ids = parse_id_list(params.ids.as_deref())?;
    let details = AircraftRepo::compare(&state.pool, &ids).await?;
    Ok(Json(details))
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// POST /v1/aircraft/
pub async fn create_aircraft(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AircraftInput>,
) -> AppResult<impl IntoResponse> {
    check_input(&state, &input).await?;

    let aircraft = AircraftRepo::create(&state.pool, &input).await?;

    tracing::info!(
        aircraft_id = aircraft.id,
        model = %aircraft.model,
        sport_pilot_eligible = aircraft.sport_pilot_eligible,
        is_mosaic_compliant = aircraft.is_mosaic_compliant,
        user = %user.username,
        "Aircraft created",
    );

    let view = written_view(&state, aircraft.id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /v1/aircraft/{id}/
pub async fn update_aircraft(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AircraftInput>,
) -> AppResult<impl IntoResponse> {
    check_input(&state, &input).await?;

    AircraftRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(aircraft_id = id, user = %user.username, "Aircraft updated");

    Ok(Json(written_view(&state, id).await?))
}

/// PATCH /v1/aircraft/{id}/
pub async fn patch_aircraft(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<AircraftPatch>,
) -> AppResult<impl IntoResponse> {
    let current = AircraftRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let input = patch.merge(&current);
    check_input(&state, &input).await?;

    AircraftRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(aircraft_id = id, user = %user.username, "Aircraft patched");

    Ok(Json(written_view(&state, id).await?))
}

/// DELETE /v1/aircraft/{id}/
pub async fn delete_aircraft(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !AircraftRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(aircraft_id = id, user = %user.username, "Aircraft deleted");

    Ok(StatusCode::NO_CONTENT)
}
