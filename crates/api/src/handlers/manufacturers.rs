//! Handlers for manufacturers.
//!
//! Reads are public; writes require an authenticated caller.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::error::CoreError;
use mosaic_core::types::DbId;
use mosaic_db::models::aircraft::AircraftFilter;
use mosaic_db::models::manufacturer::{ManufacturerInput, ManufacturerPatch};
use mosaic_db::repositories::{AircraftRepo, ManufacturerRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::RequireAuth;
use crate::query::{AircraftListParams, ManufacturerListParams};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Manufacturer",
        id,
    })
}

/// GET /v1/manufacturers/
pub async fn list_manufacturers(
    State(state): State<AppState>,
    Query(params): Query<ManufacturerListParams>,
) -> AppResult<impl IntoResponse> {
    let manufacturers = ManufacturerRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(manufacturers))
}

/// GET /v1/manufacturers/{id}/
pub async fn get_manufacturer(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let manufacturer = ManufacturerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(manufacturer))
}

/// POST /v1/manufacturers/
pub async fn create_manufacturer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<ManufacturerInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let manufacturer = ManufacturerRepo::create(&state.pool, &input).await?;

    tracing::info!(
        manufacturer_id = manufacturer.id,
        name = %manufacturer.name,
        user = %user.username,
        "Manufacturer created",
    );

    Ok((StatusCode::CREATED, Json(manufacturer)))
}

/// PUT /v1/manufacturers/{id}/
pub async fn update_manufacturer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ManufacturerInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let manufacturer = ManufacturerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(manufacturer_id = id, user = %user.username, "Manufacturer updated");

    Ok(Json(manufacturer))
}

/// PATCH /v1/manufacturers/{id}/
pub async fn patch_manufacturer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ManufacturerPatch>,
) -> AppResult<impl IntoResponse> {
    let current = ManufacturerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let input = patch.merge(&current);
    input.validate()?;

    let manufacturer = ManufacturerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(manufacturer_id = id, user = %user.username, "Manufacturer patched");

    Ok(Json(manufacturer))
}

/// DELETE /v1/manufacturers/{id}/
///
/// Cascades to the manufacturer's aircraft.
pub async fn delete_manufacturer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !ManufacturerRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(manufacturer_id = id, user = %user.username, "Manufacturer deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/manufacturers/{id}/aircraft/
///
/// List-shaped aircraft built by one manufacturer. The aircraft list filters
/// apply on top; `manufacturer` is always forced to `id`.
pub async fn list_manufacturer_aircraft(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AircraftListParams>,
) -> AppResult<impl IntoResponse> {
    if ManufacturerRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(not_found(id));
    }

    let filter = AircraftFilter {
        manufacturer_id: Some(id),
        ..params.into()
    };
    let aircraft = AircraftRepo::list_views(&state.pool, &filter).await?;
    Ok(Json(aircraft))
}
