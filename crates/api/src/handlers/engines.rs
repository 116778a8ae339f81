//! Handlers for engines.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use mosaic_core::error::CoreError;
use mosaic_core::types::DbId;
use mosaic_db::models::engine::{EngineInput, EnginePatch};
use mosaic_db::repositories::EngineRepo;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::RequireAuth;
use crate::query::EngineListParams;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Engine",
        id,
    })
}

/// GET /v1/engines/
pub async fn list_engines(
    State(state): State<AppState>,
    Query(params): Query<EngineListParams>,
) -> AppResult<impl IntoResponse> {
    let engines = EngineRepo::list(&state.pool, &params.into()).await?;
    Ok(Json(engines))
}

/// GET /v1/engines/{id}/
pub async fn get_engine(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let engine = EngineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(engine))
}

/// POST /v1/engines/
pub async fn create_engine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<EngineInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let engine = EngineRepo::create(&state.pool, &input).await?;

    tracing::info!(
        engine_id = engine.id,
        engine = %engine,
        user = %user.username,
        "Engine created",
    );

    Ok((StatusCode::CREATED, Json(engine)))
}

/// PUT /v1/engines/{id}/
pub async fn update_engine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EngineInput>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let engine = EngineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(engine_id = id, user = %user.username, "Engine updated");

    Ok(Json(engine))
}

/// PATCH /v1/engines/{id}/
pub async fn patch_engine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<EnginePatch>,
) -> AppResult<impl IntoResponse> {
    let current = EngineRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let input = patch.merge(&current);
    input.validate()?;

    let engine = EngineRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(engine_id = id, user = %user.username, "Engine patched");

    Ok(Json(engine))
}

/// DELETE /v1/engines/{id}/
pub async fn delete_engine(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !EngineRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }

    tracing::info!(engine_id = id, user = %user.username, "Engine deleted");

    Ok(StatusCode::NO_CONTENT)
}
