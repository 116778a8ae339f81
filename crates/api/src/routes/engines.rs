use axum::routing::get;
use axum::Router;

use crate::handlers::engines;
use crate::state::AppState;

/// Engine routes.
///
/// ```text
/// GET    /engines/        -> list_engines
/// POST   /engines/        -> create_engine
/// GET    /engines/{id}/   -> get_engine
/// PUT    /engines/{id}/   -> update_engine
/// PATCH  /engines/{id}/   -> patch_engine
/// DELETE /engines/{id}/   -> delete_engine
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/engines/",
            get(engines::list_engines).post(engines::create_engine),
        )
        .route(
            "/engines/{id}/",
            get(engines::get_engine)
                .put(engines::update_engine)
                .patch(engines::patch_engine)
                .delete(engines::delete_engine),
        )
}
