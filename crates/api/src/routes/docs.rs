use axum::routing::get;
use axum::Router;

use crate::handlers::docs;
use crate::state::AppState;

/// Schema and documentation pages, mounted at the root.
///
/// ```text
/// GET /schema/   -> schema (OpenAPI JSON, internal paths removed)
/// GET /docs/     -> swagger_ui
/// GET /redoc/    -> redoc
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schema/", get(docs::schema))
        .route("/docs/", get(docs::swagger_ui))
        .route("/redoc/", get(docs::redoc))
}
