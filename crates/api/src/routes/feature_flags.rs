use axum::routing::get;
use axum::Router;

use crate::handlers::feature_flags;
use crate::state::AppState;

/// Public, read-only feature flag routes.
///
/// ```text
/// GET /feature-flags/            -> flag_map
/// GET /feature-flags/detailed/   -> list_detailed
/// GET /feature-flags/{key}/      -> get_flag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feature-flags/", get(feature_flags::flag_map))
        .route("/feature-flags/detailed/", get(feature_flags::list_detailed))
        .route("/feature-flags/{key}/", get(feature_flags::get_flag))
}
