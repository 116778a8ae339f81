use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin-only routes.
///
/// ```text
/// GET  /admin/feature-flags/                 -> list_flags
/// PUT  /admin/feature-flags/{key}/           -> set_flag
/// GET  /admin/feature-flags/{key}/history/   -> flag_history
/// GET  /admin/corrections/                   -> list_corrections
/// GET  /admin/corrections/{id}/              -> get_correction
/// POST /admin/corrections/{id}/approve/      -> approve_correction
/// POST /admin/corrections/{id}/reject/       -> reject_correction
/// POST /admin/corrections/{id}/implement/    -> implement_correction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/feature-flags/", get(admin::list_flags))
        .route("/admin/feature-flags/{key}/", put(admin::set_flag))
        .route(
            "/admin/feature-flags/{key}/history/",
            get(admin::flag_history),
        )
        .route("/admin/corrections/", get(admin::list_corrections))
        .route("/admin/corrections/{id}/", get(admin::get_correction))
        .route(
            "/admin/corrections/{id}/approve/",
            post(admin::approve_correction),
        )
        .route(
            "/admin/corrections/{id}/reject/",
            post(admin::reject_correction),
        )
        .route(
            "/admin/corrections/{id}/implement/",
            post(admin::implement_correction),
        )
}
