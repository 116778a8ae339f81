use axum::routing::get;
use axum::Router;

use crate::handlers::aircraft;
use crate::state::AppState;

/// Aircraft routes.
///
/// ```text
/// GET    /aircraft/           -> list_aircraft
/// POST   /aircraft/           -> create_aircraft
/// GET    /aircraft/compare/   -> compare_aircraft
/// GET    /aircraft/{id}/      -> get_aircraft
/// PUT    /aircraft/{id}/      -> update_aircraft
/// PATCH  /aircraft/{id}/      -> patch_aircraft
/// DELETE /aircraft/{id}/      -> delete_aircraft
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/aircraft/",
            get(aircraft::list_aircraft).post(aircraft::create_aircraft),
        )
        .route("/aircraft/compare/", get(aircraft::compare_aircraft))
        .route(
            "/aircraft/{id}/",
            get(aircraft::get_aircraft)
                .put(aircraft::update_aircraft)
                .patch(aircraft::patch_aircraft)
                .delete(aircraft::delete_aircraft),
        )
}
