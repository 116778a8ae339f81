use axum::routing::get;
use axum::Router;

use crate::handlers::manufacturers;
use crate::state::AppState;

/// Manufacturer routes.
///
/// ```text
/// GET    /manufacturers/                -> list_manufacturers
/// POST   /manufacturers/                -> create_manufacturer
/// GET    /manufacturers/{id}/           -> get_manufacturer
/// PUT    /manufacturers/{id}/           -> update_manufacturer
/// PATCH  /manufacturers/{id}/           -> patch_manufacturer
/// DELETE /manufacturers/{id}/           -> delete_manufacturer
/// GET    /manufacturers/{id}/aircraft/  -> list_manufacturer_aircraft
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/manufacturers/",
            get(manufacturers::list_manufacturers).post(manufacturers::create_manufacturer),
        )
        .route(
            "/manufacturers/{id}/",
            get(manufacturers::get_manufacturer)
                .put(manufacturers::update_manufacturer)
                .patch(manufacturers::patch_manufacturer)
                .delete(manufacturers::delete_manufacturer),
        )
        .route(
            "/manufacturers/{id}/aircraft/",
            get(manufacturers::list_manufacturer_aircraft),
        )
}
