pub mod admin;
pub mod aircraft;
pub mod corrections;
pub mod docs;
pub mod engines;
pub mod feature_flags;
pub mod health;
pub mod manufacturers;

use axum::Router;

use crate::state::AppState;

/// Build the `/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /manufacturers/                                  list, create
/// /manufacturers/{id}/                             get, put, patch, delete
/// /manufacturers/{id}/aircraft/                    aircraft of one manufacturer
///
/// /aircraft/                                       list, create
/// /aircraft/compare/                               compare by ?ids=
/// /aircraft/{id}/                                  get (detail), put, patch, delete
///
/// /engines/                                        list, create
/// /engines/{id}/                                   get, put, patch, delete
///
/// /corrections/                                    submit (public)
/// /corrections/{id}/                               get (public)
///
/// /feature-flags/                                  {key: enabled} map
/// /feature-flags/detailed/                         flags with descriptions
/// /feature-flags/{key}/                            one flag
///
/// /admin/feature-flags/                            list (admin only)
/// /admin/feature-flags/{key}/                      set state (PUT)
/// /admin/feature-flags/{key}/history/              change history
/// /admin/corrections/                              list ?status=
/// /admin/corrections/{id}/                         get
/// /admin/corrections/{id}/approve/                 approve (POST)
/// /admin/corrections/{id}/reject/                  reject (POST)
/// /admin/corrections/{id}/implement/               implement (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(manufacturers::router())
        .merge(aircraft::router())
        .merge(engines::router())
        .merge(corrections::router())
        .merge(feature_flags::router())
        .merge(admin::router())
}
