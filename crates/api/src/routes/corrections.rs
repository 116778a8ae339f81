use axum::routing::{get, post};
use axum::Router;

use crate::handlers::corrections;
use crate::state::AppState;

/// Public correction routes.
///
/// ```text
/// POST /corrections/        -> create_correction
/// GET  /corrections/{id}/   -> get_correction
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/corrections/", post(corrections::create_correction))
        .route("/corrections/{id}/", get(corrections::get_correction))
}
