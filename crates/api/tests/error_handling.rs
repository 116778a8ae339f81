//! Error envelope, auth, and query-parsing behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, editor_token, get, get_auth, post_json, put_json};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_not_found_uses_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/v1/aircraft/999999/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Aircraft with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_fields_are_reported_per_field(pool: PgPool) {
    let manufacturer = common::create_manufacturer(&pool, "Cessna").await;
    let token = editor_token();

    let response = post_json(
        common::build_test_app(pool),
        "/v1/aircraft/",
        Some(&token),
        json!({
            "manufacturer": manufacturer,
            "model": "150",
            "clean_stall_speed": "62",
            "top_speed": "109",
            "maneuvering_speed": "97",
            "seating_capacity": 6,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["clean_stall_speed"].is_array());
    assert!(json["fields"]["seating_capacity"].is_array());
    assert!(json["fields"].get("model").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_manufacturer_is_conflict(pool: PgPool) {
    common::create_manufacturer(&pool, "Piper").await;
    let token = editor_token();

    let response = post_json(
        common::build_test_app(pool),
        "/v1/manufacturers/",
        Some(&token),
        json!({"name": "Piper"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_writes_without_token_are_unauthorized(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/v1/manufacturers/",
        None,
        json!({"name": "Cirrus"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = delete(common::build_test_app(pool), "/v1/engines/1/", Some("garbage")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_routes_reject_editors(pool: PgPool) {
    let token = editor_token();
    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/v1/admin/corrections/",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json(
        common::build_test_app(pool),
        "/v1/admin/feature-flags/beta_features/",
        Some(&token),
        json!({"enabled": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Query parsing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_boolean_filters_accept_documented_spellings(pool: PgPool) {
    for value in ["true", "True", "1", "false", "False", "0"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, &format!("/v1/aircraft/?sport_pilot_eligible={value}")).await;
        assert_eq!(response.status(), StatusCode::OK, "{value}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_boolean_filter_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/v1/aircraft/?is_mosaic_compliant=maybe").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_compare_rejects_missing_and_malformed_ids(pool: PgPool) {
    let response = get(common::build_test_app(pool.clone()), "/v1/aircraft/compare/").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Please provide aircraft IDs to compare"
    );

    let response = get(
        common::build_test_app(pool.clone()),
        "/v1/aircraft/compare/?ids=",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(
        common::build_test_app(pool),
        "/v1/aircraft/compare/?ids=1,abc",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid aircraft ID format");
}
