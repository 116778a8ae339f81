//! Correction submission and admin review over HTTP.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get, get_auth, post_json};
use serde_json::json;
use sqlx::PgPool;

/// Seed one aircraft and return its id.
async fn aircraft(pool: &PgPool) -> i64 {
    let mfr = common::create_manufacturer(pool, "Cessna").await;
    common::create_aircraft(pool, mfr, "150", "48", "109").await["id"]
        .as_i64()
        .unwrap()
}

async fn submit(pool: &PgPool, aircraft_id: i64, field: &str) -> serde_json::Value {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/v1/corrections/",
        None,
        json!({
            "aircraft": aircraft_id,
            "field_name": field,
            "suggested_value": "42",
            "reason": "POH section 5",
            "current_value": "client value",
            "submitter_email": "pilot@example.com",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_snapshots_current_value(pool: PgPool) {
    let id = aircraft(&pool).await;
    let json = submit(&pool, id, "clean_stall_speed").await;

    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["status_display"], "Pending review");
    assert_eq!(json["field_name_display"], "Clean stall speed");
    assert_eq!(json["aircraft"], id);
    assert_eq!(json["aircraft_name"], "Cessna 150");
    assert_ne!(json["current_value"], "client value");
    assert_eq!(json["current_value"], "48.0");

    let general = submit(&pool, id, "general").await;
    assert_eq!(general["current_value"], "");

    let cruise = submit(&pool, id, "cruise_speed").await;
    assert_eq!(cruise["current_value"], "");

    let correction_id = json["id"].as_i64().unwrap();
    let response = get(
        common::build_test_app(pool),
        &format!("/v1/corrections/{correction_id}/"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reason"], "POH section 5");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_validates_input(pool: PgPool) {
    let id = aircraft(&pool).await;

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/v1/corrections/",
        None,
        json!({
            "aircraft": 999999,
            "field_name": "top_speed",
            "suggested_value": "110",
            "reason": "typo",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        common::build_test_app(pool),
        "/v1/corrections/",
        None,
        json!({
            "aircraft": id,
            "field_name": "top_speed",
            "suggested_value": "110",
            "reason": "typo",
            "submitter_email": "not-an-email",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["submitter_email"].is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_flow_approve_then_implement(pool: PgPool) {
    let id = aircraft(&pool).await;
    let correction = submit(&pool, id, "top_speed").await;
    let cid = correction["id"].as_i64().unwrap();
    let token = admin_token();

    // Implement before approval is refused.
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/admin/corrections/{cid}/implement/"),
        Some(&token),
        json!({"notes": "too early"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/admin/corrections/{cid}/approve/"),
        Some(&token),
        json!({"notes": "checked POH"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "APPROVED");
    assert_eq!(json["admin_notes"], "checked POH");
    assert!(json["reviewed_at"].is_string());

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/admin/corrections/{cid}/implement/"),
        Some(&token),
        json!({"notes": "updated"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "IMPLEMENTED");
    assert_eq!(json["admin_notes"], "checked POH\nImplemented: updated");

    // The aircraft itself is untouched.
    let response = get(
        common::build_test_app(pool),
        &format!("/v1/aircraft/{id}/"),
    )
    .await;
    assert_eq!(body_json(response).await["top_speed"], "109.0");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forced_implement_and_status_filter(pool: PgPool) {
    let id = aircraft(&pool).await;
    let first = submit(&pool, id, "top_speed").await["id"].as_i64().unwrap();
    let second = submit(&pool, id, "seating_capacity").await["id"]
        .as_i64()
        .unwrap();
    let token = admin_token();

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/admin/corrections/{first}/implement/"),
        Some(&token),
        json!({"force": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/v1/admin/corrections/{second}/reject/"),
        Some(&token),
        json!({"notes": "source disagrees"}),
    )
    .await;
    assert_eq!(body_json(response).await["status"], "REJECTED");

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/v1/admin/corrections/?status=IMPLEMENTED",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["id"], first);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/v1/admin/corrections/",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json[0]["id"], second);
    assert_eq!(json[1]["id"], first);

    let response = get_auth(
        common::build_test_app(pool),
        "/v1/admin/corrections/999999/",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
