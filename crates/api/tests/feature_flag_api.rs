//! Feature flag endpoints: public reads and audited admin changes.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, get, get_auth, put_json};
use mosaic_db::repositories::FeatureFlagRepo;
use serde_json::json;
use sqlx::PgPool;

async fn init_flags(pool: &PgPool) {
    FeatureFlagRepo::initialize(pool, false).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_public_map_reflects_defaults(pool: PgPool) {
    init_flags(&pool).await;

    let response = get(common::build_test_app(pool), "/v1/feature-flags/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "ads_enabled": false,
            "amp_ads_enabled": false,
            "analytics_enabled": true,
            "beta_features": false,
            "maintenance_mode": false,
        })
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detailed_and_single_flag(pool: PgPool) {
    init_flags(&pool).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/v1/feature-flags/detailed/",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 5);
    assert_eq!(json[0]["feature_key"], "ads_enabled");
    assert_eq!(json[0]["display_name"], "Google AdSense Ads");

    let response = get(
        common::build_test_app(pool),
        "/v1/feature-flags/maintenance_mode/",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["display_name"], "Maintenance Mode");
    assert_eq!(json["enabled"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_flag_is_404_with_key_message(pool: PgPool) {
    let response = get(
        common::build_test_app(pool.clone()),
        "/v1/feature-flags/beta_features/",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Feature flag \"beta_features\" not found"
    );

    let response = get(
        common::build_test_app(pool),
        "/v1/feature-flags/dark_mode/",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Feature flag \"dark_mode\" not found"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_set_records_history_once(pool: PgPool) {
    init_flags(&pool).await;
    let token = admin_token();

    let response = put_json(
        common::build_test_app(pool.clone()),
        "/v1/admin/feature-flags/beta_features/",
        Some(&token),
        json!({"enabled": true, "reason": "QA window"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["enabled"], true);
    assert_eq!(json["changed"], true);
    assert_eq!(json["last_modified_by"], "ops-admin");

    // Same state again: no new history row.
    let response = put_json(
        common::build_test_app(pool.clone()),
        "/v1/admin/feature-flags/beta_features/",
        Some(&token),
        json!({"enabled": true}),
    )
    .await;
    assert_eq!(body_json(response).await["changed"], false);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/v1/admin/feature-flags/beta_features/history/",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = body_json(response).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["previous_state"], false);
    assert_eq!(history[0]["new_state"], true);
    assert_eq!(history[0]["changed_by"], "ops-admin");
    assert_eq!(history[0]["reason"], "QA window");

    let response = get(
        common::build_test_app(pool),
        "/v1/feature-flags/",
    )
    .await;
    assert_eq!(body_json(response).await["beta_features"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_set_unknown_flag_is_404(pool: PgPool) {
    let token = admin_token();
    let response = put_json(
        common::build_test_app(pool),
        "/v1/admin/feature-flags/ads_enabled/",
        Some(&token),
        json!({"enabled": true}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_admin_list_returns_stored_rows(pool: PgPool) {
    init_flags(&pool).await;
    let response = get_auth(
        common::build_test_app(pool),
        "/v1/admin/feature-flags/",
        &admin_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 5);
    assert_eq!(json[0]["last_modified_by"], "system_init");
}
