//! Integration tests for the health check, docs pages, and general HTTP
//! behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, body_text, get};
use sqlx::PgPool;
use tower::ServiceExt;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check_returns_ok_with_json(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "No route for GET /this-route-does-not-exist");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_v1_route_uses_error_envelope(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/v1/helicopters/").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cors_preflight_returns_correct_headers(pool: PgPool) {
    let app = common::build_test_app(pool);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/v1/aircraft/")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");
}

// ---------------------------------------------------------------------------
// API documentation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schema_omits_internal_paths(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/schema/").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["openapi"], "3.0.3");
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/v1/aircraft/"));
    assert!(paths.keys().all(|p| !p.starts_with("/v1/admin")));
    assert!(paths.keys().all(|p| !p.starts_with("/v1/feature-flags")));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_docs_pages_point_at_schema(pool: PgPool) {
    for uri in ["/docs/", "/redoc/"] {
        let app = common::build_test_app(pool.clone());
        let response = get(app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains("/schema/"), "{uri}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_swagger_page_mounts_into_its_container(pool: PgPool) {
    let app = common::build_test_app(pool);
    let html = body_text(get(app, "/docs/").await).await;

    assert!(html.contains(r##"dom_id: "#swagger-ui""##));
    assert!(html.contains(r#"<div id="swagger-ui"></div>"#));
    assert!(html.trim_end().ends_with("</html>"));
}
