//! Schema and interactive API documentation pages.

use axum::response::{Html, IntoResponse};
use axum::Json;

use crate::openapi;

const SWAGGER_UI: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>MOSAIC Aircraft Catalog API</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/schema/", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

const REDOC: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>MOSAIC Aircraft Catalog API</title>
</head>
<body>
  <redoc spec-url="/schema/"></redoc>
  <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
</body>
</html>
"#;

/// GET /schema/
pub async fn schema() -> impl IntoResponse {
    Json(openapi::public_document())
}

/// GET /docs/
pub async fn swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI)
}

/// GET /redoc/
pub async fn redoc() -> impl IntoResponse {
    Html(REDOC)
}
