mod common;

use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_endpoint() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_health_content_type() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(
        content_type.contains("text/plain"),
        "expected text/plain, got {content_type}"
    );
}

#[tokio::test]
async fn test_version_endpoint() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/version")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::parse_body(response).await;
    assert_eq!(body["name"], "soundserver");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_sha"].is_string());
}

#[tokio::test]
async fn test_not_found() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/sounds")
                .header("Origin", "http://example.com")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));
    assert!(response
        .headers()
        .contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_method_not_allowed() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/sounds")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri(soundserver::routes::OPENAPI_PATH)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let doc = common::parse_body(response).await;
    assert!(doc["openapi"].as_str().unwrap().starts_with("3."));

    let paths = &doc["paths"];
    assert!(paths["/health"]["get"].is_object());
    assert!(paths["/sounds"]["get"].is_object());
    assert!(paths["/sounds"]["post"].is_object());
    for method in ["get", "put", "delete"] {
        assert!(
            paths["/sounds/{sound_id}"][method].is_object(),
            "missing {method} /sounds/{{sound_id}}"
        );
    }
    assert!(doc["components"]["schemas"]["Sound"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_is_served() {
    let app = common::test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
