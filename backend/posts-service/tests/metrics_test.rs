//! Integration Tests: Request Metrics
//!
//! Verifies that every request is counted once, under its raw path, before
//! routing, and that `/metrics` renders the Prometheus text format.

mod common;

use actix_web::{http::header, http::StatusCode, test};
use posts_service::build_app;
use serde_json::json;

#[actix_web::test]
async fn test_metrics_counts_requests_by_method_and_path() {
    let (_dir, state) = common::test_state().await;
    let app = test::init_service(build_app(state.clone())).await;

    for _ in 0..3 {
        let req = test::TestRequest::get().uri("/api/posts").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({"title": "T", "content": "C"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/metrics").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/plain"), "{}", content_type);

    let body = test::read_body(resp).await;
    let text = String::from_utf8(body.to_vec()).unwrap();

    assert!(text.contains("# TYPE simple_app_requests_total counter"));
    assert!(text.contains(r#"simple_app_requests_total{endpoint="/api/posts",method="GET"} 3"#));
    assert!(text.contains(r#"simple_app_requests_total{endpoint="/api/posts",method="POST"} 1"#));
    // The scrape itself is counted before the handler renders
    assert!(text.contains(r#"simple_app_requests_total{endpoint="/metrics",method="GET"} 1"#));
    assert!(text.contains("db_pool_connections"));
}

#[actix_web::test]
async fn test_unmatched_paths_are_counted_under_raw_path() {
    let (_dir, state) = common::test_state().await;
    let app = test::init_service(build_app(state.clone())).await;

    let req = test::TestRequest::get().uri("/does/not/exist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete().uri("/api/posts/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/posts/7?ignored=1")
        .set_json(json!({"title": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let metrics = state.metrics();
    assert_eq!(metrics.request_count("GET", "/does/not/exist"), 1);
    assert_eq!(metrics.request_count("DELETE", "/api/posts/abc"), 1);
    assert_eq!(metrics.request_count("PUT", "/api/posts/7"), 1);
}

#[actix_web::test]
async fn test_preflight_requests_are_counted() {
    let (_dir, state) = common::test_state().await;
    let app = test::init_service(build_app(state.clone())).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/posts")
        .insert_header((header::ORIGIN, "http://example.com"))
        .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    assert_eq!(state.metrics().request_count("OPTIONS", "/api/posts"), 1);
}

#[actix_web::test]
async fn test_separate_states_do_not_share_counters() {
    let (_dir_a, state_a) = common::test_state().await;
    let (_dir_b, state_b) = common::test_state().await;
    let app = test::init_service(build_app(state_a.clone())).await;

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    test::call_service(&app, req).await;

    assert_eq!(state_a.metrics().request_count("GET", "/api/posts"), 1);
    assert_eq!(state_b.metrics().request_count("GET", "/api/posts"), 0);
}
