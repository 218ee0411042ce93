//! HTTP API tests, driving the router in-process

use crate::{test_config, test_service};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pagemeta::server::router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_url(url: &str) -> Request<Body> {
    Request::post("/api/urls")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "url": url }).to_string()))
        .unwrap()
}

async fn site() -> MockServer {
    let site = MockServer::start().await;

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(
                    r#"<!DOCTYPE html><html><head><title>Home</title></head>
                    <body><h1>Hi</h1><a href="/a">A</a><a href="/missing">M</a></body></html>"#,
                )
                .insert_header("content-type", "text/html"),
        )
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    site
}

#[tokio::test]
async fn test_crawl_list_recrawl_delete() {
    let site = site().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("api.db"));
    let app = router(test_service(&config));

    let (status, body) = send(&app, post_url(&site.uri())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["url"]["url"], site.uri());
    assert_eq!(body["url"]["status"], "done");
    assert_eq!(body["metadata"]["html_version"], "HTML5");
    assert_eq!(body["metadata"]["title"], "Home");
    assert_eq!(body["metadata"]["h1_count"], 1);
    assert_eq!(body["metadata"]["internal_links"], 2);
    assert_eq!(body["metadata"]["broken_links"], json!([]));
    let id = body["url"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Request::get("/api/urls").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["title"], "Home");

    let recrawl = Request::post(format!("/api/urls/{}/recrawl", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, recrawl).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"]["id"], id);

    let delete = Request::delete(format!("/api/urls/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Deleted" }));

    let (_, body) = send(&app, Request::get("/api/urls").body(Body::empty()).unwrap()).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_failed_crawl_returns_bad_gateway_and_is_stored() {
    let site = site().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("api.db"));
    let app = router(test_service(&config));

    let (status, body) = send(&app, post_url(&format!("{}/down", site.uri()))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("HTTP 500"));
    assert_eq!(body["url"]["status"], "failed");

    let (_, body) = send(&app, Request::get("/api/urls").body(Body::empty()).unwrap()).await;
    assert_eq!(body[0]["status"], "failed");
    assert!(body[0].get("html_version").is_none());
}

#[tokio::test]
async fn test_delete_all() {
    let site = site().await;
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("api.db"));
    let app = router(test_service(&config));

    send(&app, post_url(&site.uri())).await;
    send(&app, post_url(&format!("{}/down", site.uri()))).await;

    let (status, body) = send(&app, Request::delete("/api/urls").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "All URLs deleted" }));

    let (_, body) = send(&app, Request::get("/api/urls").body(Body::empty()).unwrap()).await;
    assert_eq!(body, json!([]));
}
