use std::path::PathBuf;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use triage_api::build_app;
use triage_core::{Intent, ResponseBank};

fn artifacts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts")
}

fn predict_request(message: &str, with_key: bool) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/predict")
        .header("content-type", "application/json");
    if with_key {
        builder = builder.header("x-api-key", "dev-triage-key");
    }
    builder
        .body(Body::from(json!({ "message": message }).to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

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
    let parsed = response_json(response).await;
    assert_eq!(parsed["status"], "ok");
    assert!(parsed["labels"]
        .as_array()
        .unwrap()
        .iter()
        .any(|label| label == "order_status"));
}

#[tokio::test]
async fn predict_requires_api_key() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let response = app
        .oneshot(predict_request("where is my order", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn predict_resolves_a_clear_order_message() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let response = app
        .oneshot(predict_request("where is my order", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = response_json(response).await;
    assert_eq!(parsed["intent"], "order_status");

    let confidence = parsed["confidence"].as_f64().unwrap();
    assert!(confidence > 0.35 && confidence <= 1.0, "got {confidence}");
    // Wire confidence is rounded to three decimals.
    assert!((confidence * 1000.0 - (confidence * 1000.0).round()).abs() < 1e-9);

    let reply = parsed["response"].as_str().unwrap();
    let bank = ResponseBank::default();
    assert!(bank
        .candidates(Intent::OrderStatus)
        .iter()
        .any(|candidate| candidate == reply));
}

#[tokio::test]
async fn refund_wording_beats_order_wording_when_scores_are_close() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let response = app
        .oneshot(predict_request("refund my order please", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = response_json(response).await;
    assert_eq!(parsed["intent"], "refund_query");
}

#[tokio::test]
async fn off_topic_message_falls_back() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let response = app
        .oneshot(predict_request("hello there", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = response_json(response).await;
    assert_eq!(parsed["intent"], "fallback");

    let reply = parsed["response"].as_str().unwrap();
    let bank = ResponseBank::default();
    assert!(bank
        .candidates(Intent::Fallback)
        .iter()
        .any(|candidate| candidate == reply));
}

#[tokio::test]
async fn empty_message_falls_back_instead_of_erroring() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let response = app.oneshot(predict_request("", true)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let parsed = response_json(response).await;
    assert_eq!(parsed["intent"], "fallback");
}

#[tokio::test]
async fn missing_message_field_is_a_client_error() {
    let app = build_app(artifacts_dir()).await.expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/predict")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-triage-key")
        .body(Body::from(json!({ "text": "hi" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
