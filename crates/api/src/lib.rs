use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use triage_agents::TriageAgent;
use triage_core::{KeywordSets, ResolveParams, ResponseBank};
use triage_ml::ClassifierAdapter;
use triage_observability::AppMetrics;

#[derive(Clone)]
pub struct ApiState {
    pub agent: Arc<TriageAgent>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: triage_observability::MetricsSnapshot,
    labels: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct PredictResponse {
    intent: &'static str,
    confidence: f64,
    response: String,
}

pub async fn build_app(artifacts_dir: impl AsRef<Path>) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let adapter = ClassifierAdapter::load(artifacts_dir)
        .context("failed to load classifier artifacts")?;

    let agent = Arc::new(TriageAgent::new(
        Arc::new(adapter),
        KeywordSets::default(),
        ResponseBank::default(),
        resolve_params_from_env(),
        metrics.clone(),
    ));

    let api_key = env::var("TRIAGE_API_KEY").unwrap_or_else(|_| "dev-triage-key".to_string());

    let state = ApiState {
        agent,
        metrics,
        api_key,
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/predict", post(predict))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        labels: state.agent.labels().names(),
    })
}

async fn predict(
    State(state): State<ApiState>,
    Json(request): Json<PredictRequest>,
) -> Response {
    match state.agent.handle_message(request.message).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(PredictResponse {
                intent: outcome.intent.as_label(),
                confidence: round3(outcome.confidence),
                response: outcome.reply,
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(error = %error, "predict pipeline failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "internal",
                    "message": "prediction failed"
                })),
            )
                .into_response()
        }
    }
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || is_public_endpoint(request.uri().path()) {
        return next.run(request).await;
    }

    let header_key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if header_key == state.api_key {
        return next.run(request).await;
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "unauthorized",
            "message": "missing or invalid x-api-key"
        })),
    )
        .into_response()
}

fn is_public_endpoint(path: &str) -> bool {
    path == "/health"
}

fn build_cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = env::var("TRIAGE_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

fn resolve_params_from_env() -> ResolveParams {
    let mut params = ResolveParams::default();
    if let Some(value) = env_f32("TRIAGE_MIN_CONFIDENCE") {
        params.min_conf = value;
    }
    if let Some(value) = env_f32("TRIAGE_MARGIN") {
        params.margin = value;
    }
    params
}

fn env_f32(name: &str) -> Option<f32> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}

/// Confidence is reported rounded to three decimals on the wire.
fn round3(value: f32) -> f64 {
    (value as f64 * 1000.0).round() / 1000.0
}
