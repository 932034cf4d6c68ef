//! Health and metrics endpoints using Axum

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

use crate::error::CycleError;
use crate::metrics::Metrics;
use crate::models::intent::OrderIntent;

const SERVICE_NAME: &str = "kumo-trading-engine";

/// Consecutive failed cycles before the service reports itself degraded
pub const DEGRADED_AFTER_FAILURES: u32 = 3;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub last_cycle_at: Option<DateTime<Utc>>,
    pub last_action: Option<String>,
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
            last_cycle_at: None,
            last_action: None,
            last_error: None,
            consecutive_failures: 0,
        }
    }
}

impl HealthStatus {
    pub fn record_cycle(&mut self, result: &Result<OrderIntent, CycleError>) {
        self.last_cycle_at = Some(Utc::now());
        match result {
            Ok(intent) => {
                self.last_action = Some(intent.action.to_string());
                self.last_error = None;
                self.consecutive_failures = 0;
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.consecutive_failures += 1;
            }
        }
        self.status = if self.consecutive_failures >= DEGRADED_AFTER_FAILURES {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        };
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": SERVICE_NAME,
        "last_cycle_at": health.last_cycle_at.map(|t| t.to_rfc3339()),
        "last_action": health.last_action,
        "last_error": health.last_error,
        "consecutive_failures": health.consecutive_failures,
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    state.metrics.http_requests_in_flight.dec();

    let duration = start.elapsed();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if response.status().is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %response.status(),
            duration_ms = duration.as_millis() as u64,
            "HTTP request error"
        );
    }

    response
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            metrics_middleware,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
        )
        .with_state(state)
}

pub async fn start_server(port: u16, state: AppState) -> Result<(), std::io::Error> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await
}
