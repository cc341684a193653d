//! Operational HTTP endpoints.
//!
//! - `/healthz` : liveness
//! - `/readyz`  : readiness (503 until the first sampler tick)
//! - `/metrics` : Prometheus text, or OpenMetrics when the `Accept` header asks for it

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use oscillo_core::error::Result;
use oscillo_core::exposition;
use oscillo_core::{Format, Snapshot};

use crate::app_state::AppState;

/// Turns a snapshot into a response body.
pub trait SnapshotEncoder: Send + Sync {
    fn encode(&self, snapshot: &Snapshot, format: Format) -> Result<String>;
}

/// The built-in text encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusEncoder;

impl SnapshotEncoder for PrometheusEncoder {
    fn encode(&self, snapshot: &Snapshot, format: Format) -> Result<String> {
        exposition::encode_to_string(snapshot, format)
    }
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "warming up")
    }
}

pub async fn metrics(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let format = Format::negotiate(accept);
    let snapshot = state.registry().snapshot();

    match state.encoder().encode(&snapshot, format) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, format.content_type())],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(
                error = %e,
                code = e.kind().as_str(),
                ?format,
                "metrics encoding failed"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed\n").into_response()
        }
    }
}
