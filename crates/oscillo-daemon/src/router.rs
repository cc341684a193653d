//! Axum router wiring.
//!
//! Routes `/metrics` plus the health endpoints; every other path gets axum's default
//! 404. The interceptor stack wraps all of it, fallback included.

use axum::{routing::get, Router};
use tower::ServiceBuilder;

use crate::{app_state::AppState, obs::AccessLogLayer, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(AccessLogLayer))
}
