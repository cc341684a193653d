//! Shared application state for the HTTP side.
//!
//! Holds the registry handle (read-only use: snapshots), the sampler's
//! progress for readiness, and the snapshot encoder.

use std::sync::Arc;

use oscillo_core::Registry;

use crate::ops::{PrometheusEncoder, SnapshotEncoder};
use crate::sampler::Progress;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Registry,
    progress: Progress,
    encoder: Arc<dyn SnapshotEncoder>,
}

impl AppState {
    pub fn new(registry: Registry, progress: Progress) -> Self {
        Self::with_encoder(registry, progress, Arc::new(PrometheusEncoder))
    }

    pub fn with_encoder(
        registry: Registry,
        progress: Progress,
        encoder: Arc<dyn SnapshotEncoder>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                progress,
                encoder,
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn encoder(&self) -> &dyn SnapshotEncoder {
        self.inner.encoder.as_ref()
    }

    /// Ready once the sampler has written its first tick.
    pub fn is_ready(&self) -> bool {
        self.inner.progress.ticks() > 0
    }
}
