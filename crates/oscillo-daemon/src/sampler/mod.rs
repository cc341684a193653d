//! Periodic sampler.
//!
//! Each tick performs two writes into the registry, applied as one batch so
//! scrapers never see values from different ticks:
//! - `kind="instance"`: a counter, +1 per tick
//! - `kind="oscillation"`: `2 + sin(sin(2π · elapsed / period))`
//!
//! The loop runs on a tokio interval and skips missed ticks instead of
//! catching up.

mod clock;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};

use oscillo_core::error::{OscilloError, Result};
use oscillo_core::{Batch, GaugeHandle, Oscillation, Registry};

use crate::config::SamplerSection;

pub use clock::{Clock, ManualClock, MonotonicClock};

pub const KIND_LABEL: &str = "kind";
pub const INSTANCE: &str = "instance";
pub const OSCILLATION: &str = "oscillation";

const HELP: &str =
    "Synthetic samples: tick counter (kind=instance) and nested-sine signal (kind=oscillation).";

/// Number of completed ticks, readable from other tasks.
#[derive(Debug, Clone, Default)]
pub struct Progress(Arc<AtomicU64>);

impl Progress {
    pub fn ticks(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    fn record(&self, tick: u64) {
        self.0.store(tick, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub elapsed: Duration,
    pub oscillation: f64,
}

pub struct Sampler<C = MonotonicClock> {
    registry: Registry,
    handle: GaugeHandle,
    oscillation: Oscillation,
    interval: Duration,
    clock: C,
    count: u64,
    progress: Progress,
}

impl Sampler<MonotonicClock> {
    /// Register the sample family and start the clock.
    pub fn new(registry: Registry, cfg: &SamplerSection) -> Result<Self> {
        Self::with_clock(registry, cfg, MonotonicClock::start())
    }
}

impl<C: Clock> Sampler<C> {
    pub fn with_clock(registry: Registry, cfg: &SamplerSection, clock: C) -> Result<Self> {
        if cfg.interval.is_zero() {
            return Err(OscilloError::InvalidConfig("sampler interval must be non-zero".into()));
        }
        let oscillation = Oscillation::new(cfg.period)?;
        let handle = registry.register(&cfg.metric_name, HELP, &[KIND_LABEL])?;
        Ok(Self {
            registry,
            handle,
            oscillation,
            interval: cfg.interval,
            clock,
            count: 0,
            progress: Progress::default(),
        })
    }

    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    pub fn handle(&self) -> &GaugeHandle {
        &self.handle
    }

    /// Run one sampling step.
    pub fn tick(&mut self) -> Result<TickReport> {
        let tick = self.count + 1;
        let elapsed = self.clock.elapsed();
        let oscillation = self.oscillation.value_at(elapsed);

        let mut batch = Batch::new();
        batch
            .set(&self.handle, &[INSTANCE], tick as f64)
            .set(&self.handle, &[OSCILLATION], oscillation);
        self.registry.apply(batch)?;

        self.count = tick;
        self.progress.record(tick);
        tracing::info!(tick, oscillation, "sampler heartbeat");

        Ok(TickReport {
            tick,
            elapsed,
            oscillation,
        })
    }

    /// Tick once per interval until the process exits. The first tick fires
    /// one interval after start.
    ///
    /// Returns only if a tick fails, which means the sampler itself is broken.
    pub async fn run(mut self) -> Result<()> {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            interval = ?self.interval,
            period = ?self.oscillation.period(),
            family = self.handle.name(),
            "sampler started"
        );
        loop {
            ticker.tick().await;
            self.tick()?;
        }
    }
}
