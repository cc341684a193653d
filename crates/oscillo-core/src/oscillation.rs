//! Synthetic periodic signal.
//!
//! `2 + sin(sin(2π · t / period))`: smooth, bounded to `[1, 3]`, and periodic
//! in `period`. It is a pure function of elapsed time; the caller owns the clock.

use std::f64::consts::TAU;
use std::time::Duration;

use crate::error::{OscilloError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    period: Duration,
}

impl Oscillation {
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(OscilloError::InvalidConfig("oscillation period must be non-zero".into()));
        }
        Ok(Self { period })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        // Reduce to a phase in [0, 1) first so very long uptimes keep precision.
        let period = self.period.as_nanos();
        let phase = (elapsed.as_nanos() % period) as f64 / period as f64;
        2.0 + (TAU * phase).sin().sin()
    }
}
