//! oscillo core: runtime-free measurement primitives.
//!
//! This crate holds the measurement registry, its snapshots, the exposition
//! encoder and the oscillation signal. It carries no async runtime or HTTP
//! dependencies so it can be exercised directly from tests.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here. Every fallible
//! path surfaces as `OscilloError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod oscillation;
pub mod registry;

pub use error::{ErrorKind, OscilloError, Result};
pub use exposition::Format;
pub use oscillation::Oscillation;
pub use registry::{Batch, GaugeHandle, Registry, Snapshot};
