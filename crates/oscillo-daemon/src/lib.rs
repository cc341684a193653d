//! oscillo daemon library entry.
//!
//! Wires the measurement registry, the periodic sampler, and the HTTP
//! exposition endpoint into one process. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod cli;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod sampler;
pub mod server;
