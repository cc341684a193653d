//! Top-level facade crate for oscillo.
//!
//! Re-exports the core primitives and the daemon library so users can depend on a single crate.

pub mod core {
    pub use oscillo_core::*;
}

pub mod daemon {
    pub use oscillo_daemon::*;
}
