//! Top-level facade crate for linkmeter.
//!
//! Re-exports the core types and the exporter library so users can depend on
//! a single crate.

pub mod core {
    pub use linkmeter_core::*;
}

pub mod exporter {
    pub use linkmeter_exporter::*;
}
