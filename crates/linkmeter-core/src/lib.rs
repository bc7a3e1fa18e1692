//! linkmeter core: counter sampling, metric registry, and exposition rendering.
//!
//! This crate holds the runtime-free domain logic shared by the exporter and
//! by tooling: the value model, the rate sampler that turns cumulative
//! counters into per-second rates, the concurrent metric registry, and the
//! text renderer a pull-based collector scrapes. It intentionally carries no
//! transport dependencies so it can be reused in multiple contexts.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `LinkMeterError`/`Result` so a failed
//! counter fetch or a malformed write never crashes the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod expose;
pub mod registry;
pub mod sampler;
pub mod value;

/// Shared result type.
pub use error::{LinkMeterError, Result};
