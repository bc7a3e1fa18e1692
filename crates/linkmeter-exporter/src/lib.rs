//! linkmeter exporter library entry.
//!
//! This crate wires config loading, the shared metric registry, the polling
//! scheduler, and the HTTP exposition endpoint into a runnable service. It is
//! intended to be consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod poll;
pub mod router;
pub mod source;
