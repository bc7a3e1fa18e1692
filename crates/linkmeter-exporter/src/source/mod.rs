//! Counter source implementations.

pub mod tr064;
