//! Tracing setup shared by the inventory binaries.

pub mod tracing;
