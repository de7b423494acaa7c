//! Task-distribution pipeline for machine inventory collection.
//!
//! The crate moves a single kind of unit of work ("collect machine inventory")
//! from a command source, through a pool of workers, to a durable sink, while
//! respecting bounded-queue capacity limits and shutting down without losing
//! or duplicating in-flight work.
//!
//! The pipeline logic is written once against the [`channel::BoundedQueue`]
//! contract and runs unchanged on two backings: an in-memory queue for the
//! single-process agent and a Redis list shared by independent processes.

pub mod channel;
pub mod collector;
pub mod dispatcher;
pub mod error;
mod macros;
pub mod persist;
pub mod pipeline;
pub mod types;
pub mod workers;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
