//! Dispatch gateway service library.
//!
//! Accepts dispatch requests over HTTP and pushes the resulting tasks onto
//! the Redis-backed task queue shared with the worker services.

pub mod routes;
pub mod startup;
