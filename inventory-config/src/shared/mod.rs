//! Shared configuration types for the inventory services.

mod agent;
mod base;
mod gateway;
mod pool;
mod queue;
mod redis;
mod service;
mod worker;
mod writer;

pub use agent::AgentConfig;
pub use base::ValidationError;
pub use gateway::GatewayConfig;
pub use pool::PoolConfig;
pub use queue::QueueConfig;
pub use redis::RedisConfig;
pub use service::ServiceConfig;
pub use worker::WorkerConfig;
pub use writer::WriterConfig;
