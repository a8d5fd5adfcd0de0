//! Shared plumbing for wordwell services: config loading, health endpoints,
//! request-id middleware and tracing setup.

pub mod config;
pub mod health;
pub mod middleware;
pub mod tracing;
