//! Shared building blocks for the Crumbs service: configuration loading,
//! tracing setup, health probes, request ids, serde helpers and sea-orm
//! query extensions.

pub mod config;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
