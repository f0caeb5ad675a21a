//! Observability for MarketForge.

pub mod tracing_setup;
