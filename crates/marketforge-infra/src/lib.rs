//! Infrastructure layer for MarketForge.
//!
//! Contains implementations of the repository traits defined in
//! `marketforge-core`: SQLite storage behind a split read/write pool, the
//! Anthropic HTTP provider, and the configuration loader.

pub mod config;
pub mod llm;
pub mod sqlite;
