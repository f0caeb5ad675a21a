//! Shared domain types for MarketForge.
//!
//! This crate has no business logic: it defines the data shapes that flow
//! between the pipeline core, the SQLite persistence layer, and the REST
//! API, plus the error enums the whole workspace shares.

pub mod canvas;
pub mod config;
pub mod error;
pub mod llm;
pub mod pain;
pub mod project;
pub mod segment;
