//! Pipeline logic and repository traits for MarketForge.
//!
//! The core is storage- and transport-agnostic: persistence is reached
//! through the RPITIT repository traits in [`repository`], and the
//! generative-text provider through [`llm::provider::TextProvider`].
//! Concrete implementations live in marketforge-infra.

pub mod llm;
pub mod pipeline;
pub mod repository;
pub mod step;
