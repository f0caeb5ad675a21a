//! TextProvider trait definition.
//!
//! The one abstraction over the external generative-text provider. Uses
//! native async fn in traits (RPITIT) consistent with all async traits in
//! this project; implementations live in marketforge-infra (e.g.
//! `AnthropicProvider`).

use std::future::Future;

use marketforge_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generative-text provider backends.
///
/// The pipeline only consumes whole responses, so there is no streaming
/// surface. Callers must treat the response as untrusted text: the
/// normalizer and stage-specific shape expectations are the only schema
/// contract.
pub trait TextProvider: Send + Sync {
    /// Human-readable provider name (e.g., "anthropic", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
