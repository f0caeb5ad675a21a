//! BoxTextProvider -- object-safe dynamic dispatch wrapper for TextProvider.
//!
//! `TextProvider` uses RPITIT and so cannot be a trait object directly.
//! The pattern: an object-safe `TextProviderDyn` trait with boxed
//! futures, a blanket impl for every `TextProvider`, and a wrapper struct
//! that delegates. This lets the app pick the concrete provider at
//! runtime (real HTTP client in production, mock in tests) without
//! making every pipeline service generic over it.

use std::future::Future;
use std::pin::Pin;

use marketforge_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::provider::TextProvider;

/// Object-safe version of [`TextProvider`] with boxed futures.
pub trait TextProviderDyn: Send + Sync {
    fn name(&self) -> &str;

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>>;
}

/// Blanket implementation: any `TextProvider` automatically implements
/// `TextProviderDyn`.
impl<T: TextProvider> TextProviderDyn for T {
    fn name(&self) -> &str {
        TextProvider::name(self)
    }

    fn complete_boxed<'a>(
        &'a self,
        request: &'a CompletionRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CompletionResponse, LlmError>> + Send + 'a>> {
        Box::pin(self.complete(request))
    }
}

/// Type-erased generative-text provider.
pub struct BoxTextProvider {
    inner: Box<dyn TextProviderDyn + Send + Sync>,
}

impl BoxTextProvider {
    /// Wrap a concrete `TextProvider` in a type-erased box.
    pub fn new<T: TextProvider + 'static>(provider: T) -> Self {
        Self { inner: Box::new(provider) }
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.inner.complete_boxed(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketforge_types::llm::{Message, MessageRole, Usage};

    struct EchoProvider;

    impl TextProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                id: "msg_echo".to_string(),
                content: request.messages[0].content.clone(),
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    #[tokio::test]
    async fn test_boxed_provider_delegates() {
        let provider = BoxTextProvider::new(EchoProvider);
        assert_eq!(provider.name(), "echo");

        let request = CompletionRequest {
            model: "m".to_string(),
            messages: vec![Message {
                role: MessageRole::User,
                content: "ping".to_string(),
            }],
            system: None,
            max_tokens: 16,
            temperature: None,
        };
        let response = provider.complete(&request).await.unwrap();
        assert_eq!(response.content, "ping");
    }
}
