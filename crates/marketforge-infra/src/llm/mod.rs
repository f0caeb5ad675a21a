//! Concrete generative-text providers.

pub mod anthropic;

pub use anthropic::AnthropicProvider;
