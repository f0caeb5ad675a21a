//! Generative-text provider abstraction: the provider trait, its
//! type-erased wrapper, the retry policy, and the response normalizer.

pub mod box_provider;
pub mod normalize;
pub mod provider;
pub mod retry;

pub use box_provider::BoxTextProvider;
pub use provider::TextProvider;
pub use retry::RetryPolicy;
