//! REST API layer: router, error translation, auth, handlers.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
