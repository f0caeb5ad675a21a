//! Canvas persistence trait.

use std::future::Future;

use uuid::Uuid;

use marketforge_types::canvas::Canvas;
use marketforge_types::error::RepositoryError;

/// Persistence interface for canonical value-proposition canvases.
pub trait CanvasRepository: Send + Sync {
    /// The canvas for one segment, if approved.
    fn get_for_segment(
        &self,
        segment_id: &Uuid,
    ) -> impl Future<Output = Result<Option<Canvas>, RepositoryError>> + Send;

    /// Insert one canonical canvas row.
    fn insert(
        &self,
        canvas: Canvas,
    ) -> impl Future<Output = Result<Canvas, RepositoryError>> + Send;
}
