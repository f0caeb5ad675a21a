//! Segment persistence trait: canonical segments plus the final
//! (detail-enriched) segment set.

use std::future::Future;

use uuid::Uuid;

use marketforge_types::error::RepositoryError;
use marketforge_types::segment::{FinalSegment, Segment};

/// Persistence interface for canonical and final segments.
pub trait SegmentRepository: Send + Sync {
    /// All canonical segments of a project, ordered by `segment_index`
    /// ascending. The ordering is load-bearing: it is the deterministic
    /// iteration order for per-segment generation passes.
    fn list_for_project(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<Segment>, RepositoryError>> + Send;

    /// Load one canonical segment by id.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<Segment>, RepositoryError>> + Send;

    /// Insert one canonical segment row.
    fn insert(
        &self,
        segment: Segment,
    ) -> impl Future<Output = Result<Segment, RepositoryError>> + Send;

    /// All final segments of a project, ordered by `segment_index`.
    fn list_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<FinalSegment>, RepositoryError>> + Send;

    /// Delete the project's final segment set. Returns the affected row
    /// count. Part of the replace-all details approval.
    fn delete_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Insert one final segment row.
    fn insert_final(
        &self,
        segment: FinalSegment,
    ) -> impl Future<Output = Result<FinalSegment, RepositoryError>> + Send;
}
