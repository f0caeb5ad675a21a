//! Draft persistence trait covering all five draft tables.
//!
//! Drafts are additive: generator runs insert new rows stamped with a
//! higher version and never touch earlier cohorts. Approval reads drafts
//! by id, always filtered to the owning project (and segment when the
//! caller scoped the request) so cross-tenant ids simply fail to load.
//! Deletion happens only through the explicit per-project reset.

use std::future::Future;

use uuid::Uuid;

use marketforge_types::canvas::CanvasDraft;
use marketforge_types::error::RepositoryError;
use marketforge_types::pain::{PainDraft, RankingDraft};
use marketforge_types::segment::{DetailDraft, SegmentDraft};

/// Persistence interface for draft rows of every stage.
pub trait DraftRepository: Send + Sync {
    // -- segment drafts -----------------------------------------------

    fn insert_segment_drafts(
        &self,
        drafts: Vec<SegmentDraft>,
    ) -> impl Future<Output = Result<Vec<SegmentDraft>, RepositoryError>> + Send;

    fn segment_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
    ) -> impl Future<Output = Result<Vec<SegmentDraft>, RepositoryError>> + Send;

    /// Highest version among the project's segment drafts, 0 when none.
    fn latest_segment_draft_version(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    // -- canvas drafts ------------------------------------------------

    fn insert_canvas_drafts(
        &self,
        drafts: Vec<CanvasDraft>,
    ) -> impl Future<Output = Result<Vec<CanvasDraft>, RepositoryError>> + Send;

    fn canvas_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> impl Future<Output = Result<Vec<CanvasDraft>, RepositoryError>> + Send;

    fn latest_canvas_draft_version(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    // -- pain drafts --------------------------------------------------

    fn insert_pain_drafts(
        &self,
        drafts: Vec<PainDraft>,
    ) -> impl Future<Output = Result<Vec<PainDraft>, RepositoryError>> + Send;

    fn pain_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> impl Future<Output = Result<Vec<PainDraft>, RepositoryError>> + Send;

    fn latest_pain_draft_version(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    // -- ranking drafts -----------------------------------------------

    fn insert_ranking_drafts(
        &self,
        drafts: Vec<RankingDraft>,
    ) -> impl Future<Output = Result<Vec<RankingDraft>, RepositoryError>> + Send;

    fn ranking_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> impl Future<Output = Result<Vec<RankingDraft>, RepositoryError>> + Send;

    fn latest_ranking_draft_version(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    // -- detail drafts ------------------------------------------------

    fn insert_detail_drafts(
        &self,
        drafts: Vec<DetailDraft>,
    ) -> impl Future<Output = Result<Vec<DetailDraft>, RepositoryError>> + Send;

    fn detail_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> impl Future<Output = Result<Vec<DetailDraft>, RepositoryError>> + Send;

    fn latest_detail_draft_version(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<i64, RepositoryError>> + Send;

    // -- reset --------------------------------------------------------

    /// Delete every draft row of the project across all five tables.
    /// Returns the total affected row count.
    fn delete_all_for_project(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;
}
