//! Pain persistence trait: canonical pains and the ranking overlay.

use std::future::Future;

use uuid::Uuid;

use marketforge_types::error::RepositoryError;
use marketforge_types::pain::{Pain, PainRanking};

/// Persistence interface for canonical pains and their ranking overlay.
///
/// The store performs no cross-table joins: the overlay is read in a
/// separate query and joined onto pains in-process by `pain_id`.
pub trait PainRepository: Send + Sync {
    /// Approved pains for one segment, ordered by `pain_index`.
    fn list_for_segment(
        &self,
        segment_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<Pain>, RepositoryError>> + Send;

    /// Load one canonical pain by id.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<Pain>, RepositoryError>> + Send;

    /// Insert one canonical pain row.
    fn insert(
        &self,
        pain: Pain,
    ) -> impl Future<Output = Result<Pain, RepositoryError>> + Send;

    /// All ranking overlay rows for a project.
    fn list_rankings_for_project(
        &self,
        project_id: &Uuid,
    ) -> impl Future<Output = Result<Vec<PainRanking>, RepositoryError>> + Send;

    /// Insert one ranking overlay row.
    fn insert_ranking(
        &self,
        ranking: PainRanking,
    ) -> impl Future<Output = Result<PainRanking, RepositoryError>> + Send;
}
