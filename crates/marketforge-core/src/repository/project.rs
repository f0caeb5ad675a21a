//! Project persistence trait.

use std::future::Future;

use uuid::Uuid;

use marketforge_types::error::RepositoryError;
use marketforge_types::project::{Project, WorkflowStep};

/// Persistence interface for projects.
///
/// `set_current_step` is the single write path for the step pointer:
/// last writer wins, no optimistic-concurrency token. The pointer only
/// gates UI navigation, so a lost race costs nothing but a stale gate.
pub trait ProjectRepository: Send + Sync {
    /// Load a project by id. `None` when it does not exist.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl Future<Output = Result<Option<Project>, RepositoryError>> + Send;

    /// Insert a new project row.
    fn insert(
        &self,
        project: Project,
    ) -> impl Future<Output = Result<Project, RepositoryError>> + Send;

    /// Advance the step pointer. Errors with `NotFound` when the project
    /// does not exist.
    fn set_current_step(
        &self,
        id: &Uuid,
        step: WorkflowStep,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
