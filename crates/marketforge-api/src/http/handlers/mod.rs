//! REST API handlers.

pub mod approve;
pub mod generate;
pub mod project;

use marketforge_core::repository::ProjectRepository;
use marketforge_types::error::PipelineError;
use marketforge_types::project::Project;
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

/// Load a project and verify the caller owns it.
async fn require_owned_project(
    state: &AppState,
    project_id: &Uuid,
    user_id: &str,
) -> Result<Project, AppError> {
    let project = state
        .projects
        .get(project_id)
        .await
        .map_err(PipelineError::from)?
        .ok_or_else(|| AppError::Pipeline(PipelineError::NotFound("project".to_string())))?;

    if project.user_id != user_id {
        return Err(AppError::Forbidden(
            "project belongs to another user".to_string(),
        ));
    }
    Ok(project)
}
