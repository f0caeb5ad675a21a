//! Project handlers: creation, reads for UI gating, draft reset.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketforge_core::repository::{DraftRepository, ProjectRepository};
use marketforge_types::error::PipelineError;
use marketforge_types::project::{Project, WorkflowStep};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

use super::require_owned_project;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    /// Onboarding context the segment generator consumes. Optional at
    /// creation; segment generation rejects projects where it is null.
    #[serde(default)]
    pub onboarding: serde_json::Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub success: bool,
    pub project: ProjectBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBody {
    pub id: Uuid,
    pub name: String,
    pub current_step: WorkflowStep,
    pub onboarding: serde_json::Value,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<Project> for ProjectBody {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            name: p.name,
            current_step: p.current_step,
            onboarding: p.onboarding,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// POST /api/v1/projects - create a project at the onboarding step.
pub async fn create(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<CreateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Pipeline(PipelineError::Validation(
            "project name must not be empty".to_string(),
        )));
    }

    let now = Utc::now();
    let project = Project {
        id: Uuid::now_v7(),
        user_id: auth.user_id,
        name: body.name,
        current_step: WorkflowStep::Onboarding,
        onboarding: body.onboarding,
        created_at: now,
        updated_at: now,
    };

    let project = state
        .projects
        .insert(project)
        .await
        .map_err(PipelineError::from)?;

    Ok(Json(ProjectResponse { success: true, project: project.into() }))
}

/// GET /api/v1/projects - the caller's projects, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: Authenticated,
) -> Result<Json<serde_json::Value>, AppError> {
    let projects = state
        .projects
        .list_for_user(&auth.user_id)
        .await
        .map_err(PipelineError::from)?;

    let bodies: Vec<ProjectBody> = projects.into_iter().map(Into::into).collect();
    Ok(Json(serde_json::json!({
        "success": true,
        "projects": bodies,
    })))
}

/// GET /api/v1/projects/{id} - one project, with its current step for
/// UI gating.
pub async fn get(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = require_owned_project(&state, &id, &auth.user_id).await?;
    Ok(Json(ProjectResponse { success: true, project: project.into() }))
}

/// DELETE /api/v1/projects/{id}/drafts - delete every draft row of the
/// project across all stages. Canonical rows are untouched.
pub async fn reset_drafts(
    State(state): State<AppState>,
    auth: Authenticated,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    require_owned_project(&state, &id, &auth.user_id).await?;

    let deleted = state
        .drafts
        .delete_all_for_project(&id)
        .await
        .map_err(PipelineError::from)?;

    tracing::info!(project_id = %id, deleted, "draft reset");
    Ok(Json(serde_json::json!({
        "success": true,
        "deleted": deleted,
    })))
}
