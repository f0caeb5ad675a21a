//! SQLite project repository implementation.

use marketforge_core::repository::ProjectRepository;
use marketforge_types::error::RepositoryError;
use marketforge_types::project::{Project, WorkflowStep};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ProjectRepository`.
pub struct SqliteProjectRepository {
    pool: DatabasePool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Projects owned by a user, newest first. Used by the HTTP listing
    /// endpoint rather than the pipeline itself.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Project>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM projects WHERE user_id = ? ORDER BY created_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_project).collect()
    }
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let user_id: String = row
        .try_get("user_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let current_step: String = row
        .try_get("current_step")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let onboarding: String = row
        .try_get("onboarding")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let updated_at: String = row
        .try_get("updated_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    let current_step: WorkflowStep = current_step
        .parse()
        .map_err(|e: String| RepositoryError::Query(e))?;
    let onboarding: serde_json::Value = serde_json::from_str(&onboarding)
        .map_err(|e| RepositoryError::Query(format!("invalid onboarding JSON: {e}")))?;

    Ok(Project {
        id: parse_uuid(&id)?,
        user_id,
        name,
        current_step,
        onboarding,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl ProjectRepository for SqliteProjectRepository {
    async fn get(&self, id: &Uuid) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_project).transpose()
    }

    async fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        let onboarding = serde_json::to_string(&project.onboarding)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        sqlx::query(
            "INSERT INTO projects (id, user_id, name, current_step, onboarding, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.id.to_string())
        .bind(&project.user_id)
        .bind(&project.name)
        .bind(project.current_step.as_str())
        .bind(&onboarding)
        .bind(format_datetime(&project.created_at))
        .bind(format_datetime(&project.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(project)
    }

    async fn set_current_step(
        &self,
        id: &Uuid,
        step: WorkflowStep,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE projects SET current_step = ?, updated_at = ? WHERE id = ?")
            .bind(step.as_str())
            .bind(format_datetime(&chrono::Utc::now()))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
