//! SQLite canvas repository implementation.

use marketforge_core::repository::CanvasRepository;
use marketforge_types::canvas::Canvas;
use marketforge_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `CanvasRepository`.
pub struct SqliteCanvasRepository {
    pool: DatabasePool,
}

impl SqliteCanvasRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_canvas(row: &sqlx::sqlite::SqliteRow) -> Result<Canvas, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let project_id: String = row
        .try_get("project_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let segment_id: String = row
        .try_get("segment_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Canvas {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_id: parse_uuid(&segment_id)?,
        jobs: row
            .try_get("jobs")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        pains: row
            .try_get("pains")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        gains: row
            .try_get("gains")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl CanvasRepository for SqliteCanvasRepository {
    async fn get_for_segment(
        &self,
        segment_id: &Uuid,
    ) -> Result<Option<Canvas>, RepositoryError> {
        // Latest approval wins when a segment was re-approved.
        let row = sqlx::query(
            "SELECT * FROM canvases WHERE segment_id = ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(segment_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_canvas).transpose()
    }

    async fn insert(&self, canvas: Canvas) -> Result<Canvas, RepositoryError> {
        sqlx::query(
            "INSERT INTO canvases (id, project_id, segment_id, jobs, pains, gains, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(canvas.id.to_string())
        .bind(canvas.project_id.to_string())
        .bind(canvas.segment_id.to_string())
        .bind(&canvas.jobs)
        .bind(&canvas.pains)
        .bind(&canvas.gains)
        .bind(format_datetime(&canvas.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(canvas)
    }
}
