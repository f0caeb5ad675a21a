//! SQLite segment repository: canonical segments and the final set.

use marketforge_core::repository::SegmentRepository;
use marketforge_types::error::RepositoryError;
use marketforge_types::segment::{FinalSegment, Segment};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `SegmentRepository`.
pub struct SqliteSegmentRepository {
    pool: DatabasePool,
}

impl SqliteSegmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_segment(row: &sqlx::sqlite::SqliteRow) -> Result<Segment, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let project_id: String = row
        .try_get("project_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(Segment {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_index: row
            .try_get("segment_index")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_final_segment(row: &sqlx::sqlite::SqliteRow) -> Result<FinalSegment, RepositoryError> {
    let id: String = row
        .try_get("id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let project_id: String = row
        .try_get("project_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(FinalSegment {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_index: row
            .try_get("segment_index")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        demographics: row
            .try_get("demographics")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        buying_behavior: row
            .try_get("buying_behavior")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl SegmentRepository for SqliteSegmentRepository {
    async fn list_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<Segment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM segments WHERE project_id = ? ORDER BY segment_index ASC",
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_segment).collect()
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Segment>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM segments WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_segment).transpose()
    }

    async fn insert(&self, segment: Segment) -> Result<Segment, RepositoryError> {
        sqlx::query(
            "INSERT INTO segments (id, project_id, segment_index, name, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(segment.id.to_string())
        .bind(segment.project_id.to_string())
        .bind(segment.segment_index)
        .bind(&segment.name)
        .bind(&segment.description)
        .bind(format_datetime(&segment.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(segment)
    }

    async fn list_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<FinalSegment>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM final_segments WHERE project_id = ? ORDER BY segment_index ASC",
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_final_segment).collect()
    }

    async fn delete_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM final_segments WHERE project_id = ?")
            .bind(project_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn insert_final(
        &self,
        segment: FinalSegment,
    ) -> Result<FinalSegment, RepositoryError> {
        sqlx::query(
            "INSERT INTO final_segments (id, project_id, segment_index, name, description, demographics, buying_behavior, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(segment.id.to_string())
        .bind(segment.project_id.to_string())
        .bind(segment.segment_index)
        .bind(&segment.name)
        .bind(&segment.description)
        .bind(&segment.demographics)
        .bind(&segment.buying_behavior)
        .bind(format_datetime(&segment.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use marketforge_core::repository::ProjectRepository;
    use marketforge_types::project::{Project, WorkflowStep};

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    async fn seed_project(pool: &DatabasePool) -> Uuid {
        let now = Utc::now();
        let project = Project {
            id: Uuid::now_v7(),
            user_id: "user-1".to_string(),
            name: "p".to_string(),
            current_step: WorkflowStep::Onboarding,
            onboarding: serde_json::Value::Null,
            created_at: now,
            updated_at: now,
        };
        let id = project.id;
        super::super::SqliteProjectRepository::new(pool.clone())
            .insert(project)
            .await
            .unwrap();
        id
    }

    fn segment(project_id: Uuid, index: i64) -> Segment {
        Segment {
            id: Uuid::now_v7(),
            project_id,
            segment_index: index,
            name: format!("segment {index}"),
            description: "d".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_list_orders_by_segment_index() {
        let pool = test_pool().await;
        let project_id = seed_project(&pool).await;
        let repo = SqliteSegmentRepository::new(pool);

        // Insert out of order.
        repo.insert(segment(project_id, 2)).await.unwrap();
        repo.insert(segment(project_id, 0)).await.unwrap();
        repo.insert(segment(project_id, 1)).await.unwrap();

        let rows = repo.list_for_project(&project_id).await.unwrap();
        let indices: Vec<i64> = rows.iter().map(|s| s.segment_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_delete_final_reports_removed_count() {
        let pool = test_pool().await;
        let project_id = seed_project(&pool).await;
        let repo = SqliteSegmentRepository::new(pool);

        for i in 0..2 {
            repo.insert_final(FinalSegment {
                id: Uuid::now_v7(),
                project_id,
                segment_index: i,
                name: "n".to_string(),
                description: "d".to_string(),
                demographics: "dg".to_string(),
                buying_behavior: "bb".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.delete_final_for_project(&project_id).await.unwrap(), 2);
        assert!(repo.list_final_for_project(&project_id).await.unwrap().is_empty());
    }
}
