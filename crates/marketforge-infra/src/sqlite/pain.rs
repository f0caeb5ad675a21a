//! SQLite pain repository: canonical pains and the ranking overlay.

use marketforge_core::repository::PainRepository;
use marketforge_types::error::RepositoryError;
use marketforge_types::pain::{Pain, PainRanking};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `PainRepository`.
pub struct SqlitePainRepository {
    pool: DatabasePool,
}

impl SqlitePainRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn row_to_pain(row: &sqlx::sqlite::SqliteRow) -> Result<Pain, RepositoryError> {
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

    Ok(Pain {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_id: parse_uuid(&segment_id)?,
        pain_index: row
            .try_get("pain_index")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        title: row
            .try_get("title")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        severity: row
            .try_get("severity")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_ranking(row: &sqlx::sqlite::SqliteRow) -> Result<PainRanking, RepositoryError> {
    let pain_id: String = row
        .try_get("pain_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let project_id: String = row
        .try_get("project_id")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let is_top_pain: i64 = row
        .try_get("is_top_pain")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    let created_at: String = row
        .try_get("created_at")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    Ok(PainRanking {
        pain_id: parse_uuid(&pain_id)?,
        project_id: parse_uuid(&project_id)?,
        is_top_pain: is_top_pain != 0,
        impact_score: row
            .try_get("impact_score")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        rationale: row
            .try_get("rationale")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        created_at: parse_datetime(&created_at)?,
    })
}

impl PainRepository for SqlitePainRepository {
    async fn list_for_segment(&self, segment_id: &Uuid) -> Result<Vec<Pain>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM pains WHERE segment_id = ? ORDER BY pain_index ASC",
        )
        .bind(segment_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_pain).collect()
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Pain>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM pains WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(row_to_pain).transpose()
    }

    async fn insert(&self, pain: Pain) -> Result<Pain, RepositoryError> {
        sqlx::query(
            "INSERT INTO pains (id, project_id, segment_id, pain_index, title, description, severity, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(pain.id.to_string())
        .bind(pain.project_id.to_string())
        .bind(pain.segment_id.to_string())
        .bind(pain.pain_index)
        .bind(&pain.title)
        .bind(&pain.description)
        .bind(pain.severity)
        .bind(format_datetime(&pain.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(pain)
    }

    async fn list_rankings_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<PainRanking>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM pain_rankings WHERE project_id = ?")
            .bind(project_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter().map(row_to_ranking).collect()
    }

    async fn insert_ranking(
        &self,
        ranking: PainRanking,
    ) -> Result<PainRanking, RepositoryError> {
        // One overlay row per pain; a re-approval overwrites the earlier
        // verdict for that pain.
        sqlx::query(
            "INSERT INTO pain_rankings (pain_id, project_id, is_top_pain, impact_score, rationale, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(pain_id) DO UPDATE SET
                 is_top_pain = excluded.is_top_pain,
                 impact_score = excluded.impact_score,
                 rationale = excluded.rationale,
                 created_at = excluded.created_at",
        )
        .bind(ranking.pain_id.to_string())
        .bind(ranking.project_id.to_string())
        .bind(ranking.is_top_pain)
        .bind(ranking.impact_score)
        .bind(&ranking.rationale)
        .bind(format_datetime(&ranking.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(ranking)
    }
}
