//! SQLite draft repository covering all five draft tables.
//!
//! Inserts for one generation unit go through a single writer
//! transaction so a cohort is never half-persisted. Reads by id always
//! carry the project filter, so ids from another project load nothing.

use marketforge_core::repository::DraftRepository;
use marketforge_types::canvas::CanvasDraft;
use marketforge_types::error::RepositoryError;
use marketforge_types::pain::{PainDraft, RankingDraft};
use marketforge_types::segment::{DetailDraft, SegmentDraft};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid, placeholders};

/// SQLite-backed implementation of `DraftRepository`.
pub struct SqliteDraftRepository {
    pool: DatabasePool,
}

impl SqliteDraftRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn latest_version(
        &self,
        table: &str,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        // Table names come from the fixed set below, never from input.
        let sql = format!("SELECT COALESCE(MAX(version), 0) FROM {table} WHERE project_id = ?");
        let (version,): (i64,) = sqlx::query_as(&sql)
            .bind(project_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(version)
    }
}

fn q(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// -- row mappers ------------------------------------------------------

fn row_to_segment_draft(row: &sqlx::sqlite::SqliteRow) -> Result<SegmentDraft, RepositoryError> {
    let id: String = row.try_get("id").map_err(q)?;
    let project_id: String = row.try_get("project_id").map_err(q)?;
    let created_at: String = row.try_get("created_at").map_err(q)?;
    Ok(SegmentDraft {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        version: row.try_get("version").map_err(q)?,
        name: row.try_get("name").map_err(q)?,
        description: row.try_get("description").map_err(q)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_canvas_draft(row: &sqlx::sqlite::SqliteRow) -> Result<CanvasDraft, RepositoryError> {
    let id: String = row.try_get("id").map_err(q)?;
    let project_id: String = row.try_get("project_id").map_err(q)?;
    let segment_id: String = row.try_get("segment_id").map_err(q)?;
    let created_at: String = row.try_get("created_at").map_err(q)?;
    Ok(CanvasDraft {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_id: parse_uuid(&segment_id)?,
        version: row.try_get("version").map_err(q)?,
        jobs: row.try_get("jobs").map_err(q)?,
        pains: row.try_get("pains").map_err(q)?,
        gains: row.try_get("gains").map_err(q)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_pain_draft(row: &sqlx::sqlite::SqliteRow) -> Result<PainDraft, RepositoryError> {
    let id: String = row.try_get("id").map_err(q)?;
    let project_id: String = row.try_get("project_id").map_err(q)?;
    let segment_id: String = row.try_get("segment_id").map_err(q)?;
    let created_at: String = row.try_get("created_at").map_err(q)?;
    Ok(PainDraft {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_id: parse_uuid(&segment_id)?,
        version: row.try_get("version").map_err(q)?,
        pain_index: row.try_get("pain_index").map_err(q)?,
        title: row.try_get("title").map_err(q)?,
        description: row.try_get("description").map_err(q)?,
        severity: row.try_get("severity").map_err(q)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_ranking_draft(row: &sqlx::sqlite::SqliteRow) -> Result<RankingDraft, RepositoryError> {
    let id: String = row.try_get("id").map_err(q)?;
    let project_id: String = row.try_get("project_id").map_err(q)?;
    let pain_id: String = row.try_get("pain_id").map_err(q)?;
    let segment_id: Option<String> = row.try_get("segment_id").map_err(q)?;
    let is_top_pain: i64 = row.try_get("is_top_pain").map_err(q)?;
    let created_at: String = row.try_get("created_at").map_err(q)?;
    Ok(RankingDraft {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        pain_id: parse_uuid(&pain_id)?,
        segment_id: segment_id.as_deref().map(parse_uuid).transpose()?,
        version: row.try_get("version").map_err(q)?,
        is_top_pain: is_top_pain != 0,
        impact_score: row.try_get("impact_score").map_err(q)?,
        rationale: row.try_get("rationale").map_err(q)?,
        created_at: parse_datetime(&created_at)?,
    })
}

fn row_to_detail_draft(row: &sqlx::sqlite::SqliteRow) -> Result<DetailDraft, RepositoryError> {
    let id: String = row.try_get("id").map_err(q)?;
    let project_id: String = row.try_get("project_id").map_err(q)?;
    let segment_id: String = row.try_get("segment_id").map_err(q)?;
    let created_at: String = row.try_get("created_at").map_err(q)?;
    Ok(DetailDraft {
        id: parse_uuid(&id)?,
        project_id: parse_uuid(&project_id)?,
        segment_id: parse_uuid(&segment_id)?,
        version: row.try_get("version").map_err(q)?,
        segment_index: row.try_get("segment_index").map_err(q)?,
        name: row.try_get("name").map_err(q)?,
        description: row.try_get("description").map_err(q)?,
        demographics: row.try_get("demographics").map_err(q)?,
        buying_behavior: row.try_get("buying_behavior").map_err(q)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Build the `SELECT ... WHERE project_id = ? AND id IN (...)` query,
/// optionally adding the segment filter.
fn by_ids_sql(table: &str, id_count: usize, with_segment: bool) -> String {
    let mut sql = format!(
        "SELECT * FROM {table} WHERE project_id = ? AND id IN ({})",
        placeholders(id_count)
    );
    if with_segment {
        sql.push_str(" AND segment_id = ?");
    }
    sql
}

impl DraftRepository for SqliteDraftRepository {
    // -- segment drafts -----------------------------------------------

    async fn insert_segment_drafts(
        &self,
        drafts: Vec<SegmentDraft>,
    ) -> Result<Vec<SegmentDraft>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        for draft in &drafts {
            sqlx::query(
                "INSERT INTO segment_drafts (id, project_id, version, name, description, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(draft.id.to_string())
            .bind(draft.project_id.to_string())
            .bind(draft.version)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(format_datetime(&draft.created_at))
            .execute(&mut *tx)
            .await
            .map_err(q)?;
        }
        tx.commit().await.map_err(q)?;
        Ok(drafts)
    }

    async fn segment_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<SegmentDraft>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = by_ids_sql("segment_drafts", ids.len(), false);
        let mut query = sqlx::query(&sql).bind(project_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(q)?;
        rows.iter().map(row_to_segment_draft).collect()
    }

    async fn latest_segment_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        self.latest_version("segment_drafts", project_id).await
    }

    // -- canvas drafts ------------------------------------------------

    async fn insert_canvas_drafts(
        &self,
        drafts: Vec<CanvasDraft>,
    ) -> Result<Vec<CanvasDraft>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        for draft in &drafts {
            sqlx::query(
                "INSERT INTO canvas_drafts (id, project_id, segment_id, version, jobs, pains, gains, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(draft.id.to_string())
            .bind(draft.project_id.to_string())
            .bind(draft.segment_id.to_string())
            .bind(draft.version)
            .bind(&draft.jobs)
            .bind(&draft.pains)
            .bind(&draft.gains)
            .bind(format_datetime(&draft.created_at))
            .execute(&mut *tx)
            .await
            .map_err(q)?;
        }
        tx.commit().await.map_err(q)?;
        Ok(drafts)
    }

    async fn canvas_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<CanvasDraft>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = by_ids_sql("canvas_drafts", ids.len(), segment_id.is_some());
        let mut query = sqlx::query(&sql).bind(project_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }
        if let Some(segment_id) = segment_id {
            query = query.bind(segment_id.to_string());
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(q)?;
        rows.iter().map(row_to_canvas_draft).collect()
    }

    async fn latest_canvas_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        self.latest_version("canvas_drafts", project_id).await
    }

    // -- pain drafts --------------------------------------------------

    async fn insert_pain_drafts(
        &self,
        drafts: Vec<PainDraft>,
    ) -> Result<Vec<PainDraft>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        for draft in &drafts {
            sqlx::query(
                "INSERT INTO pain_drafts (id, project_id, segment_id, version, pain_index, title, description, severity, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(draft.id.to_string())
            .bind(draft.project_id.to_string())
            .bind(draft.segment_id.to_string())
            .bind(draft.version)
            .bind(draft.pain_index)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(draft.severity)
            .bind(format_datetime(&draft.created_at))
            .execute(&mut *tx)
            .await
            .map_err(q)?;
        }
        tx.commit().await.map_err(q)?;
        Ok(drafts)
    }

    async fn pain_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<PainDraft>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = by_ids_sql("pain_drafts", ids.len(), segment_id.is_some());
        let mut query = sqlx::query(&sql).bind(project_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }
        if let Some(segment_id) = segment_id {
            query = query.bind(segment_id.to_string());
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(q)?;
        rows.iter().map(row_to_pain_draft).collect()
    }

    async fn latest_pain_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        self.latest_version("pain_drafts", project_id).await
    }

    // -- ranking drafts -----------------------------------------------

    async fn insert_ranking_drafts(
        &self,
        drafts: Vec<RankingDraft>,
    ) -> Result<Vec<RankingDraft>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        for draft in &drafts {
            sqlx::query(
                "INSERT INTO ranking_drafts (id, project_id, pain_id, segment_id, version, is_top_pain, impact_score, rationale, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(draft.id.to_string())
            .bind(draft.project_id.to_string())
            .bind(draft.pain_id.to_string())
            .bind(draft.segment_id.map(|s| s.to_string()))
            .bind(draft.version)
            .bind(draft.is_top_pain)
            .bind(draft.impact_score)
            .bind(&draft.rationale)
            .bind(format_datetime(&draft.created_at))
            .execute(&mut *tx)
            .await
            .map_err(q)?;
        }
        tx.commit().await.map_err(q)?;
        Ok(drafts)
    }

    async fn ranking_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<RankingDraft>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = by_ids_sql("ranking_drafts", ids.len(), segment_id.is_some());
        let mut query = sqlx::query(&sql).bind(project_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }
        if let Some(segment_id) = segment_id {
            query = query.bind(segment_id.to_string());
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(q)?;
        rows.iter().map(row_to_ranking_draft).collect()
    }

    async fn latest_ranking_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        self.latest_version("ranking_drafts", project_id).await
    }

    // -- detail drafts ------------------------------------------------

    async fn insert_detail_drafts(
        &self,
        drafts: Vec<DetailDraft>,
    ) -> Result<Vec<DetailDraft>, RepositoryError> {
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        for draft in &drafts {
            sqlx::query(
                "INSERT INTO detail_drafts (id, project_id, segment_id, version, segment_index, name, description, demographics, buying_behavior, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(draft.id.to_string())
            .bind(draft.project_id.to_string())
            .bind(draft.segment_id.to_string())
            .bind(draft.version)
            .bind(draft.segment_index)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.demographics)
            .bind(&draft.buying_behavior)
            .bind(format_datetime(&draft.created_at))
            .execute(&mut *tx)
            .await
            .map_err(q)?;
        }
        tx.commit().await.map_err(q)?;
        Ok(drafts)
    }

    async fn detail_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<DetailDraft>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = by_ids_sql("detail_drafts", ids.len(), segment_id.is_some());
        let mut query = sqlx::query(&sql).bind(project_id.to_string());
        for id in ids {
            query = query.bind(id.to_string());
        }
        if let Some(segment_id) = segment_id {
            query = query.bind(segment_id.to_string());
        }
        let rows = query.fetch_all(&self.pool.reader).await.map_err(q)?;
        rows.iter().map(row_to_detail_draft).collect()
    }

    async fn latest_detail_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        self.latest_version("detail_drafts", project_id).await
    }

    // -- reset --------------------------------------------------------

    async fn delete_all_for_project(&self, project_id: &Uuid) -> Result<u64, RepositoryError> {
        let id = project_id.to_string();
        let mut tx = self.pool.writer.begin().await.map_err(q)?;
        let mut total = 0u64;
        for table in [
            "segment_drafts",
            "canvas_drafts",
            "pain_drafts",
            "ranking_drafts",
            "detail_drafts",
        ] {
            let sql = format!("DELETE FROM {table} WHERE project_id = ?");
            let result = sqlx::query(&sql).bind(&id).execute(&mut *tx).await.map_err(q)?;
            total += result.rows_affected();
        }
        tx.commit().await.map_err(q)?;
        Ok(total)
    }
}
