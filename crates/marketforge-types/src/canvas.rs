//! Value-proposition canvas types, one canvas per segment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical value-proposition canvas for one segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Canvas {
    pub id: Uuid,
    pub project_id: Uuid,
    pub segment_id: Uuid,
    /// What the segment is trying to get done.
    pub jobs: String,
    /// Frictions and frustrations in getting those jobs done.
    pub pains: String,
    /// Outcomes the segment hopes for.
    pub gains: String,
    pub created_at: DateTime<Utc>,
}

/// A machine-generated canvas candidate awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasDraft {
    pub id: Uuid,
    pub project_id: Uuid,
    pub segment_id: Uuid,
    pub version: i64,
    pub jobs: String,
    pub pains: String,
    pub gains: String,
    pub created_at: DateTime<Utc>,
}
