//! Audience segment types: canonical segments, final (detail-enriched)
//! segments, and their draft counterparts.
//!
//! Canonical and final segments are distinct entities connected only by
//! equal `segment_index` -- a final segment never reuses a canonical
//! segment's id. `segment_index` is also the deterministic iteration
//! order for per-segment generation passes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical audience segment belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Ordinal position within the project; stable across regenerations
    /// of downstream artifacts.
    pub segment_index: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// A machine-generated segment candidate awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentDraft {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Regeneration cohort; later generator runs stamp a higher version
    /// and never overwrite earlier rows.
    pub version: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// The approved, detail-enriched segment set written at the end of the
/// pipeline. Replaced wholesale on each details approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalSegment {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Matches the canonical segment's ordinal, not its id.
    pub segment_index: i64,
    pub name: String,
    pub description: String,
    pub demographics: String,
    pub buying_behavior: String,
    pub created_at: DateTime<Utc>,
}

/// A machine-generated segment-detail candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailDraft {
    pub id: Uuid,
    pub project_id: Uuid,
    /// The canonical segment this detail sheet describes.
    pub segment_id: Uuid,
    pub version: i64,
    pub segment_index: i64,
    pub name: String,
    pub description: String,
    pub demographics: String,
    pub buying_behavior: String,
    pub created_at: DateTime<Utc>,
}
