//! Pain and pain-ranking types.
//!
//! Pains are canonical per-segment records. Ranking importance metadata
//! (`is_top_pain`, `impact_score`) lives in a separate overlay table
//! keyed by `pain_id`; the read side joins it onto pains in-process, and
//! a missing overlay row means "not ranked" (falsy defaults), not an
//! error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A canonical customer pain belonging to one segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pain {
    pub id: Uuid,
    pub project_id: Uuid,
    pub segment_id: Uuid,
    /// Ordinal within the segment; doubles as the correlation key echoed
    /// back by the model during ranking generation.
    pub pain_index: i64,
    pub title: String,
    pub description: String,
    pub severity: i64,
    pub created_at: DateTime<Utc>,
}

/// A machine-generated pain candidate awaiting review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainDraft {
    pub id: Uuid,
    pub project_id: Uuid,
    pub segment_id: Uuid,
    pub version: i64,
    pub pain_index: i64,
    pub title: String,
    pub description: String,
    pub severity: i64,
    pub created_at: DateTime<Utc>,
}

/// Canonical ranking overlay for one pain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainRanking {
    pub pain_id: Uuid,
    pub project_id: Uuid,
    pub is_top_pain: bool,
    pub impact_score: i64,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

/// A machine-generated ranking candidate for one pain.
///
/// `segment_id` is optional: when the generator knew the segment it is
/// stamped directly, otherwise approval resolves it transitively through
/// the parent pain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingDraft {
    pub id: Uuid,
    pub project_id: Uuid,
    /// Parent canonical pain this ranking describes.
    pub pain_id: Uuid,
    pub segment_id: Option<Uuid>,
    pub version: i64,
    pub is_top_pain: bool,
    pub impact_score: i64,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

/// A pain with its ranking overlay joined on (read-side shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPain {
    #[serde(flatten)]
    pub pain: Pain,
    pub is_top_pain: bool,
    pub impact_score: i64,
}

impl RankedPain {
    /// Join a pain with its overlay row, defaulting to unranked when the
    /// overlay is absent.
    pub fn join(pain: Pain, ranking: Option<&PainRanking>) -> Self {
        let (is_top_pain, impact_score) = ranking
            .map(|r| (r.is_top_pain, r.impact_score))
            .unwrap_or((false, 0));
        Self { pain, is_top_pain, impact_score }
    }
}
