//! Stage-specific shapes the provider is expected to return.
//!
//! These are the only schema contract over the raw text: the normalizer
//! parses into them strictly, and anything serde rejects is a malformed
//! response. `pain_index` in [`GeneratedRanking`] is the correlation key
//! the model echoes back so ranking items can be matched to the pains
//! they describe.

use serde::Deserialize;

/// Segment generation response: a list of segment candidates.
#[derive(Debug, Deserialize)]
pub struct SegmentSheet {
    pub segments: Vec<GeneratedSegment>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedSegment {
    pub name: String,
    pub description: String,
}

/// Canvas generation response for one segment.
#[derive(Debug, Deserialize)]
pub struct GeneratedCanvas {
    pub jobs: String,
    pub pains: String,
    pub gains: String,
}

/// Pain generation response for one segment.
#[derive(Debug, Deserialize)]
pub struct PainSheet {
    pub pains: Vec<GeneratedPain>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedPain {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: i64,
}

/// Ranking generation response for one segment.
#[derive(Debug, Deserialize)]
pub struct RankingSheet {
    pub rankings: Vec<GeneratedRanking>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedRanking {
    /// Correlation key: the `pain_index` of the pain this item ranks.
    pub pain_index: i64,
    pub is_top_pain: bool,
    pub impact_score: i64,
    #[serde(default)]
    pub rationale: String,
}

/// Segment-detail generation response for one segment.
#[derive(Debug, Deserialize)]
pub struct GeneratedDetail {
    pub name: String,
    pub description: String,
    pub demographics: String,
    pub buying_behavior: String,
}
