//! Project and workflow-step types.
//!
//! A project moves through a fixed ordering of stages; `current_step` is
//! the single mutable pointer recording the furthest-reached stage. The
//! successor table lives in marketforge-core (`step` module) -- this file
//! only defines the enumeration and its string forms, which are what the
//! database column and the API surface speak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One named step in the fixed workflow ordering.
///
/// Draft steps are written by the generators, approved steps by the
/// approval transactions. The string forms (snake_case) are stored in the
/// `projects.current_step` column and returned to the UI for gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Onboarding,
    SegmentsDraft,
    SegmentsApproved,
    CanvasDraft,
    CanvasApproved,
    PainsDraft,
    PainsApproved,
    RankingDraft,
    RankingApproved,
    DetailsDraft,
    Completed,
}

impl WorkflowStep {
    /// Every step, in workflow order. Used by the step-graph totality test
    /// and by migrations/seeding; not consulted for advancement.
    pub const ALL: [WorkflowStep; 11] = [
        WorkflowStep::Onboarding,
        WorkflowStep::SegmentsDraft,
        WorkflowStep::SegmentsApproved,
        WorkflowStep::CanvasDraft,
        WorkflowStep::CanvasApproved,
        WorkflowStep::PainsDraft,
        WorkflowStep::PainsApproved,
        WorkflowStep::RankingDraft,
        WorkflowStep::RankingApproved,
        WorkflowStep::DetailsDraft,
        WorkflowStep::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Onboarding => "onboarding",
            WorkflowStep::SegmentsDraft => "segments_draft",
            WorkflowStep::SegmentsApproved => "segments_approved",
            WorkflowStep::CanvasDraft => "canvas_draft",
            WorkflowStep::CanvasApproved => "canvas_approved",
            WorkflowStep::PainsDraft => "pains_draft",
            WorkflowStep::PainsApproved => "pains_approved",
            WorkflowStep::RankingDraft => "ranking_draft",
            WorkflowStep::RankingApproved => "ranking_approved",
            WorkflowStep::DetailsDraft => "details_draft",
            WorkflowStep::Completed => "completed",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WorkflowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "onboarding" => Ok(WorkflowStep::Onboarding),
            "segments_draft" => Ok(WorkflowStep::SegmentsDraft),
            "segments_approved" => Ok(WorkflowStep::SegmentsApproved),
            "canvas_draft" => Ok(WorkflowStep::CanvasDraft),
            "canvas_approved" => Ok(WorkflowStep::CanvasApproved),
            "pains_draft" => Ok(WorkflowStep::PainsDraft),
            "pains_approved" => Ok(WorkflowStep::PainsApproved),
            "ranking_draft" => Ok(WorkflowStep::RankingDraft),
            "ranking_approved" => Ok(WorkflowStep::RankingApproved),
            "details_draft" => Ok(WorkflowStep::DetailsDraft),
            "completed" => Ok(WorkflowStep::Completed),
            other => Err(format!("invalid workflow step: '{other}'")),
        }
    }
}

/// The five generate/approve stage pairs of the pipeline.
///
/// A stage is what a request names ("generate pains", "approve pains");
/// the step graph maps it onto the `WorkflowStep` pointer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Segments,
    Canvas,
    Pains,
    PainsRanking,
    SegmentDetails,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Segments => "segments",
            Stage::Canvas => "canvas",
            Stage::Pains => "pains",
            Stage::PainsRanking => "pains_ranking",
            Stage::SegmentDetails => "segment_details",
        };
        write!(f, "{name}")
    }
}

/// A market-research project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    /// Owner identity, supplied by the authentication layer.
    pub user_id: String,
    pub name: String,
    /// Furthest-reached stage; read by UI gating, written only through
    /// step-pointer advancement.
    pub current_step: WorkflowStep,
    /// Free-form onboarding/context payload captured before generation
    /// begins (company, product, market notes). Opaque to the pipeline
    /// except as prompt input.
    pub onboarding: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
