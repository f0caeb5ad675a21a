//! Partial-failure batch result types.
//!
//! Best-effort approvals never throw away skip information: every row
//! that failed resolution or insertion is reported with its reason next
//! to the rows that committed.

use serde::Serialize;
use uuid::Uuid;

use marketforge_types::project::WorkflowStep;

/// A draft that an approval batch dropped, with the reason.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedDraft {
    pub draft_id: Uuid,
    pub reason: String,
}

impl SkippedDraft {
    pub fn new(draft_id: Uuid, reason: impl Into<String>) -> Self {
        Self { draft_id, reason: reason.into() }
    }
}

/// The result of one approval transaction.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome<T> {
    /// Canonical rows created by this batch, in draft order.
    pub approved: Vec<T>,
    /// Drafts dropped without aborting the batch.
    pub skipped: Vec<SkippedDraft>,
    /// Where the step pointer now stands.
    pub next_step: WorkflowStep,
}
