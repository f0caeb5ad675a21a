//! Approval handlers.
//!
//! All stages share the `{projectId, draftIds, segmentId?}` body. The
//! response carries the committed rows, the skipped drafts with their
//! reasons, and the step the project now stands on.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketforge_core::pipeline::outcome::{ApprovalOutcome, SkippedDraft};
use marketforge_types::canvas::Canvas;
use marketforge_types::pain::{Pain, PainRanking};
use marketforge_types::project::WorkflowStep;
use marketforge_types::segment::{FinalSegment, Segment};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

use super::require_owned_project;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequest {
    pub project_id: Uuid,
    pub draft_ids: Vec<Uuid>,
    pub segment_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveResponse<T> {
    pub success: bool,
    pub approved: Vec<T>,
    pub skipped: Vec<SkippedDraft>,
    pub next_step: WorkflowStep,
}

impl<T> From<ApprovalOutcome<T>> for ApproveResponse<T> {
    fn from(outcome: ApprovalOutcome<T>) -> Self {
        Self {
            success: true,
            approved: outcome.approved,
            skipped: outcome.skipped,
            next_step: outcome.next_step,
        }
    }
}

/// POST /api/v1/approve/segments
pub async fn segments(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse<Segment>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let outcome = state
        .approver
        .approve_segments(&body.project_id, &body.draft_ids)
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/approve/canvas
pub async fn canvas(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse<Canvas>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let outcome = state
        .approver
        .approve_canvas(&body.project_id, &body.draft_ids, body.segment_id.as_ref())
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/approve/pains
pub async fn pains(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse<Pain>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let outcome = state
        .approver
        .approve_pains(&body.project_id, &body.draft_ids, body.segment_id.as_ref())
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/approve/pains-ranking
pub async fn pains_ranking(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse<PainRanking>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let outcome = state
        .approver
        .approve_pains_ranking(&body.project_id, &body.draft_ids, body.segment_id.as_ref())
        .await?;
    Ok(Json(outcome.into()))
}

/// POST /api/v1/approve/segment-details
pub async fn segment_details(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<ApproveRequest>,
) -> Result<Json<ApproveResponse<FinalSegment>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let outcome = state
        .approver
        .approve_segment_details(&body.project_id, &body.draft_ids, body.segment_id.as_ref())
        .await?;
    Ok(Json(outcome.into()))
}
