//! Draft generation handlers.
//!
//! Each stage has its own route; all share the `{projectId, segmentId?}`
//! body. Ownership is checked before the pipeline runs so a foreign
//! project id fails with 403 rather than leaking generation work.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use marketforge_types::canvas::CanvasDraft;
use marketforge_types::pain::{PainDraft, RankingDraft};
use marketforge_types::segment::{DetailDraft, SegmentDraft};

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::state::AppState;

use super::require_owned_project;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub project_id: Uuid,
    pub segment_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse<T> {
    pub success: bool,
    pub drafts: Vec<T>,
}

/// POST /api/v1/generate/segments
pub async fn segments(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse<SegmentDraft>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let drafts = state.generator.generate_segments(&body.project_id).await?;
    Ok(Json(GenerateResponse { success: true, drafts }))
}

/// POST /api/v1/generate/canvas
pub async fn canvas(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse<CanvasDraft>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let drafts = state
        .generator
        .generate_canvas(&body.project_id, body.segment_id.as_ref())
        .await?;
    Ok(Json(GenerateResponse { success: true, drafts }))
}

/// POST /api/v1/generate/pains
pub async fn pains(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse<PainDraft>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let drafts = state
        .generator
        .generate_pains(&body.project_id, body.segment_id.as_ref())
        .await?;
    Ok(Json(GenerateResponse { success: true, drafts }))
}

/// POST /api/v1/generate/pains-ranking
pub async fn pains_ranking(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse<RankingDraft>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let drafts = state
        .generator
        .generate_pains_ranking(&body.project_id, body.segment_id.as_ref())
        .await?;
    Ok(Json(GenerateResponse { success: true, drafts }))
}

/// POST /api/v1/generate/segment-details
pub async fn segment_details(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(body): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse<DetailDraft>>, AppError> {
    require_owned_project(&state, &body.project_id, &auth.user_id).await?;
    let drafts = state
        .generator
        .generate_segment_details(&body.project_id, body.segment_id.as_ref())
        .await?;
    Ok(Json(GenerateResponse { success: true, drafts }))
}
