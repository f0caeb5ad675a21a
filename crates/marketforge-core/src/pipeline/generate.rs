//! Draft generation for every pipeline stage.
//!
//! Shared contract across stages: resolve the scope (one segment or all
//! of them in ordinal order), load the canonical inputs the stage needs,
//! call the provider through the retry policy, normalize the response,
//! persist one draft row per sub-item, and advance the step pointer once
//! at the end of the run.
//!
//! Scope units are processed strictly sequentially -- one provider call
//! in flight at a time. That bounds rate-limit exposure at the cost of
//! latency linear in segment count. Provider/parse exhaustion aborts the
//! run before the step advance, but rows already committed for earlier
//! units remain: there is no run-level rollback.

use chrono::Utc;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use marketforge_types::canvas::CanvasDraft;
use marketforge_types::error::PipelineError;
use marketforge_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use marketforge_types::pain::{RankedPain, PainDraft, RankingDraft};
use marketforge_types::project::{Project, Stage};
use marketforge_types::segment::{DetailDraft, Segment, SegmentDraft};

use crate::llm::normalize::parse_response;
use crate::llm::{BoxTextProvider, RetryPolicy};
use crate::repository::{
    CanvasRepository, DraftRepository, PainRepository, ProjectRepository, SegmentRepository,
};
use crate::step::StepGraph;

use super::output::{
    GeneratedCanvas, GeneratedDetail, PainSheet, RankingSheet, SegmentSheet,
};
use super::prompt;

/// Draft generator over all five stages.
///
/// Generic over the repository traits; the provider is type-erased so
/// the concrete backend (HTTP client or test mock) is a runtime choice.
pub struct DraftGenerator<Pr, Sg, Cv, Pn, D> {
    provider: BoxTextProvider,
    retry: RetryPolicy,
    model: String,
    max_tokens: u32,
    projects: Pr,
    segments: Sg,
    canvases: Cv,
    pains: Pn,
    drafts: D,
}

impl<Pr, Sg, Cv, Pn, D> DraftGenerator<Pr, Sg, Cv, Pn, D>
where
    Pr: ProjectRepository,
    Sg: SegmentRepository,
    Cv: CanvasRepository,
    Pn: PainRepository,
    D: DraftRepository,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        provider: BoxTextProvider,
        retry: RetryPolicy,
        model: String,
        max_tokens: u32,
        projects: Pr,
        segments: Sg,
        canvases: Cv,
        pains: Pn,
        drafts: D,
    ) -> Self {
        Self {
            provider,
            retry,
            model,
            max_tokens,
            projects,
            segments,
            canvases,
            pains,
            drafts,
        }
    }

    // -- shared plumbing ----------------------------------------------

    async fn load_project(&self, project_id: &Uuid) -> Result<Project, PipelineError> {
        self.projects
            .get(project_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound("project".to_string()))
    }

    /// One target segment when the caller supplied one, otherwise every
    /// segment of the project in `segment_index` order.
    async fn resolve_scope(
        &self,
        project: &Project,
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<Segment>, PipelineError> {
        match segment_id {
            Some(id) => {
                let segment = self
                    .segments
                    .get(id)
                    .await?
                    .filter(|s| s.project_id == project.id)
                    .ok_or_else(|| PipelineError::NotFound("segment".to_string()))?;
                Ok(vec![segment])
            }
            None => Ok(self.segments.list_for_project(&project.id).await?),
        }
    }

    /// One fetch+parse unit behind the retry policy. Persistence never
    /// happens inside this call.
    async fn ask<T: DeserializeOwned>(&self, user_prompt: String) -> Result<T, LlmError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![Message {
                role: MessageRole::User,
                content: user_prompt,
            }],
            system: Some(prompt::system_prompt()),
            max_tokens: self.max_tokens,
            temperature: None,
        };

        self.retry
            .run(|| async {
                let response = self.provider.complete(&request).await?;
                parse_response::<T>(&response.content)
            })
            .await
    }

    async fn advance(&self, project_id: &Uuid, stage: Stage) -> Result<(), PipelineError> {
        let step = StepGraph::draft_step(stage);
        self.projects.set_current_step(project_id, step).await?;
        tracing::info!(%project_id, %step, "step pointer advanced after generation");
        Ok(())
    }

    // -- stages -------------------------------------------------------

    /// Generate segment drafts from the project's onboarding payload.
    /// Project-scoped: a single provider call per run.
    pub async fn generate_segments(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<SegmentDraft>, PipelineError> {
        let project = self.load_project(project_id).await?;
        if project.onboarding.is_null() {
            return Err(PipelineError::Validation(
                "project has no onboarding context to generate segments from".to_string(),
            ));
        }

        let version = self.drafts.latest_segment_draft_version(project_id).await? + 1;
        let sheet: SegmentSheet = self.ask(prompt::segments_prompt(&project)).await?;

        let now = Utc::now();
        let rows: Vec<SegmentDraft> = sheet
            .segments
            .into_iter()
            .map(|s| SegmentDraft {
                id: Uuid::now_v7(),
                project_id: *project_id,
                version,
                name: s.name,
                description: s.description,
                created_at: now,
            })
            .collect();

        let inserted = self.drafts.insert_segment_drafts(rows).await?;
        self.advance(project_id, Stage::Segments).await?;
        Ok(inserted)
    }

    /// Generate one canvas draft per segment in scope.
    pub async fn generate_canvas(
        &self,
        project_id: &Uuid,
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<CanvasDraft>, PipelineError> {
        let project = self.load_project(project_id).await?;
        let scope = self.resolve_scope(&project, segment_id).await?;
        let version = self.drafts.latest_canvas_draft_version(project_id).await? + 1;

        let mut inserted = Vec::new();
        for segment in &scope {
            let generated: GeneratedCanvas =
                self.ask(prompt::canvas_prompt(&project, segment)).await?;

            let draft = CanvasDraft {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_id: segment.id,
                version,
                jobs: generated.jobs,
                pains: generated.pains,
                gains: generated.gains,
                created_at: Utc::now(),
            };
            inserted.extend(self.drafts.insert_canvas_drafts(vec![draft]).await?);
        }

        self.advance(project_id, Stage::Canvas).await?;
        Ok(inserted)
    }

    /// Generate pain drafts per segment in scope; the approved canvas
    /// enriches the prompt when present but is not required.
    pub async fn generate_pains(
        &self,
        project_id: &Uuid,
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<PainDraft>, PipelineError> {
        let project = self.load_project(project_id).await?;
        let scope = self.resolve_scope(&project, segment_id).await?;
        let version = self.drafts.latest_pain_draft_version(project_id).await? + 1;

        let mut inserted = Vec::new();
        for segment in &scope {
            let canvas = self.canvases.get_for_segment(&segment.id).await?;
            let sheet: PainSheet = self
                .ask(prompt::pains_prompt(&project, segment, canvas.as_ref()))
                .await?;

            let now = Utc::now();
            let rows: Vec<PainDraft> = sheet
                .pains
                .into_iter()
                .enumerate()
                .map(|(i, p)| PainDraft {
                    id: Uuid::now_v7(),
                    project_id: *project_id,
                    segment_id: segment.id,
                    version,
                    pain_index: i as i64,
                    title: p.title,
                    description: p.description,
                    severity: p.severity,
                    created_at: now,
                })
                .collect();
            inserted.extend(self.drafts.insert_pain_drafts(rows).await?);
        }

        self.advance(project_id, Stage::Pains).await?;
        Ok(inserted)
    }

    /// Generate ranking drafts over each segment's approved pains.
    ///
    /// Items are correlated to pains by the echoed `pain_index`; items
    /// the model invented (no matching pain) are dropped silently, and
    /// segments with no approved pains are skipped, not fatal.
    pub async fn generate_pains_ranking(
        &self,
        project_id: &Uuid,
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<RankingDraft>, PipelineError> {
        let project = self.load_project(project_id).await?;
        let scope = self.resolve_scope(&project, segment_id).await?;
        let version = self.drafts.latest_ranking_draft_version(project_id).await? + 1;

        let mut inserted = Vec::new();
        for segment in &scope {
            let pains = self.pains.list_for_segment(&segment.id).await?;
            if pains.is_empty() {
                tracing::warn!(segment_id = %segment.id, "no approved pains, skipping segment");
                continue;
            }

            let sheet: RankingSheet = self.ask(prompt::ranking_prompt(segment, &pains)).await?;

            let now = Utc::now();
            let mut rows = Vec::new();
            for item in sheet.rankings {
                let Some(pain) = pains.iter().find(|p| p.pain_index == item.pain_index) else {
                    tracing::debug!(
                        segment_id = %segment.id,
                        pain_index = item.pain_index,
                        "ranking item matches no known pain, dropping"
                    );
                    continue;
                };
                rows.push(RankingDraft {
                    id: Uuid::now_v7(),
                    project_id: *project_id,
                    pain_id: pain.id,
                    segment_id: Some(segment.id),
                    version,
                    is_top_pain: item.is_top_pain,
                    impact_score: item.impact_score,
                    rationale: item.rationale,
                    created_at: now,
                });
            }
            inserted.extend(self.drafts.insert_ranking_drafts(rows).await?);
        }

        self.advance(project_id, Stage::PainsRanking).await?;
        Ok(inserted)
    }

    /// Generate one detail draft per segment in scope, built on the
    /// segment's top-ranked pains. Segments without any top-ranked pain
    /// have no basis for a detail sheet and are skipped.
    pub async fn generate_segment_details(
        &self,
        project_id: &Uuid,
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<DetailDraft>, PipelineError> {
        let project = self.load_project(project_id).await?;
        let scope = self.resolve_scope(&project, segment_id).await?;
        let version = self.drafts.latest_detail_draft_version(project_id).await? + 1;

        // One overlay read for the whole run; the join happens in-process.
        let rankings = self.pains.list_rankings_for_project(project_id).await?;

        let mut inserted = Vec::new();
        for segment in &scope {
            let pains = self.pains.list_for_segment(&segment.id).await?;
            let top_pains: Vec<RankedPain> = pains
                .into_iter()
                .map(|p| {
                    let overlay = rankings.iter().find(|r| r.pain_id == p.id);
                    RankedPain::join(p, overlay)
                })
                .filter(|rp| rp.is_top_pain)
                .collect();

            if top_pains.is_empty() {
                tracing::warn!(segment_id = %segment.id, "no top-ranked pains, skipping segment");
                continue;
            }

            let generated: GeneratedDetail =
                self.ask(prompt::detail_prompt(segment, &top_pains)).await?;

            let draft = DetailDraft {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_id: segment.id,
                version,
                segment_index: segment.segment_index,
                name: generated.name,
                description: generated.description,
                demographics: generated.demographics,
                buying_behavior: generated.buying_behavior,
                created_at: Utc::now(),
            };
            inserted.extend(self.drafts.insert_detail_drafts(vec![draft]).await?);
        }

        self.advance(project_id, Stage::SegmentDetails).await?;
        Ok(inserted)
    }
}
