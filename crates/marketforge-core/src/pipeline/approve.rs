//! Approval transactions: reviewed drafts become canonical rows.
//!
//! Shared contract: load exactly the requested drafts (scoped to the
//! project, and to a segment when the caller supplied one), validate
//! batch-level invariants before any write, then map drafts to canonical
//! inserts best-effort -- a row that fails resolution or insertion is
//! skipped with a reason while the rest of the batch commits. The step
//! pointer advances once, after the writes, via the step graph.

use chrono::Utc;
use uuid::Uuid;

use marketforge_types::canvas::Canvas;
use marketforge_types::error::PipelineError;
use marketforge_types::pain::{Pain, PainRanking};
use marketforge_types::project::Stage;
use marketforge_types::segment::{FinalSegment, Segment};

use crate::repository::{
    CanvasRepository, DraftRepository, PainRepository, ProjectRepository, SegmentRepository,
};
use crate::step::StepGraph;

use super::outcome::{ApprovalOutcome, SkippedDraft};

/// Approval service over all five stages.
pub struct ApprovalService<Pr, Sg, Cv, Pn, D> {
    projects: Pr,
    segments: Sg,
    canvases: Cv,
    pains: Pn,
    drafts: D,
}

impl<Pr, Sg, Cv, Pn, D> ApprovalService<Pr, Sg, Cv, Pn, D>
where
    Pr: ProjectRepository,
    Sg: SegmentRepository,
    Cv: CanvasRepository,
    Pn: PainRepository,
    D: DraftRepository,
{
    pub fn new(projects: Pr, segments: Sg, canvases: Cv, pains: Pn, drafts: D) -> Self {
        Self { projects, segments, canvases, pains, drafts }
    }

    // -- shared plumbing ----------------------------------------------

    async fn require_project(&self, project_id: &Uuid) -> Result<(), PipelineError> {
        self.projects
            .get(project_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| PipelineError::NotFound("project".to_string()))
    }

    async fn advance(
        &self,
        project_id: &Uuid,
        stage: Stage,
    ) -> Result<marketforge_types::project::WorkflowStep, PipelineError> {
        let step = StepGraph::approved_step(stage);
        self.projects.set_current_step(project_id, step).await?;
        tracing::info!(%project_id, %step, "step pointer advanced after approval");
        Ok(step)
    }

    /// Check that a draft's segment link points inside the project.
    async fn segment_in_project(
        &self,
        project_id: &Uuid,
        segment_id: &Uuid,
    ) -> Result<Option<Segment>, PipelineError> {
        Ok(self
            .segments
            .get(segment_id)
            .await?
            .filter(|s| s.project_id == *project_id))
    }

    // -- stages -------------------------------------------------------

    /// Approve segment drafts into canonical segments.
    ///
    /// `segment_index` continues after any segments the project already
    /// has, in draft order. Best-effort per row.
    pub async fn approve_segments(
        &self,
        project_id: &Uuid,
        draft_ids: &[Uuid],
    ) -> Result<ApprovalOutcome<Segment>, PipelineError> {
        self.require_project(project_id).await?;

        let drafts = self.drafts.segment_drafts_by_ids(project_id, draft_ids).await?;
        if drafts.is_empty() {
            return Err(PipelineError::NotFound("segment drafts".to_string()));
        }

        let base_index = self.segments.list_for_project(project_id).await?.len() as i64;

        let mut approved = Vec::new();
        let mut skipped = Vec::new();
        for (i, draft) in drafts.into_iter().enumerate() {
            let segment = Segment {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_index: base_index + i as i64,
                name: draft.name,
                description: draft.description,
                created_at: Utc::now(),
            };
            match self.segments.insert(segment).await {
                Ok(row) => approved.push(row),
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "segment insert failed, skipping");
                    skipped.push(SkippedDraft::new(draft.id, format!("insert failed: {e}")));
                }
            }
        }

        let next_step = self.advance(project_id, Stage::Segments).await?;
        Ok(ApprovalOutcome { approved, skipped, next_step })
    }

    /// Approve canvas drafts into canonical canvases. A draft whose
    /// segment link does not resolve inside the project is skipped; the
    /// rest of the batch still commits.
    pub async fn approve_canvas(
        &self,
        project_id: &Uuid,
        draft_ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<ApprovalOutcome<Canvas>, PipelineError> {
        self.require_project(project_id).await?;

        let drafts = self
            .drafts
            .canvas_drafts_by_ids(project_id, draft_ids, segment_id)
            .await?;
        if drafts.is_empty() {
            return Err(PipelineError::NotFound("canvas drafts".to_string()));
        }

        let mut approved = Vec::new();
        let mut skipped = Vec::new();
        for draft in drafts {
            if self.segment_in_project(project_id, &draft.segment_id).await?.is_none() {
                skipped.push(SkippedDraft::new(draft.id, "segment not in project"));
                continue;
            }

            let canvas = Canvas {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_id: draft.segment_id,
                jobs: draft.jobs,
                pains: draft.pains,
                gains: draft.gains,
                created_at: Utc::now(),
            };
            match self.canvases.insert(canvas).await {
                Ok(row) => approved.push(row),
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "canvas insert failed, skipping");
                    skipped.push(SkippedDraft::new(draft.id, format!("insert failed: {e}")));
                }
            }
        }

        let next_step = self.advance(project_id, Stage::Canvas).await?;
        Ok(ApprovalOutcome { approved, skipped, next_step })
    }

    /// Approve pain drafts into canonical pains. Best-effort per row.
    pub async fn approve_pains(
        &self,
        project_id: &Uuid,
        draft_ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<ApprovalOutcome<Pain>, PipelineError> {
        self.require_project(project_id).await?;

        let drafts = self
            .drafts
            .pain_drafts_by_ids(project_id, draft_ids, segment_id)
            .await?;
        if drafts.is_empty() {
            return Err(PipelineError::NotFound("pain drafts".to_string()));
        }

        let mut approved = Vec::new();
        let mut skipped = Vec::new();
        for draft in drafts {
            if self.segment_in_project(project_id, &draft.segment_id).await?.is_none() {
                skipped.push(SkippedDraft::new(draft.id, "segment not in project"));
                continue;
            }

            let pain = Pain {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_id: draft.segment_id,
                pain_index: draft.pain_index,
                title: draft.title,
                description: draft.description,
                severity: draft.severity,
                created_at: Utc::now(),
            };
            match self.pains.insert(pain).await {
                Ok(row) => approved.push(row),
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "pain insert failed, skipping");
                    skipped.push(SkippedDraft::new(draft.id, format!("insert failed: {e}")));
                }
            }
        }

        let next_step = self.advance(project_id, Stage::Pains).await?;
        Ok(ApprovalOutcome { approved, skipped, next_step })
    }

    /// Approve ranking drafts into the pain-ranking overlay.
    ///
    /// Batch invariant first: at least one draft across the whole batch
    /// must carry `is_top_pain`, or the batch fails before any write.
    /// Per row, the segment link resolves transitively through the
    /// parent pain when absent; unresolvable rows are skipped.
    pub async fn approve_pains_ranking(
        &self,
        project_id: &Uuid,
        draft_ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<ApprovalOutcome<PainRanking>, PipelineError> {
        self.require_project(project_id).await?;

        let drafts = self
            .drafts
            .ranking_drafts_by_ids(project_id, draft_ids, segment_id)
            .await?;
        if drafts.is_empty() {
            return Err(PipelineError::NotFound("ranking drafts".to_string()));
        }

        if !drafts.iter().any(|d| d.is_top_pain) {
            return Err(PipelineError::Validation(
                "at least one pain must be marked as a top pain".to_string(),
            ));
        }

        let mut approved = Vec::new();
        let mut skipped = Vec::new();
        for draft in drafts {
            // The parent pain must exist to key the overlay row.
            let Some(pain) = self.pains.get(&draft.pain_id).await? else {
                skipped.push(SkippedDraft::new(draft.id, "parent pain not found"));
                continue;
            };

            // Resolve the segment link: directly when stamped, otherwise
            // through the parent pain.
            let seg_id = draft.segment_id.unwrap_or(pain.segment_id);
            if self.segment_in_project(project_id, &seg_id).await?.is_none() {
                skipped.push(SkippedDraft::new(draft.id, "segment not in project"));
                continue;
            }

            let ranking = PainRanking {
                pain_id: pain.id,
                project_id: *project_id,
                is_top_pain: draft.is_top_pain,
                impact_score: draft.impact_score,
                rationale: draft.rationale,
                created_at: Utc::now(),
            };
            match self.pains.insert_ranking(ranking).await {
                Ok(row) => approved.push(row),
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "ranking insert failed, skipping");
                    skipped.push(SkippedDraft::new(draft.id, format!("insert failed: {e}")));
                }
            }
        }

        let next_step = self.advance(project_id, Stage::PainsRanking).await?;
        Ok(ApprovalOutcome { approved, skipped, next_step })
    }

    /// Approve detail drafts into the final segment set.
    ///
    /// Replace-all semantic: the project's existing final segments are
    /// deleted first, then one final segment is inserted per draft (best
    /// effort after the delete). Final segments relate to canonical
    /// segments only through `segment_index`. The delete and the inserts
    /// are not one database transaction.
    pub async fn approve_segment_details(
        &self,
        project_id: &Uuid,
        draft_ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<ApprovalOutcome<FinalSegment>, PipelineError> {
        self.require_project(project_id).await?;

        let drafts = self
            .drafts
            .detail_drafts_by_ids(project_id, draft_ids, segment_id)
            .await?;
        if drafts.is_empty() {
            return Err(PipelineError::NotFound("detail drafts".to_string()));
        }

        let removed = self.segments.delete_final_for_project(project_id).await?;
        if removed > 0 {
            tracing::info!(%project_id, removed, "replaced prior final segment set");
        }

        let mut approved = Vec::new();
        let mut skipped = Vec::new();
        for draft in drafts {
            let segment = FinalSegment {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_index: draft.segment_index,
                name: draft.name,
                description: draft.description,
                demographics: draft.demographics,
                buying_behavior: draft.buying_behavior,
                created_at: Utc::now(),
            };
            match self.segments.insert_final(segment).await {
                Ok(row) => approved.push(row),
                Err(e) => {
                    tracing::warn!(draft_id = %draft.id, error = %e, "final segment insert failed, skipping");
                    skipped.push(SkippedDraft::new(draft.id, format!("insert failed: {e}")));
                }
            }
        }

        let next_step = self.advance(project_id, Stage::SegmentDetails).await?;
        Ok(ApprovalOutcome { approved, skipped, next_step })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::{rig, RigOptions};
    use crate::repository::DraftRepository as _;
    use chrono::Utc;
    use marketforge_types::pain::RankingDraft;
    use marketforge_types::project::WorkflowStep;
    use marketforge_types::segment::{DetailDraft, SegmentDraft};

    fn ranking_draft(
        project_id: Uuid,
        pain_id: Uuid,
        segment_id: Option<Uuid>,
        is_top_pain: bool,
    ) -> RankingDraft {
        RankingDraft {
            id: Uuid::now_v7(),
            project_id,
            pain_id,
            segment_id,
            version: 1,
            is_top_pain,
            impact_score: 5,
            rationale: "r".to_string(),
            created_at: Utc::now(),
        }
    }

    fn detail_draft(project_id: Uuid, segment_id: Uuid, index: i64) -> DetailDraft {
        DetailDraft {
            id: Uuid::now_v7(),
            project_id,
            segment_id,
            version: 1,
            segment_index: index,
            name: format!("segment {index}"),
            description: "d".to_string(),
            demographics: "dg".to_string(),
            buying_behavior: "bb".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ranking_approval_without_top_pain_fails_whole_batch() {
        let rig = rig(RigOptions { segments: 1, pains_per_segment: 3, ..Default::default() }).await;
        let pain_ids = rig.store.pain_ids(&rig.project_id);

        let drafts: Vec<RankingDraft> = pain_ids
            .iter()
            .map(|pid| ranking_draft(rig.project_id, *pid, None, false))
            .collect();
        let ids: Vec<Uuid> = drafts.iter().map(|d| d.id).collect();
        rig.store.insert_ranking_drafts(drafts).await.unwrap();

        let err = rig
            .approver
            .approve_pains_ranking(&rig.project_id, &ids, None)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Validation(_)));
        // Zero canonical writes happened.
        assert_eq!(rig.store.ranking_overlay_count(&rig.project_id), 0);
        assert_eq!(rig.store.current_step(&rig.project_id), WorkflowStep::Onboarding);
    }

    #[tokio::test]
    async fn test_ranking_approval_resolves_segment_through_parent_pain() {
        let rig = rig(RigOptions { segments: 1, pains_per_segment: 2, ..Default::default() }).await;
        let pain_ids = rig.store.pain_ids(&rig.project_id);

        // No segment_id stamped on the drafts at all.
        let drafts = vec![
            ranking_draft(rig.project_id, pain_ids[0], None, true),
            ranking_draft(rig.project_id, pain_ids[1], None, false),
        ];
        let ids: Vec<Uuid> = drafts.iter().map(|d| d.id).collect();
        rig.store.insert_ranking_drafts(drafts).await.unwrap();

        let outcome = rig
            .approver
            .approve_pains_ranking(&rig.project_id, &ids, None)
            .await
            .unwrap();

        assert_eq!(outcome.approved.len(), 2);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.next_step, WorkflowStep::RankingApproved);
    }

    #[tokio::test]
    async fn test_ranking_approval_skips_orphan_row_but_commits_rest() {
        let rig = rig(RigOptions { segments: 1, pains_per_segment: 2, ..Default::default() }).await;
        let pain_ids = rig.store.pain_ids(&rig.project_id);

        let orphan = ranking_draft(rig.project_id, Uuid::now_v7(), None, false);
        let orphan_id = orphan.id;
        let drafts = vec![
            ranking_draft(rig.project_id, pain_ids[0], None, true),
            orphan,
            ranking_draft(rig.project_id, pain_ids[1], None, false),
        ];
        let ids: Vec<Uuid> = drafts.iter().map(|d| d.id).collect();
        rig.store.insert_ranking_drafts(drafts).await.unwrap();

        let outcome = rig
            .approver
            .approve_pains_ranking(&rig.project_id, &ids, None)
            .await
            .unwrap();

        assert_eq!(outcome.approved.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].draft_id, orphan_id);
        assert!(outcome.skipped[0].reason.contains("parent pain"));
    }

    #[tokio::test]
    async fn test_details_approval_replaces_prior_final_set() {
        let rig = rig(RigOptions { segments: 3, ..Default::default() }).await;
        let seg_ids = rig.store.segment_ids(&rig.project_id);

        // The project already has 2 final segments from an earlier pass.
        rig.store.seed_final_segments(&rig.project_id, 2);
        assert_eq!(rig.store.final_segment_count(&rig.project_id), 2);

        let drafts: Vec<DetailDraft> = (0..3)
            .map(|i| detail_draft(rig.project_id, seg_ids[i as usize], i))
            .collect();
        let ids: Vec<Uuid> = drafts.iter().map(|d| d.id).collect();
        rig.store.insert_detail_drafts(drafts).await.unwrap();

        let outcome = rig
            .approver
            .approve_segment_details(&rig.project_id, &ids, None)
            .await
            .unwrap();

        assert_eq!(outcome.approved.len(), 3);
        // Exactly the new set remains; the prior 2 are gone.
        assert_eq!(rig.store.final_segment_count(&rig.project_id), 3);
        assert_eq!(outcome.next_step, WorkflowStep::Completed);
    }

    #[tokio::test]
    async fn test_approval_with_unknown_ids_is_not_found() {
        let rig = rig(RigOptions { segments: 1, ..Default::default() }).await;
        let err = rig
            .approver
            .approve_canvas(&rig.project_id, &[Uuid::now_v7()], None)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_cross_project_draft_ids_do_not_load() {
        let rig = rig(RigOptions { segments: 1, ..Default::default() }).await;
        // A draft belonging to a different project.
        let foreign_project = Uuid::now_v7();
        let draft = SegmentDraft {
            id: Uuid::now_v7(),
            project_id: foreign_project,
            version: 1,
            name: "x".to_string(),
            description: "y".to_string(),
            created_at: Utc::now(),
        };
        let id = draft.id;
        rig.store.insert_segment_drafts(vec![draft]).await.unwrap();

        let err = rig
            .approver
            .approve_segments(&rig.project_id, &[id])
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_segment_approval_assigns_indices_in_draft_order() {
        let rig = rig(RigOptions::default()).await;
        let drafts: Vec<SegmentDraft> = (0..3)
            .map(|i| SegmentDraft {
                id: Uuid::now_v7(),
                project_id: rig.project_id,
                version: 1,
                name: format!("s{i}"),
                description: "d".to_string(),
                created_at: Utc::now(),
            })
            .collect();
        let ids: Vec<Uuid> = drafts.iter().map(|d| d.id).collect();
        rig.store.insert_segment_drafts(drafts).await.unwrap();

        let outcome = rig.approver.approve_segments(&rig.project_id, &ids).await.unwrap();
        let indices: Vec<i64> = outcome.approved.iter().map(|s| s.segment_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(outcome.next_step, WorkflowStep::SegmentsApproved);
    }
}
