//! In-memory test rig for the pipeline services.
//!
//! `MockProvider` replays a queue of scripted responses; `MemoryStore`
//! is one `Arc<Mutex>` store implementing every repository trait, so a
//! single clone-able handle backs both services and the assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use marketforge_types::canvas::{Canvas, CanvasDraft};
use marketforge_types::error::RepositoryError;
use marketforge_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
use marketforge_types::pain::{Pain, PainDraft, PainRanking, RankingDraft};
use marketforge_types::project::{Project, WorkflowStep};
use marketforge_types::segment::{DetailDraft, FinalSegment, Segment, SegmentDraft};

use crate::llm::{BoxTextProvider, RetryPolicy, TextProvider};
use crate::pipeline::approve::ApprovalService;
use crate::pipeline::generate::DraftGenerator;
use crate::repository::{
    CanvasRepository, DraftRepository, PainRepository, ProjectRepository, SegmentRepository,
};

// -- mock provider ----------------------------------------------------

/// Scripted provider: each `complete` call pops the next queued body.
/// An empty queue fails fast so a miscounted script cannot spin the
/// retry loop.
#[derive(Clone, Default)]
pub(crate) struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub(crate) fn push_ok(&self, content: &str) {
        self.responses.lock().unwrap().push_back(content.to_string());
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(content) => Ok(CompletionResponse {
                id: format!("msg_mock_{}", self.calls()),
                content,
                model: request.model.clone(),
                usage: Usage::default(),
            }),
            None => Err(LlmError::InvalidRequest(
                "mock response queue is empty".to_string(),
            )),
        }
    }
}

// -- in-memory store --------------------------------------------------

#[derive(Default)]
struct StoreInner {
    projects: Vec<Project>,
    segments: Vec<Segment>,
    final_segments: Vec<FinalSegment>,
    canvases: Vec<Canvas>,
    pains: Vec<Pain>,
    rankings: Vec<PainRanking>,
    segment_drafts: Vec<SegmentDraft>,
    canvas_drafts: Vec<CanvasDraft>,
    pain_drafts: Vec<PainDraft>,
    ranking_drafts: Vec<RankingDraft>,
    detail_drafts: Vec<DetailDraft>,
}

/// Clone-able in-memory store backing all five repository traits.
#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl MemoryStore {
    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap()
    }

    // -- assertion helpers --------------------------------------------

    pub(crate) fn current_step(&self, project_id: &Uuid) -> WorkflowStep {
        self.lock()
            .projects
            .iter()
            .find(|p| p.id == *project_id)
            .map(|p| p.current_step)
            .unwrap()
    }

    pub(crate) fn segment_ids(&self, project_id: &Uuid) -> Vec<Uuid> {
        let guard = self.lock();
        let mut segments: Vec<(i64, Uuid)> = guard
            .segments
            .iter()
            .filter(|s| s.project_id == *project_id)
            .map(|s| (s.segment_index, s.id))
            .collect();
        segments.sort_by_key(|(index, _)| *index);
        segments.into_iter().map(|(_, id)| id).collect()
    }

    pub(crate) fn pain_ids(&self, project_id: &Uuid) -> Vec<Uuid> {
        self.lock()
            .pains
            .iter()
            .filter(|p| p.project_id == *project_id)
            .map(|p| p.id)
            .collect()
    }

    pub(crate) fn segment_draft_count(&self, project_id: &Uuid) -> usize {
        self.lock()
            .segment_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .count()
    }

    pub(crate) fn ranking_draft_count(&self, project_id: &Uuid) -> usize {
        self.lock()
            .ranking_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .count()
    }

    pub(crate) fn ranking_overlay_count(&self, project_id: &Uuid) -> usize {
        self.lock()
            .rankings
            .iter()
            .filter(|r| r.project_id == *project_id)
            .count()
    }

    pub(crate) fn final_segment_count(&self, project_id: &Uuid) -> usize {
        self.lock()
            .final_segments
            .iter()
            .filter(|s| s.project_id == *project_id)
            .count()
    }

    /// Mark the `pain_index == 0` pain of a segment as a top pain in the
    /// ranking overlay.
    pub(crate) fn rank_first_pain_of_segment(&self, segment_id: &Uuid) {
        let mut guard = self.lock();
        let pain = guard
            .pains
            .iter()
            .find(|p| p.segment_id == *segment_id && p.pain_index == 0)
            .cloned()
            .unwrap();
        guard.rankings.push(PainRanking {
            pain_id: pain.id,
            project_id: pain.project_id,
            is_top_pain: true,
            impact_score: 9,
            rationale: "test top pain".to_string(),
            created_at: Utc::now(),
        });
    }

    /// Seed pre-existing final segments, as if an earlier details
    /// approval ran.
    pub(crate) fn seed_final_segments(&self, project_id: &Uuid, count: usize) {
        let mut guard = self.lock();
        for i in 0..count {
            guard.final_segments.push(FinalSegment {
                id: Uuid::now_v7(),
                project_id: *project_id,
                segment_index: i as i64,
                name: format!("old segment {i}"),
                description: "old".to_string(),
                demographics: "old".to_string(),
                buying_behavior: "old".to_string(),
                created_at: Utc::now(),
            });
        }
    }
}

impl ProjectRepository for MemoryStore {
    async fn get(&self, id: &Uuid) -> Result<Option<Project>, RepositoryError> {
        Ok(self.lock().projects.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert(&self, project: Project) -> Result<Project, RepositoryError> {
        self.lock().projects.push(project.clone());
        Ok(project)
    }

    async fn set_current_step(
        &self,
        id: &Uuid,
        step: WorkflowStep,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.lock();
        let project = guard
            .projects
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or(RepositoryError::NotFound)?;
        project.current_step = step;
        project.updated_at = Utc::now();
        Ok(())
    }
}

impl SegmentRepository for MemoryStore {
    async fn list_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<Segment>, RepositoryError> {
        let mut rows: Vec<Segment> = self
            .lock()
            .segments
            .iter()
            .filter(|s| s.project_id == *project_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.segment_index);
        Ok(rows)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Segment>, RepositoryError> {
        Ok(self.lock().segments.iter().find(|s| s.id == *id).cloned())
    }

    async fn insert(&self, segment: Segment) -> Result<Segment, RepositoryError> {
        self.lock().segments.push(segment.clone());
        Ok(segment)
    }

    async fn list_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<FinalSegment>, RepositoryError> {
        let mut rows: Vec<FinalSegment> = self
            .lock()
            .final_segments
            .iter()
            .filter(|s| s.project_id == *project_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.segment_index);
        Ok(rows)
    }

    async fn delete_final_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<u64, RepositoryError> {
        let mut guard = self.lock();
        let before = guard.final_segments.len();
        guard.final_segments.retain(|s| s.project_id != *project_id);
        Ok((before - guard.final_segments.len()) as u64)
    }

    async fn insert_final(
        &self,
        segment: FinalSegment,
    ) -> Result<FinalSegment, RepositoryError> {
        self.lock().final_segments.push(segment.clone());
        Ok(segment)
    }
}

impl CanvasRepository for MemoryStore {
    async fn get_for_segment(
        &self,
        segment_id: &Uuid,
    ) -> Result<Option<Canvas>, RepositoryError> {
        Ok(self
            .lock()
            .canvases
            .iter()
            .find(|c| c.segment_id == *segment_id)
            .cloned())
    }

    async fn insert(&self, canvas: Canvas) -> Result<Canvas, RepositoryError> {
        self.lock().canvases.push(canvas.clone());
        Ok(canvas)
    }
}

impl PainRepository for MemoryStore {
    async fn list_for_segment(
        &self,
        segment_id: &Uuid,
    ) -> Result<Vec<Pain>, RepositoryError> {
        let mut rows: Vec<Pain> = self
            .lock()
            .pains
            .iter()
            .filter(|p| p.segment_id == *segment_id)
            .cloned()
            .collect();
        rows.sort_by_key(|p| p.pain_index);
        Ok(rows)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Pain>, RepositoryError> {
        Ok(self.lock().pains.iter().find(|p| p.id == *id).cloned())
    }

    async fn insert(&self, pain: Pain) -> Result<Pain, RepositoryError> {
        self.lock().pains.push(pain.clone());
        Ok(pain)
    }

    async fn list_rankings_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<Vec<PainRanking>, RepositoryError> {
        Ok(self
            .lock()
            .rankings
            .iter()
            .filter(|r| r.project_id == *project_id)
            .cloned()
            .collect())
    }

    async fn insert_ranking(
        &self,
        ranking: PainRanking,
    ) -> Result<PainRanking, RepositoryError> {
        self.lock().rankings.push(ranking.clone());
        Ok(ranking)
    }
}

impl DraftRepository for MemoryStore {
    async fn insert_segment_drafts(
        &self,
        drafts: Vec<SegmentDraft>,
    ) -> Result<Vec<SegmentDraft>, RepositoryError> {
        self.lock().segment_drafts.extend(drafts.iter().cloned());
        Ok(drafts)
    }

    async fn segment_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<SegmentDraft>, RepositoryError> {
        Ok(self
            .lock()
            .segment_drafts
            .iter()
            .filter(|d| d.project_id == *project_id && ids.contains(&d.id))
            .cloned()
            .collect())
    }

    async fn latest_segment_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .segment_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .map(|d| d.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_canvas_drafts(
        &self,
        drafts: Vec<CanvasDraft>,
    ) -> Result<Vec<CanvasDraft>, RepositoryError> {
        self.lock().canvas_drafts.extend(drafts.iter().cloned());
        Ok(drafts)
    }

    async fn canvas_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<CanvasDraft>, RepositoryError> {
        Ok(self
            .lock()
            .canvas_drafts
            .iter()
            .filter(|d| {
                d.project_id == *project_id
                    && ids.contains(&d.id)
                    && segment_id.is_none_or(|s| d.segment_id == *s)
            })
            .cloned()
            .collect())
    }

    async fn latest_canvas_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .canvas_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .map(|d| d.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_pain_drafts(
        &self,
        drafts: Vec<PainDraft>,
    ) -> Result<Vec<PainDraft>, RepositoryError> {
        self.lock().pain_drafts.extend(drafts.iter().cloned());
        Ok(drafts)
    }

    async fn pain_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<PainDraft>, RepositoryError> {
        Ok(self
            .lock()
            .pain_drafts
            .iter()
            .filter(|d| {
                d.project_id == *project_id
                    && ids.contains(&d.id)
                    && segment_id.is_none_or(|s| d.segment_id == *s)
            })
            .cloned()
            .collect())
    }

    async fn latest_pain_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .pain_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .map(|d| d.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_ranking_drafts(
        &self,
        drafts: Vec<RankingDraft>,
    ) -> Result<Vec<RankingDraft>, RepositoryError> {
        self.lock().ranking_drafts.extend(drafts.iter().cloned());
        Ok(drafts)
    }

    async fn ranking_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<RankingDraft>, RepositoryError> {
        Ok(self
            .lock()
            .ranking_drafts
            .iter()
            .filter(|d| {
                d.project_id == *project_id
                    && ids.contains(&d.id)
                    && segment_id.is_none_or(|s| d.segment_id == Some(*s))
            })
            .cloned()
            .collect())
    }

    async fn latest_ranking_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .ranking_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .map(|d| d.version)
            .max()
            .unwrap_or(0))
    }

    async fn insert_detail_drafts(
        &self,
        drafts: Vec<DetailDraft>,
    ) -> Result<Vec<DetailDraft>, RepositoryError> {
        self.lock().detail_drafts.extend(drafts.iter().cloned());
        Ok(drafts)
    }

    async fn detail_drafts_by_ids(
        &self,
        project_id: &Uuid,
        ids: &[Uuid],
        segment_id: Option<&Uuid>,
    ) -> Result<Vec<DetailDraft>, RepositoryError> {
        Ok(self
            .lock()
            .detail_drafts
            .iter()
            .filter(|d| {
                d.project_id == *project_id
                    && ids.contains(&d.id)
                    && segment_id.is_none_or(|s| d.segment_id == *s)
            })
            .cloned()
            .collect())
    }

    async fn latest_detail_draft_version(
        &self,
        project_id: &Uuid,
    ) -> Result<i64, RepositoryError> {
        Ok(self
            .lock()
            .detail_drafts
            .iter()
            .filter(|d| d.project_id == *project_id)
            .map(|d| d.version)
            .max()
            .unwrap_or(0))
    }

    async fn delete_all_for_project(
        &self,
        project_id: &Uuid,
    ) -> Result<u64, RepositoryError> {
        let mut guard = self.lock();
        let before = guard.segment_drafts.len()
            + guard.canvas_drafts.len()
            + guard.pain_drafts.len()
            + guard.ranking_drafts.len()
            + guard.detail_drafts.len();
        guard.segment_drafts.retain(|d| d.project_id != *project_id);
        guard.canvas_drafts.retain(|d| d.project_id != *project_id);
        guard.pain_drafts.retain(|d| d.project_id != *project_id);
        guard.ranking_drafts.retain(|d| d.project_id != *project_id);
        guard.detail_drafts.retain(|d| d.project_id != *project_id);
        let after = guard.segment_drafts.len()
            + guard.canvas_drafts.len()
            + guard.pain_drafts.len()
            + guard.ranking_drafts.len()
            + guard.detail_drafts.len();
        Ok((before - after) as u64)
    }
}

// -- rig --------------------------------------------------------------

type TestGenerator =
    DraftGenerator<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore>;
type TestApprover =
    ApprovalService<MemoryStore, MemoryStore, MemoryStore, MemoryStore, MemoryStore>;

pub(crate) struct Rig {
    pub(crate) provider: MockProvider,
    pub(crate) store: MemoryStore,
    pub(crate) generator: TestGenerator,
    pub(crate) approver: TestApprover,
    pub(crate) project_id: Uuid,
}

#[derive(Default)]
pub(crate) struct RigOptions {
    /// Canonical segments seeded into the project.
    pub(crate) segments: usize,
    /// Canonical pains seeded per segment.
    pub(crate) pains_per_segment: usize,
    /// Seed the project with a null onboarding payload.
    pub(crate) null_onboarding: bool,
}

/// Build a rig around one freshly seeded project at the onboarding step.
pub(crate) async fn rig(options: RigOptions) -> Rig {
    let provider = MockProvider::default();
    let store = MemoryStore::default();
    let now = Utc::now();

    let onboarding = if options.null_onboarding {
        serde_json::Value::Null
    } else {
        serde_json::json!({
            "company": "Acme Tools",
            "product": "cordless workbench",
            "market": "professional carpenters",
        })
    };

    let project = Project {
        id: Uuid::now_v7(),
        user_id: "user-1".to_string(),
        name: "test project".to_string(),
        current_step: WorkflowStep::Onboarding,
        onboarding,
        created_at: now,
        updated_at: now,
    };
    let project_id = project.id;
    ProjectRepository::insert(&store, project).await.unwrap();

    for i in 0..options.segments {
        let segment = Segment {
            id: Uuid::now_v7(),
            project_id,
            segment_index: i as i64,
            name: format!("segment {i}"),
            description: "seeded segment".to_string(),
            created_at: now,
        };
        let segment_id = segment.id;
        SegmentRepository::insert(&store, segment).await.unwrap();

        for j in 0..options.pains_per_segment {
            let pain = Pain {
                id: Uuid::now_v7(),
                project_id,
                segment_id,
                pain_index: j as i64,
                title: format!("pain {j}"),
                description: "seeded pain".to_string(),
                severity: 5,
                created_at: now,
            };
            PainRepository::insert(&store, pain).await.unwrap();
        }
    }

    let generator = DraftGenerator::new(
        BoxTextProvider::new(provider.clone()),
        RetryPolicy::new(3, Duration::from_millis(1)),
        "mock-model".to_string(),
        1024,
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    let approver = ApprovalService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    Rig { provider, store, generator, approver, project_id }
}
