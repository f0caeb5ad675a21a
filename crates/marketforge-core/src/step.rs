//! The step graph: the single stage-to-successor lookup table.
//!
//! Both the draft generators and the approval transactions consult this
//! module for every step-pointer advance, so the two call sites cannot
//! drift apart. Totality is compiler-checked: the successor function is
//! an exhaustive match over `WorkflowStep`, and adding a step without a
//! successor is a compile error rather than a runtime surprise.

use marketforge_types::project::{Stage, WorkflowStep};

/// Static stage-to-successor lookup.
pub struct StepGraph;

impl StepGraph {
    /// The next step after `step` in the fixed workflow ordering.
    ///
    /// `Completed` is terminal and maps to itself.
    pub fn successor(step: WorkflowStep) -> WorkflowStep {
        match step {
            WorkflowStep::Onboarding => WorkflowStep::SegmentsDraft,
            WorkflowStep::SegmentsDraft => WorkflowStep::SegmentsApproved,
            WorkflowStep::SegmentsApproved => WorkflowStep::CanvasDraft,
            WorkflowStep::CanvasDraft => WorkflowStep::CanvasApproved,
            WorkflowStep::CanvasApproved => WorkflowStep::PainsDraft,
            WorkflowStep::PainsDraft => WorkflowStep::PainsApproved,
            WorkflowStep::PainsApproved => WorkflowStep::RankingDraft,
            WorkflowStep::RankingDraft => WorkflowStep::RankingApproved,
            WorkflowStep::RankingApproved => WorkflowStep::DetailsDraft,
            WorkflowStep::DetailsDraft => WorkflowStep::Completed,
            WorkflowStep::Completed => WorkflowStep::Completed,
        }
    }

    /// The draft step a generator run for `stage` advances the project to.
    pub fn draft_step(stage: Stage) -> WorkflowStep {
        match stage {
            Stage::Segments => WorkflowStep::SegmentsDraft,
            Stage::Canvas => WorkflowStep::CanvasDraft,
            Stage::Pains => WorkflowStep::PainsDraft,
            Stage::PainsRanking => WorkflowStep::RankingDraft,
            Stage::SegmentDetails => WorkflowStep::DetailsDraft,
        }
    }

    /// The step an approval for `stage` advances the project to: the
    /// successor of the stage's draft step.
    pub fn approved_step(stage: Stage) -> WorkflowStep {
        Self::successor(Self::draft_step(stage))
    }
}
