//! Prompt construction for every generation stage.
//!
//! Each builder returns the user-message text for one scope unit; the
//! shared system prompt pins the output contract (JSON only, exact
//! shape). Prompt wording is deliberately plain -- the shape contract in
//! [`super::output`] is what the pipeline actually depends on.

use marketforge_types::pain::{Pain, RankedPain};
use marketforge_types::project::Project;
use marketforge_types::segment::Segment;
use marketforge_types::canvas::Canvas;

/// System prompt shared by all stages: a market-research analyst that
/// answers with a single JSON document.
pub fn system_prompt() -> String {
    "You are a market-research analyst. Respond with a single JSON document \
     matching the requested shape exactly. Do not add commentary before or \
     after the JSON."
        .to_string()
}

/// Segments stage: derive audience segments from the onboarding payload.
pub fn segments_prompt(project: &Project) -> String {
    format!(
        "Project: {name}\n\
         Business context:\n{context}\n\n\
         Identify 3 to 5 distinct audience segments for this business.\n\
         Respond with: {{\"segments\": [{{\"name\": \"...\", \"description\": \"...\"}}]}}",
        name = project.name,
        context = serde_json::to_string_pretty(&project.onboarding)
            .unwrap_or_else(|_| "{}".to_string()),
    )
}

/// Canvas stage: a value-proposition canvas for one segment.
pub fn canvas_prompt(project: &Project, segment: &Segment) -> String {
    format!(
        "Project: {name}\n\
         Segment #{index}: {segment_name}\n\
         {description}\n\n\
         Draft a value-proposition canvas for this segment.\n\
         Respond with: {{\"jobs\": \"...\", \"pains\": \"...\", \"gains\": \"...\"}}",
        name = project.name,
        index = segment.segment_index,
        segment_name = segment.name,
        description = segment.description,
    )
}

/// Pains stage: concrete customer pains for one segment, canvas-informed
/// when a canvas has been approved.
pub fn pains_prompt(project: &Project, segment: &Segment, canvas: Option<&Canvas>) -> String {
    let canvas_block = canvas
        .map(|c| {
            format!(
                "\nApproved canvas:\njobs: {}\npains: {}\ngains: {}\n",
                c.jobs, c.pains, c.gains
            )
        })
        .unwrap_or_default();

    format!(
        "Project: {name}\n\
         Segment: {segment_name}\n\
         {description}\n{canvas_block}\n\
         List the 3 to 6 most pressing customer pains for this segment.\n\
         Severity is an integer from 1 (mild) to 5 (blocking).\n\
         Respond with: {{\"pains\": [{{\"title\": \"...\", \"description\": \"...\", \"severity\": 3}}]}}",
        name = project.name,
        segment_name = segment.name,
        description = segment.description,
    )
}

/// Ranking stage: importance ranking over a segment's approved pains.
///
/// Each pain is listed with its `pain_index`; the model must echo that
/// index back so items can be correlated to the pains they rank.
pub fn ranking_prompt(segment: &Segment, pains: &[Pain]) -> String {
    let pain_lines: String = pains
        .iter()
        .map(|p| format!("  [{}] {} -- {}\n", p.pain_index, p.title, p.description))
        .collect();

    format!(
        "Segment: {segment_name}\n\
         Approved pains (by index):\n{pain_lines}\n\
         Rank every pain by business impact. Mark at least one pain with\n\
         \"is_top_pain\": true. Echo each pain's index as \"pain_index\".\n\
         Impact score is an integer from 1 to 10.\n\
         Respond with: {{\"rankings\": [{{\"pain_index\": 0, \"is_top_pain\": true, \
         \"impact_score\": 8, \"rationale\": \"...\"}}]}}",
        segment_name = segment.name,
    )
}

/// Details stage: the final enriched description of one segment, built
/// on its top-ranked pains.
pub fn detail_prompt(segment: &Segment, top_pains: &[RankedPain]) -> String {
    let pain_lines: String = top_pains
        .iter()
        .map(|rp| {
            format!(
                "  - {} (impact {}): {}\n",
                rp.pain.title, rp.impact_score, rp.pain.description
            )
        })
        .collect();

    format!(
        "Segment: {segment_name}\n\
         {description}\n\
         Top-ranked pains:\n{pain_lines}\n\
         Write the final detailed profile of this segment.\n\
         Respond with: {{\"name\": \"...\", \"description\": \"...\", \
         \"demographics\": \"...\", \"buying_behavior\": \"...\"}}",
        segment_name = segment.name,
        description = segment.description,
    )
}
