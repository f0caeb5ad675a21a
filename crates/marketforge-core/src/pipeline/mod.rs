//! The staged draft/approve pipeline.
//!
//! [`generate::DraftGenerator`] produces draft rows from provider calls;
//! [`approve::ApprovalService`] reconciles reviewed drafts into canonical
//! rows. Both advance the project step pointer exclusively through
//! [`crate::step::StepGraph`].

pub mod approve;
pub mod generate;
pub mod outcome;
pub mod output;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;
