//! Persistence interfaces consumed by the pipeline.
//!
//! All traits use RPITIT (return position `impl Trait` in traits) with
//! `Send` futures, no `async_trait` macro. SQLite implementations live
//! in marketforge-infra; the pipeline tests substitute in-memory ones.

pub mod canvas;
pub mod draft;
pub mod pain;
pub mod project;
pub mod segment;

pub use canvas::CanvasRepository;
pub use draft::DraftRepository;
pub use pain::PainRepository;
pub use project::ProjectRepository;
pub use segment::SegmentRepository;
