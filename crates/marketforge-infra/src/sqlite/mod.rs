//! SQLite implementations of the `marketforge-core` repository traits.

pub mod canvas;
pub mod draft;
pub mod pain;
pub mod pool;
pub mod project;
pub mod segment;

pub use canvas::SqliteCanvasRepository;
pub use draft::SqliteDraftRepository;
pub use pain::SqlitePainRepository;
pub use pool::DatabasePool;
pub use project::SqliteProjectRepository;
pub use segment::SqliteSegmentRepository;

use chrono::{DateTime, Utc};
use marketforge_types::error::RepositoryError;

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepositoryError> {
    s.parse()
        .map_err(|e| RepositoryError::Query(format!("invalid uuid: {e}")))
}

/// `?, ?, ...` placeholder list for an `IN (...)` clause.
fn placeholders(n: usize) -> String {
    let mut s = String::with_capacity(n * 3);
    for i in 0..n {
        if i > 0 {
            s.push_str(", ");
        }
        s.push('?');
    }
    s
}
