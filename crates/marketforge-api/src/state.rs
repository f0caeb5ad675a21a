//! Application state wiring all services together.
//!
//! The pipeline services are generic over the repository traits;
//! AppState pins them to the concrete SQLite implementations and the
//! Anthropic provider.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use marketforge_core::llm::{BoxTextProvider, RetryPolicy};
use marketforge_core::pipeline::approve::ApprovalService;
use marketforge_core::pipeline::generate::DraftGenerator;
use marketforge_infra::config::{data_dir, database_url, load_config};
use marketforge_infra::llm::AnthropicProvider;
use marketforge_infra::sqlite::{
    DatabasePool, SqliteCanvasRepository, SqliteDraftRepository, SqlitePainRepository,
    SqliteProjectRepository, SqliteSegmentRepository,
};
use marketforge_types::config::AppConfig;

/// Concrete type aliases for the service generics pinned to infra
/// implementations.
pub type ConcreteGenerator = DraftGenerator<
    SqliteProjectRepository,
    SqliteSegmentRepository,
    SqliteCanvasRepository,
    SqlitePainRepository,
    SqliteDraftRepository,
>;

pub type ConcreteApprover = ApprovalService<
    SqliteProjectRepository,
    SqliteSegmentRepository,
    SqliteCanvasRepository,
    SqlitePainRepository,
    SqliteDraftRepository,
>;

/// Shared application state used by the REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<ConcreteGenerator>,
    pub approver: Arc<ConcreteApprover>,
    pub projects: Arc<SqliteProjectRepository>,
    pub drafts: Arc<SqliteDraftRepository>,
    pub db_pool: DatabasePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, wire the provider and services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| anyhow::anyhow!("ANTHROPIC_API_KEY is not set"))?;
        let provider = AnthropicProvider::new(SecretString::from(api_key))
            .map_err(|e| anyhow::anyhow!("failed to build provider: {e}"))?;

        let retry = RetryPolicy::new(
            config.retry_max_attempts,
            Duration::from_millis(config.retry_base_delay_ms),
        );

        let generator = DraftGenerator::new(
            BoxTextProvider::new(provider),
            retry,
            config.model.clone(),
            config.max_output_tokens,
            SqliteProjectRepository::new(db_pool.clone()),
            SqliteSegmentRepository::new(db_pool.clone()),
            SqliteCanvasRepository::new(db_pool.clone()),
            SqlitePainRepository::new(db_pool.clone()),
            SqliteDraftRepository::new(db_pool.clone()),
        );

        let approver = ApprovalService::new(
            SqliteProjectRepository::new(db_pool.clone()),
            SqliteSegmentRepository::new(db_pool.clone()),
            SqliteCanvasRepository::new(db_pool.clone()),
            SqlitePainRepository::new(db_pool.clone()),
            SqliteDraftRepository::new(db_pool.clone()),
        );

        Ok(Self {
            generator: Arc::new(generator),
            approver: Arc::new(approver),
            projects: Arc::new(SqliteProjectRepository::new(db_pool.clone())),
            drafts: Arc::new(SqliteDraftRepository::new(db_pool.clone())),
            db_pool,
            config: Arc::new(config),
        })
    }
}
