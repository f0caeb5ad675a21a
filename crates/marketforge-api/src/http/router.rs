//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/` except `/health`.
//! Middleware: CORS, request tracing.

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Projects
        .route("/projects", post(handlers::project::create))
        .route("/projects", get(handlers::project::list))
        .route("/projects/{id}", get(handlers::project::get))
        .route("/projects/{id}/drafts", delete(handlers::project::reset_drafts))
        // Draft generation
        .route("/generate/segments", post(handlers::generate::segments))
        .route("/generate/canvas", post(handlers::generate::canvas))
        .route("/generate/pains", post(handlers::generate::pains))
        .route("/generate/pains-ranking", post(handlers::generate::pains_ranking))
        .route(
            "/generate/segment-details",
            post(handlers::generate::segment_details),
        )
        // Approval
        .route("/approve/segments", post(handlers::approve::segments))
        .route("/approve/canvas", post(handlers::approve::canvas))
        .route("/approve/pains", post(handlers::approve::pains))
        .route("/approve/pains-ranking", post(handlers::approve::pains_ranking))
        .route(
            "/approve/segment-details",
            post(handlers::approve::segment_details),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        // Health stays outside auth and versioning.
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
