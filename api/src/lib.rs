//! HTTP surface of the repository store: router, handlers and server config.

pub mod config;
mod handlers;

use application::{RepositoryService, RepositoryStore};
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    repository_service: Arc<RepositoryService>,
}

impl AppState {
    pub fn new(store: Arc<dyn RepositoryStore>) -> Self {
        Self {
            repository_service: Arc::new(RepositoryService::new(store)),
        }
    }
}

/// Builds the router with all routes. Cross-origin requests are allowed from anywhere.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/repositories",
            get(handlers::list_repositories_handler).post(handlers::create_repository_handler),
        )
        .route(
            "/repositories/:id",
            put(handlers::update_repository_handler).delete(handlers::delete_repository_handler),
        )
        .route("/repositories/:id/like", post(handlers::like_repository_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
