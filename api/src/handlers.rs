use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json as JsonResponse, Response},
};
use tracing::{error, info, warn};

use application::{ApplicationError, ErrorResponse};
use domain::{RepositoryDraft, RepositoryId};

use crate::AppState;

// --- API Handlers ---

pub async fn health_check() -> impl IntoResponse {
    info!("Health check endpoint called");
    (StatusCode::OK, "OK")
}

/// Handler for listing repositories (GET /repositories).
pub async fn list_repositories_handler(State(state): State<AppState>) -> Response {
    info!("Received request to list repositories");
    match state.repository_service.list_repositories().await {
        Ok(repositories) => (StatusCode::OK, JsonResponse(repositories)).into_response(),
        Err(e) => {
            error!("Failed to list repositories via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for creating a repository (POST /repositories).
///
/// Only syntactically broken JSON is rejected; a missing body counts as empty.
pub async fn create_repository_handler(
    State(state): State<AppState>,
    payload: Result<Json<RepositoryDraft>, JsonRejection>,
) -> Response {
    info!("Received request to create repository");
    let draft = match read_draft(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    match state.repository_service.create_repository(draft).await {
        Ok(repository) => (StatusCode::OK, JsonResponse(repository)).into_response(),
        Err(e) => {
            error!("Failed to create repository via handler: {}", e);
            map_application_error_to_response(e)
        }
    }
}

/// Handler for updating a repository (PUT /repositories/:id).
pub async fn update_repository_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RepositoryDraft>, JsonRejection>,
) -> Response {
    let id = RepositoryId::new(id);
    info!(repository_id = %id, "Received request to update repository");
    let draft = match read_draft(payload) {
        Ok(draft) => draft,
        Err(response) => return response,
    };
    match state.repository_service.update_repository(&id, draft).await {
        Ok(repository) => (StatusCode::OK, JsonResponse(repository)).into_response(),
        Err(e) => map_application_error_to_response(e),
    }
}

/// Handler for deleting a repository (DELETE /repositories/:id).
pub async fn delete_repository_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RepositoryId::new(id);
    info!(repository_id = %id, "Received request to delete repository");
    match state.repository_service.delete_repository(&id).await {
        Ok(()) => (StatusCode::NO_CONTENT, "").into_response(), // 204 No Content
        Err(e) => map_application_error_to_response(e),
    }
}

/// Handler for liking a repository (POST /repositories/:id/like).
pub async fn like_repository_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = RepositoryId::new(id);
    info!(repository_id = %id, "Received request to like repository");
    match state.repository_service.like_repository(&id).await {
        Ok(repository) => (StatusCode::OK, JsonResponse(repository)).into_response(),
        Err(e) => map_application_error_to_response(e),
    }
}

/// Malformed JSON is a 400. Any other body problem (no content type, a body
/// that is not an object) is read as an empty draft.
fn read_draft(
    payload: Result<Json<RepositoryDraft>, JsonRejection>,
) -> Result<RepositoryDraft, Response> {
    match payload {
        Ok(Json(draft)) => Ok(draft),
        Err(JsonRejection::JsonSyntaxError(rejection)) => {
            warn!("Rejected malformed JSON body: {}", rejection.body_text());
            let body = ErrorResponse {
                error: rejection.body_text(),
            };
            Err((StatusCode::BAD_REQUEST, JsonResponse(body)).into_response())
        }
        Err(rejection) => {
            info!("Treating unreadable body as empty: {}", rejection.body_text());
            Ok(RepositoryDraft::default())
        }
    }
}

/// Maps ApplicationError to an HTTP status code and `{ "error": ... }` body.
pub(crate) fn map_application_error_to_response(err: ApplicationError) -> Response {
    let status = match err {
        ApplicationError::NotFound(_) => StatusCode::BAD_REQUEST,
    };
    (status, JsonResponse(ErrorResponse::from(&err))).into_response()
}
