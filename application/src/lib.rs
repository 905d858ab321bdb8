use async_trait::async_trait;
use domain::{DomainError, Repository, RepositoryDraft, RepositoryId};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

// --- Application Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum ApplicationError {
    /// The display text is what clients receive, so it carries no id.
    #[error("Repository not found")]
    NotFound(RepositoryId),
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::RepositoryNotFound(id) => ApplicationError::NotFound(id),
        }
    }
}

// --- Infrastructure Interfaces (Traits) ---

/// Interface for the process-wide repository store.
/// Every method is one atomic read-modify-write against the store.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Returns every stored repository in insertion order.
    async fn list(&self) -> Result<Vec<Repository>, ApplicationError>;
    /// Appends a new repository built from the draft.
    async fn create(&self, draft: RepositoryDraft) -> Result<Repository, ApplicationError>;
    /// Replaces title, url and techs of an existing repository.
    async fn update(
        &self,
        id: &RepositoryId,
        draft: RepositoryDraft,
    ) -> Result<Repository, ApplicationError>;
    /// Removes a repository by its ID.
    async fn delete(&self, id: &RepositoryId) -> Result<(), ApplicationError>;
    /// Increments the likes of a repository by one.
    async fn like(&self, id: &RepositoryId) -> Result<Repository, ApplicationError>;
}

// --- Request/Response Models (Data Transfer Objects - DTOs) ---

// Create/update bodies deserialize straight into domain::RepositoryDraft,
// and records are returned as domain::Repository.

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<&ApplicationError> for ErrorResponse {
    fn from(err: &ApplicationError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

// --- Application Services (Use Cases) ---

/// Service exposing the repository use cases to the transport layer.
pub struct RepositoryService {
    store: Arc<dyn RepositoryStore>,
}

impl RepositoryService {
    pub fn new(store: Arc<dyn RepositoryStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, ApplicationError> {
        let repositories = self.store.list().await?;
        info!(count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    #[instrument(skip(self, draft))]
    pub async fn create_repository(
        &self,
        draft: RepositoryDraft,
    ) -> Result<Repository, ApplicationError> {
        let repository = self.store.create(draft).await?;
        info!(repository_id = %repository.id(), "Repository created");
        Ok(repository)
    }

    #[instrument(skip(self, draft))]
    pub async fn update_repository(
        &self,
        id: &RepositoryId,
        draft: RepositoryDraft,
    ) -> Result<Repository, ApplicationError> {
        info!(repository_id = %id, "Attempting to update repository");
        self.store.update(id, draft).await.inspect_err(|e| {
            warn!(repository_id = %id, "Update failed: {}", e);
        })
    }

    #[instrument(skip(self))]
    pub async fn delete_repository(&self, id: &RepositoryId) -> Result<(), ApplicationError> {
        info!(repository_id = %id, "Attempting to delete repository");
        self.store.delete(id).await.inspect_err(|e| {
            warn!(repository_id = %id, "Deletion failed: {}", e);
        })
    }

    #[instrument(skip(self))]
    pub async fn like_repository(&self, id: &RepositoryId) -> Result<Repository, ApplicationError> {
        let repository = self.store.like(id).await.inspect_err(|e| {
            warn!(repository_id = %id, "Like failed: {}", e);
        })?;
        info!(repository_id = %id, likes = repository.likes(), "Repository liked");
        Ok(repository)
    }
}
