// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{ApplicationError, RepositoryStore};
use async_trait::async_trait;
use domain::{Repository, RepositoryCollection, RepositoryDraft, RepositoryId};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

// --- Repository Store Implementation ---

/// Process-wide store. Lives as long as the process and starts empty.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepositoryStore {
    // Writers hold the lock across lookup and mutation
    repositories: Arc<RwLock<RepositoryCollection>>,
}

impl InMemoryRepositoryStore {
    pub fn new() -> Self {
        Self {
            repositories: Arc::new(RwLock::new(RepositoryCollection::new())),
        }
    }
}

#[async_trait]
impl RepositoryStore for InMemoryRepositoryStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Repository>, ApplicationError> {
        let repositories = self.repositories.read().await;
        debug!(count = repositories.len(), "Listing repositories from in-memory store");
        Ok(repositories.list().to_vec())
    }

    #[instrument(skip(self, draft))]
    async fn create(&self, draft: RepositoryDraft) -> Result<Repository, ApplicationError> {
        let repository = self.repositories.write().await.create(draft);
        debug!(repository_id = %repository.id(), "Appended repository to in-memory store");
        Ok(repository)
    }

    #[instrument(skip(self, draft))]
    async fn update(
        &self,
        id: &RepositoryId,
        draft: RepositoryDraft,
    ) -> Result<Repository, ApplicationError> {
        debug!(repository_id = %id, "Updating repository in in-memory store");
        Ok(self.repositories.write().await.update(id, draft)?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &RepositoryId) -> Result<(), ApplicationError> {
        debug!(repository_id = %id, "Deleting repository from in-memory store");
        Ok(self.repositories.write().await.delete(id)?)
    }

    #[instrument(skip(self))]
    async fn like(&self, id: &RepositoryId) -> Result<Repository, ApplicationError> {
        debug!(repository_id = %id, "Liking repository in in-memory store");
        Ok(self.repositories.write().await.like(id)?)
    }
}
