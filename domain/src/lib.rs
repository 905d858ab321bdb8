use serde::{Deserialize, Deserializer, Serialize}; // For the record representation in transit
use serde_json::Value; // Caller-supplied fields are stored as-is
use thiserror::Error;
use uuid::Uuid;

// --- Domain Errors ---
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("Repository '{0}' not found")]
    RepositoryNotFound(RepositoryId),
}

// --- Repository ID ---

/// Opaque identifier of a repository record. Path segments are wrapped as-is,
/// so an id that was never generated here just fails to match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryId(String);

impl RepositoryId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generates a fresh random (v4 UUID) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Repository Draft ---

/// The caller-supplied part of a repository. Nothing here is validated: a
/// missing field stays missing, a mistyped one is stored with its type, and an
/// explicit `null` is kept as `Some(Value::Null)`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RepositoryDraft {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub techs: Option<Value>,
}

// Only called for keys present in the body; absent keys fall back to `default`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// --- Repository ---

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Repository {
    id: RepositoryId,
    #[serde(flatten)]
    draft: RepositoryDraft,
    likes: u64,
}

impl Repository {
    /// Creates a record with a server-generated id and zero likes.
    pub fn new(draft: RepositoryDraft) -> Self {
        Self {
            id: RepositoryId::generate(),
            draft,
            likes: 0,
        }
    }

    pub fn id(&self) -> &RepositoryId {
        &self.id
    }

    pub fn title(&self) -> Option<&Value> {
        self.draft.title.as_ref()
    }

    pub fn url(&self) -> Option<&Value> {
        self.draft.url.as_ref()
    }

    pub fn techs(&self) -> Option<&Value> {
        self.draft.techs.as_ref()
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    /// Replaces title, url and techs. Id and likes are kept.
    fn revise(&mut self, draft: RepositoryDraft) {
        self.draft = draft;
    }

    fn like(&mut self) {
        self.likes += 1;
    }
}

// --- Repository Collection ---

/// Ordered sequence of repositories in insertion order. Each operation is a
/// single read-modify-write; callers sharing one collection across threads
/// must serialize access themselves.
#[derive(Debug, Clone, Default)]
pub struct RepositoryCollection {
    repositories: Vec<Repository>,
}

impl RepositoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Appends a new record built from `draft` and returns a copy of it.
    pub fn create(&mut self, draft: RepositoryDraft) -> Repository {
        let repository = Repository::new(draft);
        self.repositories.push(repository.clone());
        repository
    }

    pub fn update(
        &mut self,
        id: &RepositoryId,
        draft: RepositoryDraft,
    ) -> Result<Repository, DomainError> {
        let repository = self.find_mut(id)?;
        repository.revise(draft);
        Ok(repository.clone())
    }

    /// Removes the matched record; the remaining ones keep their order.
    pub fn delete(&mut self, id: &RepositoryId) -> Result<(), DomainError> {
        let index = self.position(id)?;
        self.repositories.remove(index);
        Ok(())
    }

    pub fn like(&mut self, id: &RepositoryId) -> Result<Repository, DomainError> {
        let repository = self.find_mut(id)?;
        repository.like();
        Ok(repository.clone())
    }

    // Linear scan, first match wins.
    fn position(&self, id: &RepositoryId) -> Result<usize, DomainError> {
        self.repositories
            .iter()
            .position(|repository| repository.id() == id)
            .ok_or_else(|| DomainError::RepositoryNotFound(id.clone()))
    }

    fn find_mut(&mut self, id: &RepositoryId) -> Result<&mut Repository, DomainError> {
        let index = self.position(id)?;
        Ok(&mut self.repositories[index])
    }
}
