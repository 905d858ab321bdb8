// Module declarations
pub mod persistence;

// Re-export the store implementation
pub use persistence::InMemoryRepositoryStore;
