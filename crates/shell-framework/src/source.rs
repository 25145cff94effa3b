//! # DataSource Trait
//!
//! The boundary between the shell and whatever backend owns the records: a real HTTP API or the
//! in-memory mock the shell ships with. The action layer holds it as `Arc<dyn DataSource<T>>`,
//! so implementations can be swapped without touching any caller.
//!
//! All operations are asynchronous with unspecified latency. Failures are boxed errors whose
//! `Display` is the message the user eventually sees (e.g. `"User not found"`).

use crate::entity::StoreEntity;
use async_trait::async_trait;

/// Error type returned by data sources.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait DataSource<T: StoreEntity>: Send + Sync {
    /// Returns the full collection, in the source's order.
    async fn fetch_all(&self) -> Result<Vec<T>, SourceError>;

    /// Applies a partial update and returns the resulting record.
    /// Fails when no record has the given id.
    async fn update(&self, id: T::Id, update: T::Update) -> Result<T, SourceError>;

    /// Creates a record; the source assigns its id.
    async fn create(&self, params: T::Create) -> Result<T, SourceError>;

    /// Deletes a record. Fails when no record has the given id.
    async fn delete(&self, id: T::Id) -> Result<bool, SourceError>;
}
