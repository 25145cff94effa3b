//! # StoreEntity Trait
//!
//! The `StoreEntity` trait defines the contract every domain record (a user, ...) must satisfy to
//! live in the shared [`Store`](crate::store::StoreActor) and flow through the
//! [`ActionLayer`](crate::action::ActionLayer). It specifies associated types for the id and the
//! create/update DTOs a [`DataSource`](crate::source::DataSource) accepts.
//!
//! # Architecture Note
//! The store, the action layer and the data-source contract are written *once* against this
//! trait. The shell application plugs its own record type in, and the compiler guarantees that a
//! `UserCreate` payload can only ever reach a user data source.
//!
//! # Equality
//! `PartialEq` is the store's change detector. Every guarded write compares the incoming value
//! with the current one field by field and skips the write when they are equal, so derive it
//! rather than implementing a looser notion of equality.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record must implement to be managed by the store.
pub trait StoreEntity: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// The unique identifier, assigned by the data source.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The data required to create a new record (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug + 'static;

    /// The partial data applied to an existing record.
    type Update: Send + Sync + Debug + 'static;

    /// Returns this record's identifier.
    fn id(&self) -> Self::Id;
}
