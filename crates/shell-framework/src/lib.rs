//! # Shell Framework
//!
//! This crate provides the domain-free building blocks of a composition shell: an application
//! that assembles a page from independently deployed UI modules ("remotes") and coordinates the
//! state and notifications they share.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers, leaf first:
//!
//! 1. **State Layer** ([`StoreActor`] / [`StoreClient`]) - the single source of truth, with
//!    equality-gated writes and change notification
//! 2. **Action Layer** ([`ActionLayer`]) - sequences a [`DataSource`] call and the store writes
//!    around it, including loading and error bookkeeping
//! 3. **Messaging Layer** ([`EventBus`]) - typed publish/subscribe so modules never reference
//!    each other
//! 4. **Composition Layer** ([`ModuleRegistry`]) - lazily resolved, memoized remote modules
//!
//! The shell application wires these together once at boot and hands the result to every view.
//!
//! ## Core Abstractions
//!
//! ### [`StoreEntity`] - The Record Contract
//!
//! ```rust
//! use shell_framework::{StoreActor, StoreEntity};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! impl StoreEntity for User {
//!     type Id = u32;
//!     type Create = String;
//!     type Update = String;
//!
//!     fn id(&self) -> u32 {
//!         self.id
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, store) = StoreActor::<User>::new(16);
//!     tokio::spawn(actor.run());
//!
//!     let alice = User { id: 1, name: "Alice".into() };
//!     assert!(store.upsert_entity(alice.clone()).await.unwrap());
//!     // Writing the same value again changes nothing.
//!     assert!(!store.upsert_entity(alice).await.unwrap());
//!     assert_eq!(store.snapshot().version, 1);
//! }
//! ```
//!
//! ### [`EventBus`] - Typed Messaging
//!
//! Events are an enum, and each variant maps to a fieldless topic. Handlers run synchronously,
//! in subscription order; see the [`bus`] module for the dispatch rules.
//!
//! ## Concurrency Model
//!
//! - The store runs in its own Tokio task and applies writes one at a time (no locks on state)
//! - Actions run concurrently; loading and error state are tracked per [`ActionKind`] and per
//!   request, so overlapping actions never clobber each other's flags
//! - Module loads for the same name coalesce into a single manifest fetch
//!
//! ## Testing
//!
//! The [`mock`] module provides a scripted [`MockDataSource`](mock::MockDataSource) for driving
//! the action layer deterministically, and [`StaticLoader`] serves manifests from memory.

pub mod action;
pub mod bus;
pub mod client;
pub mod entity;
pub mod error;
pub mod loader;
pub mod message;
pub mod mock;
pub mod registry;
pub mod source;
pub mod state;
pub mod store;

// Re-export core types for convenience
pub use action::ActionLayer;
pub use bus::{BusEvent, EventBus, SubscriptionId};
pub use client::StoreClient;
pub use entity::StoreEntity;
pub use error::FrameworkError;
pub use loader::{HttpManifestLoader, StaticLoader};
pub use message::{Response, StoreRequest};
pub use registry::{ModuleLoader, ModuleRegistration, ModuleRegistry, RemoteManifest, RemoteModule};
pub use source::{DataSource, SourceError};
pub use state::{ActionKind, Activity, RequestId, StoreState};
pub use store::StoreActor;
