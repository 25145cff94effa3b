//! # Users
//!
//! The user resource: the mock backend, its errors, and the factory that starts the shared user
//! store and the action layer in front of it.
//!
//! ## Usage
//!
//! ```rust
//! use shell_app::users::{self, Latency, MockUserApi};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (store, actions) = users::new(32, Arc::new(MockUserApi::seeded(Latency::NONE)));
//!     tokio::spawn(store.run());
//!
//!     actions.fetch_all().await?;
//!     assert_eq!(actions.store().snapshot().entities.len(), 5);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod error;

pub use api::*;
pub use error::*;

use crate::model::User;
use shell_framework::{ActionLayer, DataSource, StoreActor};
use std::sync::Arc;

/// The action layer specialised to users.
pub type UserActions = ActionLayer<User>;

/// Creates the user store and the action layer bound to `source`.
///
/// The returned actor must be spawned before any action runs.
pub fn new(
    buffer_size: usize,
    source: Arc<dyn DataSource<User>>,
) -> (StoreActor<User>, UserActions) {
    let (actor, store) = StoreActor::new(buffer_size);
    let actions = ActionLayer::new(store, source);
    (actor, actions)
}
