//! # Shell Lifecycle
//!
//! Boot, navigation and shutdown of the composing application.
//!
//! ## Boot
//!
//! [`Shell::boot`] builds everything in a fixed order and stops at the first failure:
//!
//! 1. the user store actor and the action layer in front of it;
//! 2. the event bus;
//! 3. the request listeners (`update-user-request`, `create-user-request`,
//!    `delete-user-request`, `fetch-users-request`);
//! 4. the translator;
//! 5. an initial fetch of all users, awaited;
//! 6. a check that every remote route names a registered module declaring its component;
//! 7. activation.
//!
//! Remote code is not touched during boot. A module's manifest is fetched the first time a
//! route needs it, and module-load failures come back from [`Shell::navigate`].
//!
//! ## Listeners
//!
//! Each request topic gets one listener. A listener spawns a task that runs the matching
//! action and then publishes the outcome event plus a translated success notification. Any
//! failure becomes an error notification carrying the failure message; nothing escapes the
//! bus dispatch.
//!
//! ## Shutdown
//!
//! 1. **Remove the listeners**: they hold bus and store handles, so the bus would otherwise
//!    keep the store alive.
//! 2. **Drop the clients**: the store actor's receiver returns `None`.
//! 3. **Await the store task**: a panicked task is reported as
//!    [`ShellError::TaskFailed`].
//!
//! Listener tasks still in flight hold their own store clients, so the store outlives them
//! and their writes are not lost.
//!
//! ## Tracing
//!
//! See [`setup_tracing`].

pub mod error;
pub mod shell;
pub mod tracing;

pub use error::*;
pub use shell::*;
pub use self::tracing::*;
