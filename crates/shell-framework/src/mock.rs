//! # Mock Data Source & Testing Guide
//!
//! `MockDataSource<T>` implements [`DataSource<T>`] entirely in memory from a queue of
//! expectations. It lets you script exactly what the backend answers, including failures that
//! are awkward to provoke from a real backend, and check that the action layer asked for what
//! you expected.
//!
//! ## When to use the mock vs the shell's own mock API
//!
//! | Feature | MockDataSource | Full shell |
//! |---------|----------------|------------|
//! | **Speed** | Instant | Fast (actor task + bus dispatch) |
//! | **Determinism** | 100% scripted | Subject to scheduler |
//! | **State** | None (expectations) | Real records |
//! | **Use Case** | Action-layer and store behaviour | End-to-end request/outcome flows |
//! | **Error Injection** | Easy (`return_err`) | Only "not found" |
//!
//! ## Example
//!
//! ```rust
//! use shell_framework::mock::MockDataSource;
//! use shell_framework::{ActionLayer, StoreActor, StoreEntity};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Note { id: u32, text: String }
//!
//! impl StoreEntity for Note {
//!     type Id = u32;
//!     type Create = String;
//!     type Update = String;
//!     fn id(&self) -> u32 { self.id }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = Arc::new(MockDataSource::<Note>::new());
//!     mock.expect_fetch_all().return_ok(vec![Note { id: 1, text: "hi".into() }]);
//!     mock.expect_delete(7).return_err("Note not found");
//!
//!     let (actor, store) = StoreActor::new(8);
//!     tokio::spawn(actor.run());
//!     let actions = ActionLayer::new(store.clone(), mock.clone());
//!
//!     actions.fetch_all().await.unwrap();
//!     let err = actions.delete(7).await.unwrap_err();
//!     assert_eq!(err.to_string(), "Note not found");
//!     assert_eq!(store.snapshot().entities.len(), 1);
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## Holding a call open
//!
//! [`MockDataSource::gate`] makes every call wait for a permit before answering. This is how the
//! tests observe the store *while* an action is in flight:
//!
//! ```rust,ignore
//! let gate = mock.gate();
//! let task = tokio::spawn(async move { actions.update(1, "x".into()).await });
//! // ... wait until the store reports loading, assert on it ...
//! gate.notify_one();
//! task.await??;
//! ```

use crate::entity::StoreEntity;
use crate::source::{DataSource, SourceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

/// Error returned by scripted failures and by unexpected calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call to the mock data source.
enum Expectation<T: StoreEntity> {
    FetchAll {
        response: Result<Vec<T>, MockError>,
    },
    Update {
        id: T::Id,
        response: Result<T, MockError>,
    },
    Create {
        response: Result<T, MockError>,
    },
    Delete {
        id: T::Id,
        response: Result<bool, MockError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A scripted data source with expectation tracking for fluent testing.
pub struct MockDataSource<T: StoreEntity> {
    expectations: Queue<T>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl<T: StoreEntity> Default for MockDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoreEntity> MockDataSource<T> {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            gate: Mutex::new(None),
        }
    }

    pub fn expect_fetch_all(&self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::FetchAll { response })
    }

    pub fn expect_update(&self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(move |response| Expectation::Update { id, response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_delete(&self, id: T::Id) -> ExpectationBuilder<T, bool> {
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Makes every subsequent call wait for one `notify_one()` on the returned handle before it
    /// answers.
    pub fn gate(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&notify));
        notify
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap_or_else(PoisonError::into_inner);
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn builder<R>(
        &self,
        make: impl FnOnce(Result<R, MockError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: Arc::clone(&self.expectations),
            make: Box::new(make),
        }
    }

    async fn next(&self) -> Option<Expectation<T>> {
        let gate = self
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<T: StoreEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, MockError>) -> Expectation<T> + Send>,
}

impl<T: StoreEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to fail with `message`.
    pub fn return_err(self, message: impl Into<String>) {
        self.push(Err(MockError(message.into())));
    }

    fn push(self, response: Result<R, MockError>) {
        let expectation = (self.make)(response);
        self.expectations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(expectation);
    }
}

fn unexpected(call: &str) -> SourceError {
    Box::new(MockError(format!("Unexpected call or expectation mismatch: {call}")))
}

#[async_trait]
impl<T: StoreEntity> DataSource<T> for MockDataSource<T> {
    async fn fetch_all(&self) -> Result<Vec<T>, SourceError> {
        match self.next().await {
            Some(Expectation::FetchAll { response }) => Ok(response?),
            _ => Err(unexpected("fetch_all")),
        }
    }

    async fn update(&self, id: T::Id, _update: T::Update) -> Result<T, SourceError> {
        match self.next().await {
            Some(Expectation::Update {
                id: expected,
                response,
            }) if expected == id => Ok(response?),
            _ => Err(unexpected("update")),
        }
    }

    async fn create(&self, _params: T::Create) -> Result<T, SourceError> {
        match self.next().await {
            Some(Expectation::Create { response }) => Ok(response?),
            _ => Err(unexpected("create")),
        }
    }

    async fn delete(&self, id: T::Id) -> Result<bool, SourceError> {
        match self.next().await {
            Some(Expectation::Delete {
                id: expected,
                response,
            }) if expected == id => Ok(response?),
            _ => Err(unexpected("delete")),
        }
    }
}
