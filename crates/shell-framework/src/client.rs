//! # Store Client
//!
//! This module defines the handle every component uses to read and write the shared store.

use crate::entity::StoreEntity;
use crate::error::FrameworkError;
use crate::message::StoreRequest;
use crate::state::{ActionKind, RequestId, StoreState};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};

/// ## StoreClient
///
/// The `StoreClient<T>` provides a type‑safe API over a running
/// [`StoreActor`](crate::store::StoreActor). Writes are forwarded over a Tokio mpsc channel and
/// answered via oneshot channels; reads come straight from the latest published snapshot,
/// without a round trip.
///
/// * **Cloneable** – holds only a sender and a watch receiver, so cloning is inexpensive.
/// * **Async writes** – every write resolves to `Ok(changed)`, where `changed == false` means the
///   value was already current and nothing was published.
/// * **Sync reads** – [`snapshot`](Self::snapshot) and [`get`](Self::get) never wait on the
///   actor.
#[derive(Clone)]
pub struct StoreClient<T: StoreEntity> {
    sender: mpsc::Sender<StoreRequest<T>>,
    state: watch::Receiver<Arc<StoreState<T>>>,
}

impl<T: StoreEntity> StoreClient<T> {
    pub fn new(
        sender: mpsc::Sender<StoreRequest<T>>,
        state: watch::Receiver<Arc<StoreState<T>>>,
    ) -> Self {
        Self { sender, state }
    }

    async fn request(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<bool, FrameworkError>>) -> StoreRequest<T>,
    ) -> Result<bool, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::StoreClosed)?;
        response.await.map_err(|_| FrameworkError::StoreDropped)?
    }

    pub async fn set_entities(&self, entities: Vec<T>) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::SetEntities {
            entities,
            respond_to,
        })
        .await
    }

    pub async fn set_selected(&self, selected: Option<T>) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::SetSelected {
            selected,
            respond_to,
        })
        .await
    }

    pub async fn upsert_entity(&self, entity: T) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::Upsert { entity, respond_to })
            .await
    }

    /// Replaces a stored entity in place; returns `false` for unknown ids.
    pub async fn replace_entity(&self, entity: T) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::Replace { entity, respond_to })
            .await
    }

    pub async fn remove_entity(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::Remove { id, respond_to })
            .await
    }

    pub async fn set_loading(
        &self,
        kind: ActionKind,
        request: RequestId,
        loading: bool,
    ) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::SetLoading {
            kind,
            request,
            loading,
            respond_to,
        })
        .await
    }

    pub async fn set_error(
        &self,
        kind: ActionKind,
        error: Option<String>,
    ) -> Result<bool, FrameworkError> {
        self.request(|respond_to| StoreRequest::SetError {
            kind,
            error,
            respond_to,
        })
        .await
    }

    /// The most recently published state.
    pub fn snapshot(&self) -> Arc<StoreState<T>> {
        self.state.borrow().clone()
    }

    /// A receiver that wakes only when a write changed the state.
    pub fn subscribe(&self) -> watch::Receiver<Arc<StoreState<T>>> {
        self.state.clone()
    }

    pub fn get(&self, id: &T::Id) -> Option<T> {
        self.state.borrow().find(id).cloned()
    }
}
