//! # Mutation-Safe Store
//!
//! This module defines the `StoreActor`, the single owner of the shared [`StoreState`]. It
//! implements the "Server" side of the Actor Model: writes arrive as messages, are applied one
//! at a time, and are compared with the current value before anything changes.
//!
//! ## Equality-gated writes
//!
//! A write whose value equals the current one is a no-op: the state is left untouched, the
//! `version` is not bumped and watchers are not woken. Only a write that actually changed the
//! state publishes a fresh snapshot. Views can therefore re-render on every notification
//! without filtering spurious ones themselves.

use crate::client::StoreClient;
use crate::entity::StoreEntity;
use crate::error::FrameworkError;
use crate::message::StoreRequest;
use crate::state::{ActionKind, RequestId, StoreState};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// The actor that owns the shared state.
///
/// # Architecture Note
/// This struct is the "Server" half of the store. It owns the state and the receiver end of
/// the channel, and processes its messages *sequentially* in a loop. No `Mutex` guards the
/// state: two writes can never interleave their read-modify-write because only this task
/// touches it.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `StoreActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Run**: Spawn the actor's run loop in a background task.
/// 3.  **Share**: Clone the client into every component that reads or writes state.
///
/// The loop exits once every client has been dropped.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    state: StoreState<T>,
    publisher: watch::Sender<Arc<StoreState<T>>>,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates a new `StoreActor` with empty state and its associated `StoreClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let state = StoreState::default();
        let (publisher, watcher) = watch::channel(Arc::new(state.clone()));
        let actor = Self {
            receiver,
            state,
            publisher,
        };
        let client = StoreClient::new(sender, watcher);
        (actor, client)
    }

    /// Runs the store's event loop, processing writes until the channel closes.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "User" instead of "shell_app::model::user::User")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::SetEntities {
                    entities,
                    respond_to,
                } => {
                    debug!(entity_type, count = entities.len(), "SetEntities");
                    let result = self.set_entities(entities);
                    self.reply(entity_type, "SetEntities", result, respond_to);
                }
                StoreRequest::SetSelected {
                    selected,
                    respond_to,
                } => {
                    debug!(entity_type, ?selected, "SetSelected");
                    let result = self.set_selected(selected);
                    self.reply(entity_type, "SetSelected", result, respond_to);
                }
                StoreRequest::Upsert { entity, respond_to } => {
                    debug!(entity_type, id = %entity.id(), "Upsert");
                    let result = Ok(self.upsert(entity));
                    self.reply(entity_type, "Upsert", result, respond_to);
                }
                StoreRequest::Replace { entity, respond_to } => {
                    debug!(entity_type, id = %entity.id(), "Replace");
                    let result = Ok(self.replace(entity));
                    self.reply(entity_type, "Replace", result, respond_to);
                }
                StoreRequest::Remove { id, respond_to } => {
                    debug!(entity_type, %id, "Remove");
                    let result = Ok(self.remove(&id));
                    self.reply(entity_type, "Remove", result, respond_to);
                }
                StoreRequest::SetLoading {
                    kind,
                    request,
                    loading,
                    respond_to,
                } => {
                    debug!(entity_type, %kind, %request, loading, "SetLoading");
                    let result = Ok(self.set_loading(kind, request, loading));
                    self.reply(entity_type, "SetLoading", result, respond_to);
                }
                StoreRequest::SetError {
                    kind,
                    error,
                    respond_to,
                } => {
                    debug!(entity_type, %kind, ?error, "SetError");
                    let result = Ok(self.set_error(kind, error));
                    self.reply(entity_type, "SetError", result, respond_to);
                }
            }
        }

        info!(
            entity_type,
            size = self.state.entities.len(),
            version = self.state.version,
            "Shutdown"
        );
    }

    /// Publishes a new snapshot when the write changed something, then answers the caller.
    ///
    /// Publishing happens before the reply so a caller that awaited the write always observes
    /// its effect in the next snapshot it reads.
    fn reply(
        &mut self,
        entity_type: &str,
        op: &str,
        result: Result<bool, FrameworkError>,
        respond_to: crate::message::Response<bool>,
    ) {
        match &result {
            Ok(true) => {
                self.state.version += 1;
                self.publisher.send_replace(Arc::new(self.state.clone()));
                info!(entity_type, op, version = self.state.version, "Changed");
            }
            Ok(false) => debug!(entity_type, op, "Unchanged"),
            Err(e) => warn!(entity_type, op, error = %e, "Rejected"),
        }
        let _ = respond_to.send(result);
    }

    fn set_entities(&mut self, entities: Vec<T>) -> Result<bool, FrameworkError> {
        let mut seen = HashSet::with_capacity(entities.len());
        for entity in &entities {
            let id = entity.id();
            if !seen.insert(id.clone()) {
                return Err(FrameworkError::DuplicateId(id.to_string()));
            }
        }
        if self.state.entities == entities {
            return Ok(false);
        }
        if let Some(selected) = self.state.selected_id() {
            if !seen.contains(&selected) {
                self.state.selected = None;
            }
        }
        self.state.entities = entities;
        Ok(true)
    }

    fn set_selected(&mut self, selected: Option<T>) -> Result<bool, FrameworkError> {
        if let Some(entity) = &selected {
            let id = entity.id();
            if self.state.position(&id).is_none() {
                return Err(FrameworkError::NotFound(id.to_string()));
            }
        }
        if self.state.selected == selected {
            return Ok(false);
        }
        self.state.selected = selected;
        Ok(true)
    }

    fn upsert(&mut self, entity: T) -> bool {
        match self.state.position(&entity.id()) {
            Some(index) if self.state.entities[index] == entity => false,
            Some(index) => {
                self.state.entities[index] = entity;
                true
            }
            None => {
                self.state.entities.push(entity);
                true
            }
        }
    }

    fn replace(&mut self, entity: T) -> bool {
        let id = entity.id();
        let Some(index) = self.state.position(&id) else {
            return false;
        };
        let mut changed = false;
        if self.state.selected_id().as_ref() == Some(&id)
            && self.state.selected.as_ref() != Some(&entity)
        {
            self.state.selected = Some(entity.clone());
            changed = true;
        }
        if self.state.entities[index] != entity {
            self.state.entities[index] = entity;
            changed = true;
        }
        changed
    }

    fn remove(&mut self, id: &T::Id) -> bool {
        let Some(index) = self.state.position(id) else {
            return false;
        };
        self.state.entities.remove(index);
        if self.state.selected_id().as_ref() == Some(id) {
            self.state.selected = None;
        }
        true
    }

    fn set_loading(&mut self, kind: ActionKind, request: RequestId, loading: bool) -> bool {
        if loading {
            self.state
                .activity
                .entry(kind)
                .or_default()
                .in_flight
                .insert(request)
        } else {
            self.state
                .activity
                .get_mut(&kind)
                .is_some_and(|activity| activity.in_flight.remove(&request))
        }
    }

    fn set_error(&mut self, kind: ActionKind, error: Option<String>) -> bool {
        if self.state.error(kind) == error.as_deref() {
            return false;
        }
        self.state.activity.entry(kind).or_default().error = error;
        true
    }
}
