//! # Store Messages
//!
//! This module defines the message types used for communication between the
//! [`StoreClient`](crate::client::StoreClient) and the [`StoreActor`](crate::store::StoreActor).

use crate::entity::StoreEntity;
use crate::error::FrameworkError;
use crate::state::{ActionKind, RequestId};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the store actor.
///
/// Every write variant answers with `bool`: `true` when the state changed (and observers were
/// notified), `false` when the write was a no-op because the value was already current.
#[derive(Debug)]
pub enum StoreRequest<T: StoreEntity> {
    SetEntities {
        entities: Vec<T>,
        respond_to: Response<bool>,
    },
    SetSelected {
        selected: Option<T>,
        respond_to: Response<bool>,
    },
    Upsert {
        entity: T,
        respond_to: Response<bool>,
    },
    /// Replaces an entity that is already stored, and the selection if it points at it.
    /// Unknown ids are left out.
    Replace {
        entity: T,
        respond_to: Response<bool>,
    },
    Remove {
        id: T::Id,
        respond_to: Response<bool>,
    },
    SetLoading {
        kind: ActionKind,
        request: RequestId,
        loading: bool,
        respond_to: Response<bool>,
    },
    SetError {
        kind: ActionKind,
        error: Option<String>,
        respond_to: Response<bool>,
    },
}
