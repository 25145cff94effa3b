//! # Action Layer
//!
//! Sequences one logical operation against the [`DataSource`] and keeps the store consistent
//! before, during and after it.
//!
//! Every action follows the same bracket:
//!
//! 1. mark a fresh request of its [`ActionKind`] as in flight and clear that kind's error;
//! 2. call the data source;
//! 3. on success, apply the matching store write and hand the value back;
//! 4. on failure, record the message as that kind's error and hand the failure back;
//! 5. in both cases, mark the request as finished.
//!
//! Nothing is retried. Callers decide what a failure means for them; the shell's event-bus
//! listeners turn it into a notification.

use crate::client::StoreClient;
use crate::entity::StoreEntity;
use crate::error::FrameworkError;
use crate::source::DataSource;
use crate::state::{ActionKind, RequestId};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Orchestrates a data source and the store it feeds.
///
/// Cheap to clone: every clone shares the same store, source and request-id counter.
#[derive(Clone)]
pub struct ActionLayer<T: StoreEntity> {
    store: StoreClient<T>,
    source: Arc<dyn DataSource<T>>,
    next_request: Arc<AtomicU64>,
}

impl<T: StoreEntity> ActionLayer<T> {
    pub fn new(store: StoreClient<T>, source: Arc<dyn DataSource<T>>) -> Self {
        Self {
            store,
            source,
            next_request: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn store(&self) -> &StoreClient<T> {
        &self.store
    }

    /// Replaces the store's collection with the source's.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<T>, FrameworkError> {
        self.bracket(ActionKind::Fetch, async {
            let entities = self
                .source
                .fetch_all()
                .await
                .map_err(FrameworkError::DataSource)?;
            self.store.set_entities(entities.clone()).await?;
            info!(count = entities.len(), "Fetched");
            Ok(entities)
        })
        .await
    }

    /// Updates one record and refreshes the selection if it points at that record.
    ///
    /// A record removed from the store while the call was in flight stays removed.
    #[instrument(skip(self))]
    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.bracket(ActionKind::Update, async {
            let updated = self
                .source
                .update(id.clone(), update)
                .await
                .map_err(FrameworkError::DataSource)?;
            self.store.replace_entity(updated.clone()).await?;
            info!(%id, "Updated");
            Ok(updated)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn create(&self, params: T::Create) -> Result<T, FrameworkError> {
        self.bracket(ActionKind::Create, async {
            let created = self
                .source
                .create(params)
                .await
                .map_err(FrameworkError::DataSource)?;
            self.store.upsert_entity(created.clone()).await?;
            info!(id = %created.id(), "Created");
            Ok(created)
        })
        .await
    }

    /// Deletes one record. The store clears the selection when it pointed at that record.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.bracket(ActionKind::Delete, async {
            let deleted = self
                .source
                .delete(id.clone())
                .await
                .map_err(FrameworkError::DataSource)?;
            self.store.remove_entity(id.clone()).await?;
            info!(%id, "Deleted");
            Ok(deleted)
        })
        .await
    }

    async fn bracket<R>(
        &self,
        kind: ActionKind,
        action: impl Future<Output = Result<R, FrameworkError>>,
    ) -> Result<R, FrameworkError> {
        let request = RequestId(self.next_request.fetch_add(1, Ordering::SeqCst));
        debug!(%kind, %request, "Action started");
        self.store.set_loading(kind, request, true).await?;
        self.store.set_error(kind, None).await?;

        let result = action.await;

        let recorded = match &result {
            Err(e) => {
                warn!(%kind, %request, error = %e, "Action failed");
                self.store.set_error(kind, Some(e.to_string())).await
            }
            Ok(_) => Ok(false),
        };
        // Runs on both paths; the request must never stay in flight.
        let finished = self.store.set_loading(kind, request, false).await;
        debug!(%kind, %request, "Action finished");

        let value = result?;
        recorded?;
        finished?;
        Ok(value)
    }
}
