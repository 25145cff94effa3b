//! # Event Bus
//!
//! An in-process publish/subscribe hub. It is the only channel through which independently
//! loaded modules talk to the shell and, through it, to each other: producers publish an event,
//! consumers subscribe to its topic, and neither ever holds a reference to the other.
//!
//! ## Dispatch rules
//!
//! - Handlers run synchronously inside [`EventBus::publish`], in subscription order, and all of
//!   them see the same `&E`.
//! - Handlers that need async work spawn it. The bus never awaits anything.
//! - Events are not buffered. Publishing a topic nobody listens to is a silent no-op.
//! - The subscriber list is copied before dispatch, so a handler may publish, subscribe or
//!   unsubscribe without deadlocking. Changes take effect from the next publish.
//!
//! ## Topics
//!
//! The vocabulary is closed and checked by the compiler: an event type is an enum and its
//! [`BusEvent::Topic`] is a fieldless enum naming each variant.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, trace};

/// An event that can travel over an [`EventBus`].
pub trait BusEvent: Debug + Send + Sync + 'static {
    /// The fieldless topic enum of this vocabulary.
    type Topic: Copy + Eq + Hash + Debug + Display + Send + Sync + 'static;

    fn topic(&self) -> Self::Topic;
}

/// A registered event handler.
pub type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Returned by [`EventBus::subscribe`]; pass it to [`EventBus::unsubscribe`] to stop listening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscribers<E: BusEvent> {
    next_id: u64,
    by_topic: HashMap<E::Topic, Vec<(SubscriptionId, Handler<E>)>>,
}

/// Cloneable handle to a shared subscriber table.
pub struct EventBus<E: BusEvent> {
    inner: Arc<RwLock<Subscribers<E>>>,
}

impl<E: BusEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E: BusEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BusEvent> EventBus<E> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Subscribers {
                next_id: 1,
                by_topic: HashMap::new(),
            })),
        }
    }

    /// Registers `handler` for every future event on `topic`.
    pub fn subscribe(
        &self,
        topic: E::Topic,
        handler: impl Fn(&E) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let mut subscribers = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers
            .by_topic
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        debug!(%topic, ?id, "Subscribed");
        id
    }

    /// Removes a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        for handlers in subscribers.by_topic.values_mut() {
            if let Some(index) = handlers.iter().position(|(sub, _)| *sub == id) {
                handlers.remove(index);
                debug!(?id, "Unsubscribed");
                return true;
            }
        }
        false
    }

    /// Delivers `event` to every handler currently subscribed to its topic.
    ///
    /// Returns the number of handlers invoked.
    pub fn publish(&self, event: E) -> usize {
        let topic = event.topic();
        let handlers: Vec<Handler<E>> = {
            let subscribers = self.inner.read().unwrap_or_else(PoisonError::into_inner);
            match subscribers.by_topic.get(&topic) {
                Some(list) => list.iter().map(|(_, h)| Arc::clone(h)).collect(),
                None => Vec::new(),
            }
        };

        if handlers.is_empty() {
            trace!(%topic, "No subscribers, dropped");
            return 0;
        }

        debug!(%topic, handlers = handlers.len(), "Publish");
        for handler in &handlers {
            handler(&event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, topic: E::Topic) -> usize {
        let subscribers = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        subscribers.by_topic.get(&topic).map_or(0, Vec::len)
    }
}
