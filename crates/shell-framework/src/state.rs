//! # Store State
//!
//! The observable shape of the shared store: the entity collection, the current selection and
//! per-action activity. Snapshots of [`StoreState`] are what views read and what the store
//! broadcasts after every write that changed something.

use crate::entity::StoreEntity;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

/// The kind of operation the action layer runs against the data source.
///
/// Loading and error state are tracked per kind, so a slow fetch and a fast update never
/// overwrite each other's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionKind {
    Fetch,
    Update,
    Create,
    Delete,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ActionKind::Fetch => "fetch",
            ActionKind::Update => "update",
            ActionKind::Create => "create",
            ActionKind::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Identifies one in-flight action invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "req_{}", self.0)
    }
}

/// Loading and error state for one [`ActionKind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    /// Requests of this kind that have started and not yet completed.
    pub in_flight: BTreeSet<RequestId>,
    /// Message of the most recent failure, cleared when a new request of this kind starts.
    pub error: Option<String>,
}

impl Activity {
    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }
}

/// A snapshot of the shared store.
///
/// `version` starts at 0 and is bumped once per write that changed the state, so two snapshots
/// with the same version are guaranteed to be identical.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<T: StoreEntity> {
    pub entities: Vec<T>,
    pub selected: Option<T>,
    pub activity: BTreeMap<ActionKind, Activity>,
    pub version: u64,
}

impl<T: StoreEntity> Default for StoreState<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            selected: None,
            activity: BTreeMap::new(),
            version: 0,
        }
    }
}

impl<T: StoreEntity> StoreState<T> {
    /// True while any action of any kind is in flight.
    pub fn is_loading(&self) -> bool {
        self.activity.values().any(Activity::is_loading)
    }

    /// True while an action of `kind` is in flight.
    pub fn loading(&self, kind: ActionKind) -> bool {
        self.activity.get(&kind).is_some_and(Activity::is_loading)
    }

    /// The last failure recorded for `kind`, if any.
    pub fn error(&self, kind: ActionKind) -> Option<&str> {
        self.activity.get(&kind).and_then(|a| a.error.as_deref())
    }

    pub fn find(&self, id: &T::Id) -> Option<&T> {
        self.entities.iter().find(|e| e.id() == *id)
    }

    pub fn position(&self, id: &T::Id) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == *id)
    }

    pub fn selected_id(&self) -> Option<T::Id> {
        self.selected.as_ref().map(StoreEntity::id)
    }
}
