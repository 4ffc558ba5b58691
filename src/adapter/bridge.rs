//! Bridge from external change notifications to local actions
//!
//! When another execution context mutates the same backing store, the host's
//! change-event source raises a [`ChangeRecord`]. The bridge filters records
//! to the bound backend and replays them as `STORAGE_SET_ITEM` /
//! `STORAGE_REMOVE_ITEM` actions tagged `from_event: true`, which is what
//! stops the middleware from echoing the mutation back into storage.

use std::sync::Arc;

use tracing::debug;

use crate::action::Action;
use crate::backend::StorageBackend;

/// Function through which the bridge re-enters the host's pipeline
pub type Dispatch = Arc<dyn Fn(Action) + Send + Sync>;

/// Handler invoked by a change-event source with each change record
pub type ChangeHandler = Box<dyn Fn(ChangeRecord) + Send + Sync>;

/// A source of change notifications for out-of-process store mutations
pub trait ChangeEvents: Send + Sync {
    /// Register a handler to be invoked with every change record
    fn subscribe(&self, handler: ChangeHandler);
}

/// A single mutation observed on some storage instance
#[derive(Clone)]
pub struct ChangeRecord {
    /// The mutated key
    pub key: String,
    /// The new value; `None` means the key was deleted
    pub new_value: Option<String>,
    /// The storage instance that changed
    pub storage_area: Arc<dyn StorageBackend>,
}

/// Translates filtered change records into dispatched local actions
pub struct ChangeEventBridge {
    backend: Arc<dyn StorageBackend>,
    namespace: Option<String>,
    dispatch: Dispatch,
}

impl ChangeEventBridge {
    /// Create a bridge bound to a backend and namespace
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        namespace: Option<String>,
        dispatch: Dispatch,
    ) -> Self {
        Self {
            backend,
            namespace,
            dispatch,
        }
    }

    /// Subscribe the bridge to a change-event source
    pub fn install(self, events: &dyn ChangeEvents) {
        events.subscribe(Box::new(move |record| self.on_change(record)));
    }

    /// Records for other storage instances are ignored entirely; matching
    /// ones re-enter the pipeline through the host dispatch.
    fn on_change(&self, record: ChangeRecord) {
        if !Arc::ptr_eq(&record.storage_area, &self.backend) {
            return;
        }

        debug!(key = %record.key, removed = record.new_value.is_none(), "replaying external change");

        let namespace = self.namespace.as_deref();
        let action = match record.new_value {
            None => Action::remove_item(namespace, record.key),
            Some(value) => Action::set_item(namespace, record.key, value),
        };

        (self.dispatch)(action.from_event());
    }
}
