//! The storage adapter factory
//!
//! [`StorageAdapter::new`] binds a backend and options into the pair the
//! host plugs into its pipeline: the [`StorageMiddleware`] performing the
//! storage I/O and the pure [`StorageReducer`] projecting state from the
//! same action stream.

pub mod bridge;
pub mod middleware;

use std::sync::Arc;

pub use bridge::{ChangeEventBridge, ChangeEvents, ChangeHandler, ChangeRecord, Dispatch};
pub use middleware::{Next, StorageMiddleware};

use crate::backend::StorageBackend;
use crate::reducer::StorageReducer;

/// Options for constructing a [`StorageAdapter`]
#[derive(Default)]
pub struct AdapterOptions {
    /// Namespace for every action the adapter recognizes or emits
    pub namespace: Option<String>,
    /// Source of external change notifications; absence disables the
    /// change-event bridge
    pub change_events: Option<Arc<dyn ChangeEvents>>,
}

impl AdapterOptions {
    /// Options with a namespace and no change-event source
    pub fn namespaced(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            change_events: None,
        }
    }

    /// Attach a change-event source
    pub fn with_change_events(mut self, events: Arc<dyn ChangeEvents>) -> Self {
        self.change_events = Some(events);
        self
    }
}

/// A middleware/reducer pair bound to one storage backend
pub struct StorageAdapter {
    middleware: Arc<StorageMiddleware>,
    reducer: StorageReducer,
}

impl StorageAdapter {
    /// Bind a backend into an adapter
    pub fn new(backend: Arc<dyn StorageBackend>, options: AdapterOptions) -> Self {
        let reducer = StorageReducer::new(options.namespace.as_deref());
        let middleware = Arc::new(StorageMiddleware::new(
            backend,
            options.namespace,
            options.change_events,
        ));
        Self {
            middleware,
            reducer,
        }
    }

    /// The dispatch-time interception layer
    pub fn middleware(&self) -> &Arc<StorageMiddleware> {
        &self.middleware
    }

    /// The pure state projection
    pub fn reducer(&self) -> &StorageReducer {
        &self.reducer
    }

    /// Split the adapter into its middleware and reducer
    pub fn into_parts(self) -> (Arc<StorageMiddleware>, StorageReducer) {
        (self.middleware, self.reducer)
    }
}
