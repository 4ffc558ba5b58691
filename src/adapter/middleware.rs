//! Dispatch-time interception layer performing storage I/O
//!
//! The middleware inspects every action flowing through the host's pipeline.
//! For the four recognized action types of its own namespace it performs the
//! associated storage side effect before forwarding; everything else passes
//! through untouched with no I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::debug;

use crate::action::{Action, Payload, StorageMap};
use crate::adapter::bridge::{ChangeEventBridge, ChangeEvents, Dispatch};
use crate::backend::{self, StorageBackend};
use crate::error::{Error, Result};

/// Function forwarding an action to the next stage of the pipeline
pub type Next = Arc<dyn Fn(Action) -> BoxFuture<'static, Result<Action>> + Send + Sync>;

/// The one-time prepare read, shared between every caller that triggers it
type PrepareFuture = Shared<BoxFuture<'static, Result<Action>>>;

/// The adapter's dispatch-time interception layer
///
/// One instance per adapter; holds the single piece of cross-call shared
/// state, the write-once prepare slot.
pub struct StorageMiddleware {
    backend: Arc<dyn StorageBackend>,
    namespace: Option<String>,
    events: Option<Arc<dyn ChangeEvents>>,
    pending_prepare: Mutex<Option<PrepareFuture>>,
    bridge_installed: AtomicBool,
}

impl StorageMiddleware {
    pub(crate) fn new(
        backend: Arc<dyn StorageBackend>,
        namespace: Option<String>,
        events: Option<Arc<dyn ChangeEvents>>,
    ) -> Self {
        Self {
            backend,
            namespace,
            events,
            pending_prepare: Mutex::new(None),
            bridge_installed: AtomicBool::new(false),
        }
    }

    /// The namespace this middleware is bound to
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Intercept one action
    ///
    /// Recognized actions trigger their storage side effect and are forwarded
    /// through `next` only after it settles successfully; a failed write
    /// surfaces as `Err` and the action is never forwarded. Actions of a
    /// foreign namespace, and [`Payload::Custom`], are forwarded unchanged
    /// with no I/O. `dispatch` is consumed only by the change-event bridge,
    /// installed on the first `STORAGE_PREPARE`.
    pub async fn handle(&self, action: Action, dispatch: &Dispatch, next: &Next) -> Result<Action> {
        if action.namespace.as_deref() != self.namespace.as_deref() {
            return next(action).await;
        }

        match &action.payload {
            Payload::Prepare { .. } => self.prepare(action, dispatch, next).await,

            Payload::SetItem {
                key,
                value,
                from_event,
            } => {
                if *from_event {
                    return next(action).await;
                }
                self.backend.set_item(key, value).await?;
                debug!(key = %key, "wrote item through to storage");
                next(action).await
            }

            Payload::RemoveItem { key, from_event } => {
                if *from_event {
                    return next(action).await;
                }
                self.backend.remove_item(key).await?;
                debug!(key = %key, "removed item from storage");
                next(action).await
            }

            // Clears never originate from the change-event channel, so the
            // write is unconditional.
            Payload::Clear => {
                self.backend.clear().await?;
                debug!("cleared storage");
                next(action).await
            }

            Payload::Custom { .. } => next(action).await,
        }
    }

    /// Run the one-time initialization read, deduplicating concurrent and
    /// repeated calls
    ///
    /// The slot is checked before any work; once it holds a future, every
    /// later `STORAGE_PREPARE` observes that future's outcome without
    /// re-reading storage or re-forwarding. The slot is never cleared. A
    /// backend with no supported capability shape fails here without filling
    /// the slot, so it fails every call the same way.
    async fn prepare(&self, action: Action, dispatch: &Dispatch, next: &Next) -> Result<Action> {
        let fut = {
            let mut slot = self.pending_prepare.lock().unwrap();
            match slot.as_ref() {
                Some(fut) => fut.clone(),
                None => {
                    self.install_bridge(dispatch);
                    backend::detect(self.backend.as_ref())?;

                    let backend = Arc::clone(&self.backend);
                    let next = Arc::clone(next);
                    let fut: PrepareFuture = async move {
                        let entries = backend::read_all(backend.as_ref())
                            .await
                            .map_err(Error::from)?;
                        // later pairs overwrite earlier ones on duplicate keys
                        let initial_values: StorageMap = entries.into_iter().collect();
                        debug!(entries = initial_values.len(), "prepared storage adapter");
                        next(action.with_initial_values(initial_values)).await
                    }
                    .boxed()
                    .shared();

                    slot.insert(fut).clone()
                }
            }
        };

        fut.await
    }

    /// Subscribe the change-event bridge, at most once per adapter instance
    /// and only when an event source was supplied
    fn install_bridge(&self, dispatch: &Dispatch) {
        let Some(events) = &self.events else {
            return;
        };
        if self.bridge_installed.swap(true, Ordering::SeqCst) {
            return;
        }

        let bridge = ChangeEventBridge::new(
            Arc::clone(&self.backend),
            self.namespace.clone(),
            Arc::clone(dispatch),
        );
        bridge.install(events.as_ref());
    }
}
