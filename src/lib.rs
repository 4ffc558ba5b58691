//! # syncstore
//!
//! Keeps an application's centrally-held state in sync with an external
//! persistent key-value store, and keeps multiple execution contexts sharing
//! that store consistent with each other.
//!
//! The crate provides three cooperating pieces, produced together by the
//! [`adapter::StorageAdapter`] factory:
//!
//! - **Middleware**: a dispatch-time interception layer performing
//!   asynchronous I/O against a pluggable [`backend::StorageBackend`],
//!   including the deduplicated one-time prepare read
//! - **Reducer**: a pure projection of the mapping-shaped state from the
//!   action stream, independent of storage and events
//! - **Change-event bridge**: replays out-of-process mutations of the same
//!   store as local actions tagged `from_event`, which prevents echo loops
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use syncstore::adapter::{AdapterOptions, Dispatch, Next, StorageAdapter};
//! use syncstore::backend::MemoryStorage;
//! use syncstore::Action;
//! use futures::FutureExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> syncstore::Result<()> {
//! let backend = Arc::new(MemoryStorage::new());
//! let adapter = StorageAdapter::new(backend, AdapterOptions::namespaced("app"));
//!
//! // the host supplies dispatch and next; here both are trivial
//! let dispatch: Dispatch = Arc::new(|_action| {});
//! let next: Next = Arc::new(|action| async move { Ok(action) }.boxed());
//!
//! let prepared = adapter
//!     .middleware()
//!     .handle(Action::prepare(Some("app")), &dispatch, &next)
//!     .await?;
//! let state = adapter.reducer().reduce(None, &prepared);
//! assert_eq!(state, Some(Default::default()));
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result, StorageError, StorageResult};

// Core modules
pub mod action;
pub mod adapter;
pub mod backend;
pub mod error;
pub mod reducer;

pub use action::{Action, Payload, StorageMap};

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::action::{Action, Payload, StorageMap};
    pub use crate::adapter::{
        AdapterOptions, ChangeEvents, ChangeRecord, Dispatch, Next, StorageAdapter,
    };
    pub use crate::backend::{MemoryStorage, StorageBackend};
    pub use crate::error::{Error, Result, StorageError, StorageResult};
    pub use crate::reducer::StorageReducer;
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
