//! Storage backends and capability detection
//!
//! The adapter treats the backing store as an opaque [`StorageBackend`]
//! exposing one of two read capability shapes; see [`capability`] for the
//! traits and the detection logic, and [`MemoryStorage`] for a ready-made
//! in-memory backend.

pub mod capability;
pub mod memory;

pub use capability::{detect, read_all, BulkRead, IndexedRead, StorageBackend, StorageShape};
pub use memory::MemoryStorage;
