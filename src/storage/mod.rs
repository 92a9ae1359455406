//! storage layer for reeldb
//!
//! this module keeps the in-memory library durable across process
//! restarts, using plain files under one storage root. The presentation
//! layers use the [`Store`] API and never touch the filesystem directly.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Store                              │
//! │   (root binding, load ordering, save/delete coordination)   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!  ┌─────────────┐       ┌─────────────┐       ┌─────────────┐
//!  │ RecordStore │       │ RecordStore │       │ Association │
//!  │  (movies)   │       │ (performers)│       │    Store    │
//!  └─────────────┘       └─────────────┘       └─────────────┘
//! ```
//!
//! # Layout on disk
//!
//! ```text
//! <root>/
//! ├── movies/movie_<id>.json
//! ├── performers/performer_<id>.json
//! ├── associations/movie-performer.json
//! └── images/<size>/<kind>_<id>.png
//! ```
//!
//! Everything under the root is best-effort: a file that cannot be
//! written is logged and abandoned, a file that cannot be read is
//! skipped. Only [`Store::open`] fails loudly.

mod association;
mod error;
mod record;
mod store;

// Re-export public API
pub use association::AssociationStore;
pub use error::{StorageError, StorageResult};
pub use record::{Record, RecordStore};
pub use store::Store;
