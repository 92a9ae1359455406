//! reeldb - A Flat-File Movie Collection Database
//!
//! This crate manages a local collection of movies and performers,
//! linked many-to-many, persisted as one JSON file per record plus one
//! relation file. The in-memory [`Library`](model::Library) is the
//! source of truth; the [`Store`](storage::Store) keeps it durable
//! across restarts and tolerant of missing or malformed files.
//!
//! # Example
//!
//! ```no_run
//! use reeldb::model::{Movie, MovieId, Performer, PerformerId};
//! use reeldb::storage::Store;
//!
//! let store = Store::open("./collection").unwrap();
//! store.save_movie(Movie::new(MovieId(0), "Alpha"));
//! store.save_performer(Performer::new(PerformerId(0), "Beta"));
//! store.link(MovieId(0), PerformerId(0));
//! ```

pub mod model;
pub mod storage;
