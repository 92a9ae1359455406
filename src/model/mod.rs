//! The data model: movies, performers, and the library that owns them.
//!
//! Everything the rest of the system knows about the collection lives
//! here. The [`Library`] holds the two id-sorted collections and the
//! movie↔performer association table; [`Movie`] and [`Performer`] are
//! plain serializable records; [`ImageRef`] derives where a record's
//! image assets live. The storage layer (see [`crate::storage`])
//! persists the model but owns none of it.

mod id;
mod image;
mod library;
mod movie;
mod performer;

pub use id::{find_free_id, MovieId, PerformerId, RecordKind};
pub use image::{ImageRef, ImageSize};
pub use library::Library;
pub use movie::{Movie, MovieRelease};
pub use performer::Performer;
