//! kind-scoped identifiers for model objects.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two record kinds managed by the library.
///
/// The kind decides where a record lives on disk (`movies/` vs
/// `performers/`) and the prefix of its file names (`movie_0.json`,
/// `performer_3.png`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Movie,
    Performer,
}

impl RecordKind {
    /// file name prefix, e.g. "movie" for `movie_0.json`
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Movie => "movie",
            RecordKind::Performer => "performer",
        }
    }

    /// directory a kind's records are stored in, e.g. "movies"
    pub fn dir_name(self) -> &'static str {
        match self {
            RecordKind::Movie => "movies",
            RecordKind::Performer => "performers",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Identifier of a movie.
///
/// Separate newtypes for movie and performer ids make sure we never pass
/// one kind's id where the other is expected. Ids are unique within their
/// kind, assigned at creation and never change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MovieId(pub u32);

impl MovieId {
    /// raw integer value (used for file names)
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a performer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PerformerId(pub u32);

impl PerformerId {
    /// raw integer value (used for file names)
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PerformerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the lowest id not currently in use.
///
/// `ids` must yield the identifiers in ascending order (the library's
/// collections iterate that way). Walks the sequence counting positions
/// and returns the first position whose stored id is larger than the
/// expected sequential value; with no gap, returns the count. Repeated
/// create/delete cycles therefore reuse freed slots instead of growing
/// ids monotonically.
pub fn find_free_id(ids: impl IntoIterator<Item = u32>) -> u32 {
    let mut next = 0;
    for id in ids {
        if id > next {
            return next;
        }
        next += 1;
    }
    next
}
