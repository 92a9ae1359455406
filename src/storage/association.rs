//! Persistence of the movie↔performer relation.
//!
//! The whole relation lives in one file, `<root>/associations/
//! <name>.json`, as an array of id pairs:
//!
//! ```text
//! [
//!   { "first": 0, "second": 0 },
//!   { "first": 0, "second": 3 }
//! ]
//! ```
//!
//! `first` is always the left kind's id (movies), `second` the right
//! kind's (performers). Ids are resolved back to live records at load
//! time through caller-supplied lookups; the store itself knows nothing
//! about either kind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::storage::error::StorageResult;

/// one stored pair: left id, right id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct IdPair {
    first: u32,
    second: u32,
}

/// Stores one many-to-many relation as a single JSON file.
pub struct AssociationStore {
    directory: PathBuf,
    name: String,
}

impl AssociationStore {
    /// Create a store for the relation `name` under the given storage
    /// root. The file lands in `<root>/associations/<name>.json`.
    pub fn new(root: &Path, name: impl Into<String>) -> Self {
        Self {
            directory: root.join("associations"),
            name: name.into(),
        }
    }

    /// full path of the relation file
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.name))
    }

    /// Rewrite the relation file in full.
    ///
    /// An empty relation writes nothing and leaves any existing file
    /// untouched; an absent file already means "empty relation", so
    /// there is no separate empty state to record. Pairs that no longer
    /// resolve are dropped at the next load.
    pub fn save(&self, pairs: impl IntoIterator<Item = (u32, u32)>) -> StorageResult<()> {
        let records: Vec<IdPair> = pairs
            .into_iter()
            .map(|(first, second)| IdPair { first, second })
            .collect();
        if records.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(&self.directory)?;
        let bytes = serde_json::to_vec_pretty(&records)?;
        fs::write(self.file_path(), bytes)?;
        Ok(())
    }

    /// Load the relation, resolving each stored pair through the two
    /// lookups.
    ///
    /// An absent file is an empty relation. A file that fails to parse
    /// yields an empty relation for this load, logged at debug level;
    /// the file is left in place and will be overwritten by the next
    /// save. A pair whose left or right id does not resolve is dropped
    /// with a warning; the rest of the relation loads normally.
    pub fn load<L, R>(
        &self,
        resolve_left: impl Fn(u32) -> Option<L>,
        resolve_right: impl Fn(u32) -> Option<R>,
    ) -> Vec<(u32, u32)> {
        let path = self.file_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                debug!("could not read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let records: Vec<IdPair> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(e) => {
                debug!("could not parse {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter(|pair| {
                if resolve_left(pair.first).is_none() {
                    warn!(
                        "{}: no left record with id={}, dropping pair",
                        self.name, pair.first
                    );
                    return false;
                }
                if resolve_right(pair.second).is_none() {
                    warn!(
                        "{}: no right record with id={}, dropping pair",
                        self.name, pair.second
                    );
                    return false;
                }
                true
            })
            .map(|pair| (pair.first, pair.second))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, AssociationStore) {
        let dir = TempDir::new().unwrap();
        let store = AssociationStore::new(dir.path(), "movie-performer");
        (dir, store)
    }

    /// resolver accepting any id
    fn any(_: u32) -> Option<()> {
        Some(())
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = setup();
        store.save([(0, 0), (0, 3), (2, 0)]).unwrap();

        let mut pairs = store.load(any, any);
        pairs.sort();
        assert_eq!(pairs, vec![(0, 0), (0, 3), (2, 0)]);
    }

    #[test]
    fn test_absent_file_is_empty_relation() {
        let (_dir, store) = setup();
        assert!(store.load(any, any).is_empty());
    }

    #[test]
    fn test_empty_save_leaves_file_untouched() {
        let (_dir, store) = setup();
        store.save([(1, 1)]).unwrap();

        // saving an empty relation must not rewrite or delete the file
        store.save([]).unwrap();
        assert_eq!(store.load(any, any), vec![(1, 1)]);

        // and must not create one either
        let dir = TempDir::new().unwrap();
        let fresh = AssociationStore::new(dir.path(), "movie-performer");
        fresh.save([]).unwrap();
        assert!(!fresh.file_path().exists());
    }

    #[test]
    fn test_unresolved_pairs_are_dropped() {
        let (_dir, store) = setup();
        store.save([(0, 0), (7, 0), (0, 9)]).unwrap();

        let pairs = store.load(
            |id| (id != 7).then_some(()),
            |id| (id != 9).then_some(()),
        );
        assert_eq!(pairs, vec![(0, 0)]);
    }

    #[test]
    fn test_parse_failure_yields_empty_relation() {
        let (_dir, store) = setup();
        fs::create_dir_all(store.file_path().parent().unwrap()).unwrap();
        fs::write(store.file_path(), b"[ { broken").unwrap();

        assert!(store.load(any, any).is_empty());
    }

    #[test]
    fn test_file_format() {
        let (_dir, store) = setup();
        store.save([(4, 2)]).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(store.file_path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!([{"first": 4, "second": 2}]));
    }
}
