//! Per-record persistence: one JSON file per movie or performer.
//!
//! A [`RecordStore`] owns one kind's directory (`<root>/movies/` or
//! `<root>/performers/`) and turns records into files and back. It holds
//! no data itself: the library stays authoritative, and a store is a pure
//! load/save transformer over its directory.
//!
//! The on-disk format is the record's fields plus a `kind` discriminator,
//! so a file always identifies its concrete kind:
//!
//! ```text
//! {
//!   "kind": "movie",
//!   "id": 0,
//!   "title": "Alpha",
//!   ...
//! }
//! ```

use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{Movie, Performer, RecordKind};
use crate::storage::error::{StorageError, StorageResult};

/// A record that can be stored in per-kind JSON files.
pub trait Record: Serialize + DeserializeOwned {
    /// the kind deciding directory and file name prefix
    const KIND: RecordKind;

    /// raw id, unique within the kind
    fn raw_id(&self) -> u32;
}

impl Record for Movie {
    const KIND: RecordKind = RecordKind::Movie;

    fn raw_id(&self) -> u32 {
        self.id.raw()
    }
}

impl Record for Performer {
    const KIND: RecordKind = RecordKind::Performer;

    fn raw_id(&self) -> u32 {
        self.id.raw()
    }
}

/// on-disk envelope for writing: discriminator first, then the fields
#[derive(Serialize)]
struct RecordJsonRef<'a, T: Serialize> {
    kind: RecordKind,
    #[serde(flatten)]
    record: &'a T,
}

/// on-disk envelope for reading
#[derive(Deserialize)]
struct RecordJson<T> {
    kind: RecordKind,
    #[serde(flatten)]
    record: T,
}

/// Stores one kind of record, one file per record, named by kind and id.
pub struct RecordStore<T: Record> {
    directory: PathBuf,
    _kind: PhantomData<T>,
}

impl<T: Record> RecordStore<T> {
    /// Create a store for `T` under the given storage root. The directory
    /// is only created once something is saved.
    pub fn new(root: &Path) -> Self {
        Self {
            directory: root.join(T::KIND.dir_name()),
            _kind: PhantomData,
        }
    }

    /// directory this store reads and writes, e.g. `<root>/movies`
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// full path of one record's file, e.g. `<root>/movies/movie_0.json`
    pub fn file_path(&self, id: u32) -> PathBuf {
        self.directory
            .join(format!("{}_{}.json", T::KIND.prefix(), id))
    }

    /// Write a record's full state to its file, overwriting any previous
    /// version. There is no separate update operation: saving again is
    /// the update. The in-memory model is not touched.
    pub fn save(&self, record: &T) -> StorageResult<()> {
        fs::create_dir_all(&self.directory)?;
        let envelope = RecordJsonRef {
            kind: T::KIND,
            record,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(self.file_path(record.raw_id()), bytes)?;
        Ok(())
    }

    /// Scan the directory once and parse every matching file.
    ///
    /// A file that fails to parse, or whose content disagrees with its
    /// name, is logged and skipped; the result is partial but valid. A
    /// missing directory yields an empty result. Records are returned in
    /// ascending id order.
    pub fn load_all(&self) -> Vec<T> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        let mut records = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            let Some(id) = Self::id_from_file_name(&path) else {
                continue;
            };
            match self.load_file(&path, id) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
        records.sort_by_key(|record| record.raw_id());
        records
    }

    /// Delete a record's file. A missing file is tolerated; the file may
    /// never have been saved, or was deleted externally. Associations are
    /// not touched here.
    pub fn remove(&self, id: u32) -> StorageResult<()> {
        match fs::remove_file(self.file_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Extract the id from a file named `<prefix>_<id>.json`; anything
    /// else is not one of this store's files.
    fn id_from_file_name(path: &Path) -> Option<u32> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(".json")?;
        let id = stem.strip_prefix(T::KIND.prefix())?.strip_prefix('_')?;
        id.parse().ok()
    }

    /// Parse one file, validating that the content matches the kind and
    /// id its name claims.
    fn load_file(&self, path: &Path, expected_id: u32) -> StorageResult<T> {
        let bytes = fs::read(path)?;
        let envelope: RecordJson<T> = serde_json::from_slice(&bytes)?;

        if envelope.kind != T::KIND {
            return Err(StorageError::CorruptedRecord {
                path: path.to_path_buf(),
                reason: format!(
                    "kind mismatch: file name suggests '{}' but content has '{}'",
                    T::KIND,
                    envelope.kind
                ),
            });
        }
        if envelope.record.raw_id() != expected_id {
            return Err(StorageError::CorruptedRecord {
                path: path.to_path_buf(),
                reason: format!(
                    "id mismatch: file name suggests {} but content has {}",
                    expected_id,
                    envelope.record.raw_id()
                ),
            });
        }
        Ok(envelope.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MovieId, MovieRelease, PerformerId};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn setup() -> (TempDir, RecordStore<Movie>) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_dir, store) = setup();

        let mut movie = Movie::new(MovieId(0), "Alpha");
        movie.description = "first".to_string();
        movie.languages = vec!["en".to_string(), "de".to_string()];
        movie.runtime = 92;
        movie.rating = Some(3.5);
        movie.watch_date = NaiveDate::from_ymd_opt(2018, 6, 29);
        movie.releases = vec![MovieRelease::new(
            "Germany",
            NaiveDate::from_ymd_opt(2018, 6, 1).unwrap(),
        )];

        store.save(&movie).unwrap();

        let loaded = store.load_all();
        assert_eq!(loaded, vec![movie]);
    }

    #[test]
    fn test_save_is_update() {
        let (_dir, store) = setup();

        let mut movie = Movie::new(MovieId(0), "Alpha");
        store.save(&movie).unwrap();

        movie.runtime = 120;
        store.save(&movie).unwrap();

        let loaded = store.load_all();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].runtime, 120);
    }

    #[test]
    fn test_file_name_and_discriminator() {
        let (_dir, store) = setup();
        store.save(&Movie::new(MovieId(4), "Alpha")).unwrap();

        let path = store.file_path(4);
        assert!(path.ends_with("movies/movie_4.json"));

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(raw["kind"], "movie");
        assert_eq!(raw["id"], 4);
    }

    #[test]
    fn test_load_missing_directory() {
        let (_dir, store) = setup();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_malformed_file_is_skipped() {
        let (_dir, store) = setup();
        store.save(&Movie::new(MovieId(0), "Alpha")).unwrap();
        fs::write(store.file_path(5), b"{ not json").unwrap();

        let loaded = store.load_all();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "Alpha");
    }

    #[test]
    fn test_kind_mismatch_is_skipped() {
        let (_dir, store) = setup();
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(
            store.file_path(0),
            br#"{"kind": "performer", "id": 0, "name": "Beta"}"#,
        )
        .unwrap();

        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_id_mismatch_is_skipped() {
        let (_dir, store) = setup();
        fs::create_dir_all(store.directory()).unwrap();
        fs::write(
            store.file_path(2),
            br#"{"kind": "movie", "id": 9, "title": "Alpha"}"#,
        )
        .unwrap();

        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_foreign_files_are_ignored() {
        let (_dir, store) = setup();
        store.save(&Movie::new(MovieId(0), "Alpha")).unwrap();
        fs::write(store.directory().join("notes.txt"), b"hello").unwrap();
        fs::write(
            store.directory().join("performer_0.json"),
            br#"{"kind": "performer", "id": 0}"#,
        )
        .unwrap();

        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, store) = setup();
        store.save(&Movie::new(MovieId(0), "Alpha")).unwrap();

        store.remove(0).unwrap();
        assert!(store.load_all().is_empty());
        // removing again is fine
        store.remove(0).unwrap();
    }

    #[test]
    fn test_performer_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store: RecordStore<Performer> = RecordStore::new(dir.path());

        let mut performer = Performer::new(PerformerId(1), "Beta");
        performer.occupations = vec!["actor".to_string()];
        performer.date_of_birth = NaiveDate::from_ymd_opt(1990, 6, 15);
        store.save(&performer).unwrap();

        assert!(store.file_path(1).ends_with("performers/performer_1.json"));
        assert_eq!(store.load_all(), vec![performer]);
    }

    #[test]
    fn test_loaded_records_sorted_by_id() {
        let (_dir, store) = setup();
        for id in [3, 0, 7] {
            store.save(&Movie::new(MovieId(id), "x")).unwrap();
        }
        let ids: Vec<u32> = store.load_all().iter().map(|m| m.id.raw()).collect();
        assert_eq!(ids, vec![0, 3, 7]);
    }
}
