//! The store: one storage root, one library, and the coordination
//! between them.
//!
//! [`Store::open`] binds a concrete root directory, loads both record
//! kinds into a fresh [`Library`] and then loads the association file
//! against the populated collections. Entities load strictly before
//! associations, so every stored pair can be resolved. From then on the
//! store keeps files and library in step: every save or delete of a
//! record also rewrites the association file in full, so the file can
//! never be stale relative to the entity graph.
//!
//! Each root gets its own independent `Store` value; two stores on
//! different roots share nothing. Failures of individual file
//! operations after `open` are logged and swallowed: the library is
//! authoritative, files are a best-effort mirror of it.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tempfile::TempDir;
use tracing::error;

use crate::model::{
    ImageRef, ImageSize, Library, Movie, MovieId, Performer, PerformerId, RecordKind,
};
use crate::storage::association::AssociationStore;
use crate::storage::error::StorageResult;
use crate::storage::record::RecordStore;

/// file name of the movie↔performer relation
const MOVIE_PERFORMER: &str = "movie-performer";

/// A movie collection bound to one storage root.
///
/// All reads go through [`library`](Store::library); mutations that
/// should persist go through the `save_*`/`delete_*`/`link`/`unlink`
/// methods. Library guards must be dropped before calling any of those,
/// or the call deadlocks on the library lock.
pub struct Store {
    root: PathBuf,
    image_dir: PathBuf,
    movies: RecordStore<Movie>,
    performers: RecordStore<Performer>,
    associations: AssociationStore,
    library: RwLock<Library>,
    /// keeps the backing directory alive for stores opened via [`Store::open_temp`]
    _temp: Option<TempDir>,
}

impl Store {
    /// Open the store rooted at the given directory, creating it if
    /// absent, and load everything found there into the library.
    ///
    /// This is the only fail-fast path of the storage layer: an
    /// unusable root is an error here rather than a degraded store
    /// later.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let store = Self {
            image_dir: root.join("images"),
            movies: RecordStore::new(&root),
            performers: RecordStore::new(&root),
            associations: AssociationStore::new(&root, MOVIE_PERFORMER),
            library: RwLock::new(Library::new()),
            root,
            _temp: None,
        };
        store.reload();
        Ok(store)
    }

    /// Open a store backed by a fresh temporary directory, removed when
    /// the store is dropped. For tests and throwaway sessions.
    pub fn open_temp() -> StorageResult<Self> {
        let dir = TempDir::new()?;
        let mut store = Self::open(dir.path())?;
        store._temp = Some(dir);
        Ok(store)
    }

    /// storage root this store is bound to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// directory image assets live under, `<root>/images`
    pub fn image_path(&self) -> &Path {
        &self.image_dir
    }

    /// read access to the library
    pub fn library(&self) -> RwLockReadGuard<'_, Library> {
        self.library.read()
    }

    /// write access to the library, for mutations that should not
    /// persist immediately (the next save rewrites associations anyway)
    pub fn library_mut(&self) -> RwLockWriteGuard<'_, Library> {
        self.library.write()
    }

    /// Throw away the in-memory state and reload the library from
    /// storage. Unsaved records and links are lost.
    pub fn clear(&self) {
        self.reload();
    }

    /// Repopulate the library from the files under the root: both
    /// record kinds first, then the relation resolved against them.
    fn reload(&self) {
        let movies = self.movies.load_all();
        let performers = self.performers.load_all();

        let mut library = self.library.write();
        library.clear();
        for movie in movies {
            library.add_movie(movie);
        }
        for performer in performers {
            library.add_performer(performer);
        }

        let pairs = self.associations.load(
            |id| library.movie_by_id(MovieId(id)),
            |id| library.performer_by_id(PerformerId(id)),
        );
        library.set_associations(
            pairs
                .into_iter()
                .map(|(first, second)| (MovieId(first), PerformerId(second))),
        );
    }

    // ==================== Records ====================

    /// Insert or update a movie in the library and persist it. Also
    /// rewrites the association file.
    pub fn save_movie(&self, movie: Movie) -> MovieId {
        let id = movie.id;
        let mut library = self.library.write();
        library.put_movie(movie);
        if let Some(record) = library.movie_by_id(id) {
            if let Err(e) = self.movies.save(record) {
                error!("could not save movie {}: {}", id, e);
            }
        }
        self.save_associations(&library);
        id
    }

    /// Insert or update a performer in the library and persist it. Also
    /// rewrites the association file.
    pub fn save_performer(&self, performer: Performer) -> PerformerId {
        let id = performer.id;
        let mut library = self.library.write();
        library.put_performer(performer);
        if let Some(record) = library.performer_by_id(id) {
            if let Err(e) = self.performers.save(record) {
                error!("could not save performer {}: {}", id, e);
            }
        }
        self.save_associations(&library);
        id
    }

    /// Delete a movie: unlink it from every performer, remove it from
    /// the library, delete its file and image assets, and rewrite the
    /// association file. Returns whether the movie was still in the
    /// library; a missing file is tolerated either way.
    pub fn delete_movie(&self, id: MovieId) -> bool {
        let mut library = self.library.write();
        let removed = library.remove_movie(id);
        if let Err(e) = self.movies.remove(id.raw()) {
            error!("could not delete movie file {}: {}", id, e);
        }
        self.save_associations(&library);
        drop(library);

        self.save_image(&ImageRef::new(RecordKind::Movie, id.raw()), None);
        removed.is_some()
    }

    /// Delete a performer, mirroring [`delete_movie`](Store::delete_movie).
    pub fn delete_performer(&self, id: PerformerId) -> bool {
        let mut library = self.library.write();
        let removed = library.remove_performer(id);
        if let Err(e) = self.performers.remove(id.raw()) {
            error!("could not delete performer file {}: {}", id, e);
        }
        self.save_associations(&library);
        drop(library);

        self.save_image(&ImageRef::new(RecordKind::Performer, id.raw()), None);
        removed.is_some()
    }

    // ==================== Associations ====================

    /// Link a movie and a performer and persist the relation. Returns
    /// false (and persists nothing) when either id is unknown or the
    /// pair already exists.
    pub fn link(&self, movie: MovieId, performer: PerformerId) -> bool {
        let mut library = self.library.write();
        let linked = library.link(movie, performer);
        if linked {
            self.save_associations(&library);
        }
        linked
    }

    /// Unlink a pair and persist the relation. Returns whether the pair
    /// was linked.
    pub fn unlink(&self, movie: MovieId, performer: PerformerId) -> bool {
        let mut library = self.library.write();
        let unlinked = library.unlink(movie, performer);
        if unlinked {
            self.save_associations(&library);
        }
        unlinked
    }

    fn save_associations(&self, library: &Library) {
        let pairs = library
            .associations()
            .map(|(movie, performer)| (movie.raw(), performer.raw()));
        if let Err(e) = self.associations.save(pairs) {
            error!("could not save associations: {}", e);
        }
    }

    // ==================== Images ====================

    /// Write a record's image assets, one file per size tier, or clear
    /// them when `data` is `None`.
    ///
    /// The caller hands in encoded image bytes; every tier receives the
    /// same data, scaling is the presentation layer's concern. Clearing
    /// a tier that was never written is a no-op.
    pub fn save_image(&self, image: &ImageRef, data: Option<&[u8]>) {
        for size in ImageSize::ALL {
            let path = image.path(&self.image_dir, size);
            match data {
                Some(bytes) => {
                    if let Some(parent) = path.parent() {
                        if let Err(e) = fs::create_dir_all(parent) {
                            error!("could not create {}: {}", parent.display(), e);
                            continue;
                        }
                    }
                    if let Err(e) = fs::write(&path, bytes) {
                        error!("could not write {}: {}", path.display(), e);
                    }
                }
                None => match fs::remove_file(&path) {
                    Ok(()) => {}
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                    Err(e) => error!("could not delete {}: {}", path.display(), e),
                },
            }
        }
    }

    // ==================== Teardown ====================

    /// Recursively delete the entire storage root. Test teardown only;
    /// the store is consumed.
    pub fn self_destruct(self) {
        if let Err(e) = fs::remove_dir_all(&self.root) {
            if e.kind() != std::io::ErrorKind::NotFound {
                error!("could not delete {}: {}", self.root.display(), e);
            }
        }
    }
}
