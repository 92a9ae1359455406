//! The in-memory model: all movies, all performers, and the links
//! between them.
//!
//! The [`Library`] is the single source of truth. The storage layer only
//! transforms it to and from files; the presentation layer only reads it
//! and calls the mutation methods below. Collections are keyed and
//! iterated by id; the association table is a duplicate-free pair set, so
//! a movie can link to many performers (and vice versa) but never twice
//! to the same one.
//!
//! Deleting an entity always unlinks it first, so no operation can ever
//! observe (or persist) an association whose endpoint is gone.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::id::{find_free_id, MovieId, PerformerId};
use crate::model::movie::Movie;
use crate::model::performer::Performer;

/// All movies, all performers, and the movie↔performer relation.
#[derive(Debug, Default)]
pub struct Library {
    movies: BTreeMap<MovieId, Movie>,
    performers: BTreeMap<PerformerId, Performer>,
    associations: BTreeSet<(MovieId, PerformerId)>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Movies ====================

    /// movies in ascending id order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn movie_by_id(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Add a movie, returning whether it was newly added. A movie whose
    /// id is already present is rejected and the existing entry kept.
    pub fn add_movie(&mut self, movie: Movie) -> bool {
        match self.movies.entry(movie.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(movie);
                true
            }
        }
    }

    /// Insert or replace a movie. This is the update path: links and the
    /// rest of the model are untouched.
    pub fn put_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Remove a movie and every association naming it.
    ///
    /// Unlinking happens first, so linked performers immediately stop
    /// reporting the movie. Removing an absent id is a no-op.
    pub fn remove_movie(&mut self, id: MovieId) -> Option<Movie> {
        self.associations.retain(|(movie, _)| *movie != id);
        self.movies.remove(&id)
    }

    /// lowest movie id not currently in use
    pub fn allocate_movie_id(&self) -> MovieId {
        MovieId(find_free_id(self.movies.keys().map(|id| id.raw())))
    }

    // ==================== Performers ====================

    /// performers in ascending id order
    pub fn performers(&self) -> impl Iterator<Item = &Performer> {
        self.performers.values()
    }

    pub fn performer_count(&self) -> usize {
        self.performers.len()
    }

    pub fn performer_by_id(&self, id: PerformerId) -> Option<&Performer> {
        self.performers.get(&id)
    }

    /// Add a performer, returning whether it was newly added.
    pub fn add_performer(&mut self, performer: Performer) -> bool {
        match self.performers.entry(performer.id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(performer);
                true
            }
        }
    }

    /// Insert or replace a performer.
    pub fn put_performer(&mut self, performer: Performer) {
        self.performers.insert(performer.id, performer);
    }

    /// Remove a performer and every association naming it.
    pub fn remove_performer(&mut self, id: PerformerId) -> Option<Performer> {
        self.associations.retain(|(_, performer)| *performer != id);
        self.performers.remove(&id)
    }

    /// lowest performer id not currently in use
    pub fn allocate_performer_id(&self) -> PerformerId {
        PerformerId(find_free_id(self.performers.keys().map(|id| id.raw())))
    }

    // ==================== Associations ====================

    /// Link a movie and a performer.
    ///
    /// Both endpoints must be present in their collections; linking an
    /// unknown id is a no-op returning false. Linking an already linked
    /// pair is idempotent and returns false.
    pub fn link(&mut self, movie: MovieId, performer: PerformerId) -> bool {
        if !self.movies.contains_key(&movie) || !self.performers.contains_key(&performer) {
            return false;
        }
        self.associations.insert((movie, performer))
    }

    /// Unlink a pair, returning whether it was linked.
    pub fn unlink(&mut self, movie: MovieId, performer: PerformerId) -> bool {
        self.associations.remove(&(movie, performer))
    }

    pub fn is_linked(&self, movie: MovieId, performer: PerformerId) -> bool {
        self.associations.contains(&(movie, performer))
    }

    /// all pairs, in (movie id, performer id) order
    pub fn associations(&self) -> impl Iterator<Item = (MovieId, PerformerId)> + '_ {
        self.associations.iter().copied()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }

    /// Replace the whole relation. Used when reloading from storage;
    /// pairs must already be resolved against the collections.
    pub fn set_associations(
        &mut self,
        pairs: impl IntoIterator<Item = (MovieId, PerformerId)>,
    ) {
        self.associations = pairs.into_iter().collect();
    }

    /// Performers linked to a movie, sorted by name (case-insensitive).
    pub fn performers_of(&self, movie: MovieId) -> Vec<&Performer> {
        let mut linked: Vec<&Performer> = self
            .associations
            .iter()
            .filter(|(m, _)| *m == movie)
            .filter_map(|(_, p)| self.performers.get(p))
            .collect();
        linked.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        linked
    }

    /// Movies a performer is linked to, sorted by title (case-insensitive).
    pub fn movies_of(&self, performer: PerformerId) -> Vec<&Movie> {
        let mut linked: Vec<&Movie> = self
            .associations
            .iter()
            .filter(|(_, p)| *p == performer)
            .filter_map(|(m, _)| self.movies.get(m))
            .collect();
        linked.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
        linked
    }

    /// Overall rating of a movie: its own rating averaged with the mean
    /// rating of its rated linked performers.
    ///
    /// An unrated movie has no overall rating, performers or not. A rated
    /// movie without any rated linked performer keeps its own rating.
    /// Computed on demand, so unlinking a performer is immediately
    /// reflected.
    pub fn overall_rating(&self, movie: MovieId) -> Option<f64> {
        let own = self.movie_by_id(movie)?.rating?;
        let ratings: Vec<f64> = self
            .performers_of(movie)
            .iter()
            .filter_map(|performer| performer.rating)
            .collect();
        if ratings.is_empty() {
            return Some(own);
        }
        let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
        Some((own + mean) / 2.0)
    }

    /// Empty both collections and the relation. Nothing else.
    pub fn clear(&mut self) {
        self.movies.clear();
        self.performers.clear();
        self.associations.clear();
    }
}
