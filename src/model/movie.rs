//! The movie record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::id::{MovieId, RecordKind};
use crate::model::image::ImageRef;

/// One release of a movie: a location (country) and a date.
///
/// A movie can have zero to many releases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRelease {
    pub location: String,
    pub date: NaiveDate,
}

impl MovieRelease {
    pub fn new(location: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            location: location.into(),
            date,
        }
    }
}

/// A movie with zero to many linked performers.
///
/// Links to performers are not stored here; the library owns the
/// association table. All fields except the id default when missing from
/// a stored file, and unknown fields are ignored, so old and new files
/// read interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub watch_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub releases: Vec<MovieRelease>,
    /// runtime in minutes
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub production_locations: Vec<String>,
    /// own rating; `None` when not rated yet
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Movie {
    /// Create a movie with the given id and title; everything else empty.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            watch_date: None,
            description: String::new(),
            languages: Vec::new(),
            releases: Vec::new(),
            runtime: 0,
            production_locations: Vec::new(),
            rating: None,
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }

    /// reference to this movie's image assets (same id as the movie)
    pub fn image(&self) -> ImageRef {
        ImageRef::new(RecordKind::Movie, self.id.raw())
    }
}
