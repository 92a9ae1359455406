//! The performer record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::id::{PerformerId, RecordKind};
use crate::model::image::ImageRef;

/// A performer appearing in zero to many movies.
///
/// Like [`Movie`](crate::model::Movie), links are owned by the library,
/// and every field except the id tolerates being absent from a stored
/// file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performer {
    pub id: PerformerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birth_name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub occupations: Vec<String>,
    /// own rating; `None` when not rated yet
    #[serde(default)]
    pub rating: Option<f64>,
}

impl Performer {
    /// Create a performer with the given id and name; everything else empty.
    pub fn new(id: PerformerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            birth_name: String::new(),
            biography: String::new(),
            date_of_birth: None,
            occupations: Vec::new(),
            rating: None,
        }
    }

    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }

    /// reference to this performer's image assets (same id as the performer)
    pub fn image(&self) -> ImageRef {
        ImageRef::new(RecordKind::Performer, self.id.raw())
    }

    /// first whitespace-separated part of the name, or the whole name
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// name parts between the first and the last, possibly empty
    pub fn middle_names(&self) -> Vec<&str> {
        let parts: Vec<&str> = self.name.split_whitespace().collect();
        if parts.len() > 2 {
            parts[1..parts.len() - 1].to_vec()
        } else {
            Vec::new()
        }
    }

    /// last whitespace-separated part of the name, or the whole name
    pub fn last_name(&self) -> &str {
        self.name.split_whitespace().last().unwrap_or(&self.name)
    }

    /// Age in full years on the given date, if the date of birth is known
    /// and not in the future.
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.date_of_birth.and_then(|born| today.years_since(born))
    }

    /// Age in full years today.
    pub fn age(&self) -> Option<u32> {
        self.age_on(chrono::Utc::now().date_naive())
    }
}
