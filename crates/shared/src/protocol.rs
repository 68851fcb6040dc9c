//! Wire shapes exchanged with the JSON document store.

use serde::{Deserialize, Serialize};

use crate::domain::{Movie, MovieId, NewMovie};

/// Collection holding the movie records.
pub const MOVIES_COLLECTION: &str = "movies";

/// A record as stored under its key. Unknown fields are ignored on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDocument {
    pub title: String,
    pub opening_text: String,
    pub release_date: String,
}

impl MovieDocument {
    pub fn into_movie(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            opening_text: self.opening_text,
            release_date: self.release_date,
        }
    }
}

impl From<NewMovie> for MovieDocument {
    fn from(value: NewMovie) -> Self {
        Self {
            title: value.title,
            opening_text: value.opening_text,
            release_date: value.release_date,
        }
    }
}

/// Body returned by the store after a create: the key it generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedKey {
    pub name: String,
}

/// Path segment for a collection, e.g. `movies.json`.
pub fn collection_path(collection: &str) -> String {
    format!("{collection}.json")
}
