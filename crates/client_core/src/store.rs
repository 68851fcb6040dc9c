//! Access to the movies collection of the remote JSON document store.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::{Map, Value};
use shared::{
    domain::{Movie, MovieId, NewMovie},
    protocol::{collection_path, MovieDocument, MOVIES_COLLECTION},
};
use tracing::debug;
use url::Url;

use crate::error::{StoreError, StoreOperation};

#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Reads the whole collection, in the order the store listed the keys.
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError>;
    /// Creates one record and returns whatever the store echoed back.
    async fn create_movie(&self, movie: &NewMovie) -> Result<Value, StoreError>;
}

#[derive(Debug, Clone)]
pub struct HttpMovieStore {
    http: Client,
    collection_url: Url,
}

impl HttpMovieStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            http,
            collection_url: collection_url(base_url, MOVIES_COLLECTION)?,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }
}

#[async_trait]
impl MovieStore for HttpMovieStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, StoreError> {
        let response = self.http.get(self.collection_url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %self.collection_url, status = status.as_u16(), "movie list rejected");
            return Err(StoreError::status(
                StoreOperation::ListMovies,
                status.as_u16(),
            ));
        }

        let body = response.bytes().await?;
        Ok(normalize_collection(&body)?)
    }

    async fn create_movie(&self, movie: &NewMovie) -> Result<Value, StoreError> {
        let response = self
            .http
            .post(self.collection_url.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&MovieDocument::from(movie.clone()))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(url = %self.collection_url, status = status.as_u16(), "movie create rejected");
            return Err(StoreError::status(
                StoreOperation::CreateMovie,
                status.as_u16(),
            ));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Turns a collection body (`{key: document, ...}` or `null`) into records, keeping the
/// body's key order and dropping fields other than the three known ones.
pub fn normalize_collection(body: &[u8]) -> Result<Vec<Movie>, serde_json::Error> {
    let documents: Option<Map<String, Value>> = serde_json::from_slice(body)?;
    documents
        .into_iter()
        .flatten()
        .map(|(key, value)| {
            let document: MovieDocument = serde_json::from_value(value)?;
            Ok(document.into_movie(MovieId(key)))
        })
        .collect()
}

fn collection_url(base_url: &str, collection: &str) -> Result<Url, url::ParseError> {
    let base = base_url.trim().trim_end_matches('/');
    Url::parse(&format!("{base}/"))?.join(&collection_path(collection))
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
