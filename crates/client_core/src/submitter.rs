use std::sync::Arc;

use shared::domain::NewMovie;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::store::MovieStore;

/// Sends new records to the store. Outcomes are only logged; the movie list is not
/// refreshed.
#[derive(Clone)]
pub struct WriteSubmitter {
    store: Arc<dyn MovieStore>,
}

impl WriteSubmitter {
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self { store }
    }

    pub fn submit(&self, movie: NewMovie) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            match store.create_movie(&movie).await {
                Ok(reply) => info!(title = %movie.title, %reply, "stored new movie"),
                Err(error) => error!(title = %movie.title, %error, "movie submission failed"),
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/submitter_tests.rs"]
mod tests;
