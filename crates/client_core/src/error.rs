use std::fmt;

use thiserror::Error;

/// Which store call failed; decides the generic message shown for a bad status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    ListMovies,
    CreateMovie,
}

impl StoreOperation {
    pub fn failure_message(self) -> &'static str {
        match self {
            StoreOperation::ListMovies => "Something went wrong",
            StoreOperation::CreateMovie => "Failed to POST new movie.",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::ListMovies => f.write_str("list_movies"),
            StoreOperation::CreateMovie => f.write_str("create_movie"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// No status was obtained (connect, DNS, broken body stream).
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    /// The store answered with a non-success status. The status and body are not
    /// part of the message.
    #[error("{}", .operation.failure_message())]
    Status {
        operation: StoreOperation,
        status: u16,
    },
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid store url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl StoreError {
    pub fn status(operation: StoreOperation, status: u16) -> Self {
        Self::Status { operation, status }
    }
}
