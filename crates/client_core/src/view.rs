//! What the movie section shows for a given fetch state.

use std::fmt;

use shared::domain::Movie;

use crate::coordinator::FetchState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListBlock {
    Movies(Vec<Movie>),
    NoMovies,
    Loading,
    Error(String),
}

/// Blocks in display order. A failed refresh keeps showing the stale list above the error.
pub fn list_view(state: &FetchState) -> Vec<ListBlock> {
    let mut blocks = Vec::new();
    let loading = state.is_loading();

    if !loading && !state.items().is_empty() {
        blocks.push(ListBlock::Movies(state.items().to_vec()));
    }
    if !loading && state.items().is_empty() && state.error().is_none() {
        blocks.push(ListBlock::NoMovies);
    }
    if loading {
        blocks.push(ListBlock::Loading);
    }
    if let Some(message) = state.error() {
        blocks.push(ListBlock::Error(message.to_string()));
    }

    blocks
}

impl fmt::Display for ListBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListBlock::Movies(movies) => {
                for (index, movie) in movies.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{} ({})", movie.title, movie.release_date)?;
                    write!(f, "  {}", movie.opening_text)?;
                }
                Ok(())
            }
            ListBlock::NoMovies => f.write_str("Found no movies."),
            ListBlock::Loading => f.write_str("Loading..."),
            ListBlock::Error(message) => f.write_str(message),
        }
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
