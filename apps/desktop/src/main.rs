use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    list_view, CoordinatorOptions, FetchCoordinator, HttpMovieStore, LoadingPolicy, MovieStore,
    StalePolicy, StartupTrigger, WriteSubmitter, DEFAULT_STORE_URL,
};
use shared::domain::NewMovie;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

mod shell;

#[derive(Parser, Debug)]
#[command(name = "movies", about = "List and add movies in a JSON document store")]
struct Cli {
    /// Base URL of the document store; the collection lives at `<url>/movies.json`.
    #[arg(long, default_value = DEFAULT_STORE_URL)]
    store_url: String,
    /// Log filter for diagnostics written to stderr.
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Keep the loading indicator up until the response arrives.
    #[arg(long)]
    hold_loading: bool,
    /// Ignore responses from reads that were superseded by a newer one.
    #[arg(long)]
    discard_stale: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the movie list.
    List,
    /// Submit one movie. The list is not refreshed.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        opening_text: String,
        #[arg(long)]
        release_date: String,
    },
    /// Interactive session: fetch, add and show.
    Shell,
}

impl Cli {
    fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            loading: if self.hold_loading {
                LoadingPolicy::UntilSettled
            } else {
                LoadingPolicy::ClearOnIssue
            },
            stale: if self.discard_stale {
                StalePolicy::Discard
            } else {
                StalePolicy::Apply
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&cli.log_level).context("invalid --log-level filter")?,
        )
        .with_writer(std::io::stderr)
        .init();

    let http_store = HttpMovieStore::new(&cli.store_url)
        .with_context(|| format!("cannot use store url '{}'", cli.store_url))?;
    let collection = http_store.collection_url().to_string();
    let store: Arc<dyn MovieStore> = Arc::new(http_store);
    let coordinator = FetchCoordinator::with_options(store.clone(), cli.coordinator_options());
    let submitter = WriteSubmitter::new(store);
    tracing::debug!(
        %collection,
        options = ?coordinator.options(),
        "movie client starting"
    );

    match cli.command {
        Command::List => {
            let mut startup = StartupTrigger::new();
            if let Some(fetch) = startup.run(&coordinator) {
                fetch.await.context("fetch task panicked")?;
            }
            for block in list_view(&coordinator.state()) {
                println!("{block}");
            }
        }
        Command::Add {
            title,
            opening_text,
            release_date,
        } => {
            submitter
                .submit(NewMovie::new(title, opening_text, release_date))
                .await
                .context("submit task panicked")?;
        }
        Command::Shell => {
            let input = BufReader::new(tokio::io::stdin());
            shell::run(coordinator, submitter, input, std::io::stdout()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
