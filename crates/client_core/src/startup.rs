use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::coordinator::{CoordinatorId, FetchCoordinator};

/// Runs the initial fetch once per coordinator.
///
/// Call `run` on every render; it only fetches when it sees a coordinator it has not
/// fetched for yet.
#[derive(Debug, Default)]
pub struct StartupTrigger {
    last_seen: Option<CoordinatorId>,
}

impl StartupTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run(&mut self, coordinator: &Arc<FetchCoordinator>) -> Option<JoinHandle<()>> {
        let id = coordinator.id();
        if self.last_seen == Some(id) {
            return None;
        }
        debug!(?id, "startup fetch");
        self.last_seen = Some(id);
        Some(coordinator.fetch_all())
    }
}

#[cfg(test)]
#[path = "tests/startup_tests.rs"]
mod tests;
