//! Owns the movie list state and the read request that refreshes it.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::domain::Movie;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{error::StoreError, store::MovieStore};

static NEXT_COORDINATOR_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a coordinator, shared by every clone of its `Arc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinatorId(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    items: Vec<Movie>,
    phase: FetchPhase,
}

impl FetchState {
    pub fn items(&self) -> &[Movie] {
        &self.items
    }

    pub fn phase(&self) -> &FetchPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// When the loading flag is cleared after a read is issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadingPolicy {
    /// Cleared as soon as the request is issued, before any response arrives.
    #[default]
    ClearOnIssue,
    /// Held until the most recently issued read settles. Earlier overlapping reads still
    /// apply their items but leave the phase at `Loading`.
    UntilSettled,
}

/// What happens to a response from a read that has since been superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Every response is applied; the last one to resolve wins.
    #[default]
    Apply,
    /// Only the most recently issued read may change the state.
    Discard,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub loading: LoadingPolicy,
    pub stale: StalePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    PhaseChanged(FetchPhase),
    StaleDiscarded { generation: u64 },
}

pub struct FetchCoordinator {
    id: CoordinatorId,
    store: Arc<dyn MovieStore>,
    options: CoordinatorOptions,
    state: watch::Sender<FetchState>,
    events: broadcast::Sender<FetchEvent>,
    generation: AtomicU64,
}

impl FetchCoordinator {
    pub fn new(store: Arc<dyn MovieStore>) -> Arc<Self> {
        Self::with_options(store, CoordinatorOptions::default())
    }

    pub fn with_options(store: Arc<dyn MovieStore>, options: CoordinatorOptions) -> Arc<Self> {
        let (state, _) = watch::channel(FetchState::default());
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            id: CoordinatorId(NEXT_COORDINATOR_ID.fetch_add(1, Ordering::Relaxed)),
            store,
            options,
            state,
            events,
            generation: AtomicU64::new(0),
        })
    }

    pub fn id(&self) -> CoordinatorId {
        self.id
    }

    pub fn options(&self) -> CoordinatorOptions {
        self.options
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Latest state, re-notified on every change.
    pub fn watch(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Every phase transition, including ones too short to show up in `watch`.
    pub fn subscribe(&self) -> broadcast::Receiver<FetchEvent> {
        self.events.subscribe()
    }

    /// Issues one read of the movies collection and returns without waiting for it.
    ///
    /// The returned handle resolves once the response has been applied; dropping it
    /// does not cancel the request. Must be called from within a tokio runtime.
    pub fn fetch_all(self: &Arc<Self>) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(coordinator = self.id.0, generation, "fetching movies");

        self.update(|state| {
            state.phase = FetchPhase::Loading;
            true
        });

        let coordinator = Arc::clone(self);
        let task = tokio::spawn(async move {
            let outcome = coordinator.store.list_movies().await;
            coordinator.settle(generation, outcome);
        });

        if self.options.loading == LoadingPolicy::ClearOnIssue {
            // The spawned read may already have settled on another worker.
            self.update(|state| {
                if !state.is_loading() {
                    return false;
                }
                state.phase = FetchPhase::Idle;
                true
            });
        }

        task
    }

    fn settle(&self, generation: u64, outcome: Result<Vec<Movie>, StoreError>) {
        let superseded = generation != self.generation.load(Ordering::SeqCst);
        if superseded && self.options.stale == StalePolicy::Discard {
            debug!(coordinator = self.id.0, generation, "discarding superseded movie list");
            let _ = self.events.send(FetchEvent::StaleDiscarded { generation });
            return;
        }
        // While a newer read is outstanding, only it may end the loading phase.
        let defer_to_newer = superseded && self.options.loading == LoadingPolicy::UntilSettled;

        match outcome {
            Ok(items) => {
                info!(coordinator = self.id.0, count = items.len(), "loaded movies");
                self.update(|state| {
                    let hold_loading = defer_to_newer && state.is_loading();
                    state.items = items;
                    if !hold_loading {
                        state.phase = FetchPhase::Loaded;
                    }
                    true
                });
            }
            Err(error) => {
                warn!(coordinator = self.id.0, %error, "movie list fetch failed");
                self.update(|state| {
                    if defer_to_newer && state.is_loading() {
                        return false;
                    }
                    state.phase = FetchPhase::Failed(error.to_string());
                    true
                });
            }
        }
    }

    fn update(&self, apply: impl FnOnce(&mut FetchState) -> bool) {
        let events = &self.events;
        // Events are sent under the state lock so subscribers see transitions in order.
        self.state.send_if_modified(|state| {
            if !apply(state) {
                return false;
            }
            let _ = events.send(FetchEvent::PhaseChanged(state.phase.clone()));
            true
        });
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
