//! Client side of the movie list: store access, the fetch state machine, and the
//! fire-and-forget submitter.

pub mod coordinator;
pub mod error;
pub mod startup;
pub mod store;
pub mod submitter;
pub mod view;

pub use coordinator::{
    CoordinatorId, CoordinatorOptions, FetchCoordinator, FetchEvent, FetchPhase, FetchState,
    LoadingPolicy, StalePolicy,
};
pub use error::{StoreError, StoreOperation};
pub use startup::StartupTrigger;
pub use store::{HttpMovieStore, MovieStore};
pub use submitter::WriteSubmitter;
pub use view::{list_view, ListBlock};

/// Document store the client talks to unless told otherwise.
pub const DEFAULT_STORE_URL: &str = "https://react-http-fd65a-default-rtdb.firebaseio.com";
