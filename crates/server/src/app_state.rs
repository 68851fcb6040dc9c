use crate::documents::DocumentStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) documents: DocumentStore,
}
