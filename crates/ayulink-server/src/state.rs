//! Application state shared by all handlers.

use std::sync::Arc;

use ayulink_core::{DocumentProcessor, ResultStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    processor: Arc<DocumentProcessor>,
    store: ResultStore,
}

impl AppState {
    /// Create the state from an already configured pipeline and store.
    pub fn new(processor: DocumentProcessor, store: ResultStore) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                processor: Arc::new(processor),
                store,
            }),
        }
    }

    /// Get a handle to the document processor, for use on blocking threads.
    pub fn processor(&self) -> Arc<DocumentProcessor> {
        Arc::clone(&self.inner.processor)
    }

    /// Get the upload and result store.
    pub fn store(&self) -> &ResultStore {
        &self.inner.store
    }
}
