/// Shared application state passed to axum handlers.

use std::sync::Arc;

use binder_core::mutation::MutationApi;
use binder_core::storage::file::JsonFileStore;

pub struct AppState<C> {
    pub api: Arc<MutationApi<JsonFileStore>>,
    pub catalog: Arc<C>,
}

impl<C> AppState<C> {
    pub fn new(api: MutationApi<JsonFileStore>, catalog: C) -> Self {
        Self {
            api: Arc::new(api),
            catalog: Arc::new(catalog),
        }
    }
}

// A derive would demand `C: Clone`.
impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            catalog: self.catalog.clone(),
        }
    }
}
