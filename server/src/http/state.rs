use std::sync::Arc;
use storage_backend::ObjectStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn ObjectStore>,
}
