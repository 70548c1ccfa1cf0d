//! Shared application state for axum handlers.

use std::sync::Arc;

use switchroom_app::ports::{PhotoStorage, SwitchroomRepository};
use switchroom_app::services::switchroom_service::SwitchroomService;

/// Application state shared across all axum handlers.
///
/// Generic over the repository and photo storage types to avoid dynamic
/// dispatch. `Clone` is implemented manually so only the `Arc` wrapper is
/// cloned, not the repository or storage.
pub struct AppState<R, S> {
    /// Switchroom CRUD service.
    pub switchroom_service: Arc<SwitchroomService<R, S>>,
}

impl<R, S> Clone for AppState<R, S> {
    fn clone(&self) -> Self {
        Self {
            switchroom_service: Arc::clone(&self.switchroom_service),
        }
    }
}

impl<R, S> AppState<R, S>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    /// Create a new application state from a service instance.
    pub fn new(switchroom_service: SwitchroomService<R, S>) -> Self {
        Self {
            switchroom_service: Arc::new(switchroom_service),
        }
    }
}
