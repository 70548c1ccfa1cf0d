//! Axum router assembly.

use std::path::PathBuf;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use switchroom_app::ports::{PhotoStorage, SwitchroomRepository};

use crate::state::AppState;

/// Default request body limit, large enough for a handful of photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Directory of stored photos served under a URL prefix.
#[derive(Debug, Clone)]
pub struct MediaMount {
    /// URL prefix, e.g. `/media`.
    pub url_prefix: String,
    /// Directory the photo storage writes to.
    pub root: PathBuf,
}

/// Router-level settings owned by the composition root.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
    /// Serve stored photos from this directory when set.
    pub media: Option<MediaMount>,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            media: None,
        }
    }
}

/// Build the top-level axum [`Router`].
///
/// Nests API routes under `/api` and, when configured, serves stored photos
/// under the media URL prefix. Includes a [`TraceLayer`] that logs each HTTP
/// request/response at the `DEBUG` level using the `tracing` ecosystem.
pub fn build<R, S>(state: AppState<R, S>, options: &RouterOptions) -> Router
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", crate::api::routes())
        .layer(DefaultBodyLimit::max(options.max_upload_bytes))
        .with_state(state);

    if let Some(media) = &options.media {
        let prefix = format!("/{}", media.url_prefix.trim_matches('/'));
        router = router.nest_service(&prefix, ServeDir::new(&media.root));
    }

    router.layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
