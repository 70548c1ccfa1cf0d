//! JSON REST API handler modules.

pub mod form;
#[allow(clippy::missing_errors_doc)]
pub mod switchrooms;

use axum::Router;
use axum::routing::get;

use switchroom_app::ports::{PhotoStorage, SwitchroomRepository};

use crate::state::AppState;

/// Build the `/api` sub-router.
///
/// Every route also answers with a trailing slash, which existing clients send.
pub fn routes<R, S>() -> Router<AppState<R, S>>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let collection = || get(switchrooms::list::<R, S>).post(switchrooms::create::<R, S>);
    let item = || {
        get(switchrooms::get::<R, S>)
            .put(switchrooms::replace::<R, S>)
            .patch(switchrooms::patch::<R, S>)
            .delete(switchrooms::delete::<R, S>)
    };

    Router::new()
        .route("/switchrooms", collection())
        .route("/switchrooms/", collection())
        .route("/switchrooms/{id}", item())
        .route("/switchrooms/{id}/", item())
}
