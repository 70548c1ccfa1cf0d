//! JSON REST handlers for switchrooms.

use axum::Json;
use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::{IntoResponse, Response};

use switchroom_app::ports::{PhotoStorage, SwitchroomRepository};
use switchroom_app::transcoder::{SwitchroomRepresentation, UpdateMode};
use switchroom_domain::error::SwitchroomError;
use switchroom_domain::id::SwitchroomId;

use crate::api::form::SwitchroomForm;
use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<SwitchroomRepresentation>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get and update endpoints.
pub enum GetResponse {
    Ok(Json<SwitchroomRepresentation>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created {
        location: String,
        body: Json<SwitchroomRepresentation>,
    },
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created { location, body } => {
                (StatusCode::CREATED, [(LOCATION, location)], body).into_response()
            }
        }
    }
}

/// Possible responses from the delete endpoint.
pub enum DeleteResponse {
    NoContent,
}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Parse a path id; text that is not a UUID answers `404`.
fn parse_id(id: &str) -> Result<SwitchroomId, ApiError> {
    SwitchroomId::resolve(id).map_err(|err| ApiError::from(SwitchroomError::from(err)))
}

/// `GET /api/switchrooms`
pub async fn list<R, S>(State(state): State<AppState<R, S>>) -> Result<ListResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let switchrooms = state.switchroom_service.list_switchrooms().await?;
    Ok(ListResponse::Ok(Json(switchrooms)))
}

/// `GET /api/switchrooms/:id`
pub async fn get<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let switchroom_id = parse_id(&id)?;
    let switchroom = state.switchroom_service.get_switchroom(switchroom_id).await?;
    Ok(GetResponse::Ok(Json(switchroom)))
}

/// `POST /api/switchrooms`
pub async fn create<R, S>(
    State(state): State<AppState<R, S>>,
    OriginalUri(uri): OriginalUri,
    form: SwitchroomForm,
) -> Result<CreateResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let created = state
        .switchroom_service
        .create_switchroom(form.into_payload())
        .await
        .map_err(ApiError::creating)?;

    let location = format!("{}/{}", uri.path().trim_end_matches('/'), created.id);
    Ok(CreateResponse::Created {
        location,
        body: Json(created),
    })
}

/// `PUT /api/switchrooms/:id`: every creation field is required.
pub async fn replace<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    form: SwitchroomForm,
) -> Result<GetResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    update(&state, &id, form, UpdateMode::Full).await
}

/// `PATCH /api/switchrooms/:id`: only the fields sent are changed.
pub async fn patch<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
    form: SwitchroomForm,
) -> Result<GetResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    update(&state, &id, form, UpdateMode::Partial).await
}

async fn update<R, S>(
    state: &AppState<R, S>,
    id: &str,
    form: SwitchroomForm,
    mode: UpdateMode,
) -> Result<GetResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let switchroom_id = parse_id(id)?;
    let updated = state
        .switchroom_service
        .update_switchroom(switchroom_id, form.into_payload(), mode)
        .await?;
    Ok(GetResponse::Ok(Json(updated)))
}

/// `DELETE /api/switchrooms/:id`
pub async fn delete<R, S>(
    State(state): State<AppState<R, S>>,
    Path(id): Path<String>,
) -> Result<DeleteResponse, ApiError>
where
    R: SwitchroomRepository + Send + Sync + 'static,
    S: PhotoStorage + Send + Sync + 'static,
{
    let switchroom_id = parse_id(&id)?;
    state
        .switchroom_service
        .delete_switchroom(switchroom_id)
        .await?;
    Ok(DeleteResponse::NoContent)
}
