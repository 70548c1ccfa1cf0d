//! Typed decoding of switchroom create/update bodies.
//!
//! One [`SwitchroomForm`] is produced per request, whatever the transport:
//! a JSON document, a `multipart/form-data` body (which may carry photo
//! files under the repeated `photos` field) or an urlencoded form.
//! Form fields are always strings, so `coordinates` travels as a
//! JSON-encoded string; it is parsed by the service, after any lookup of the
//! addressed switchroom.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use switchroom_app::ports::PhotoUpload;
use switchroom_app::transcoder::{RawCoordinates, SwitchroomPayload};

use crate::error::ErrorBody;

/// Multipart field carrying photo files.
const PHOTOS_FIELD: &str = "photos";

/// Switchroom fields decoded from a request body.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SwitchroomForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub area_type: Option<String>,
    pub coordinates: Option<RawCoordinates>,
    pub photos: Vec<PhotoUpload>,
}

impl SwitchroomForm {
    /// Hand the fields over to the service.
    #[must_use]
    pub fn into_payload(self) -> SwitchroomPayload {
        SwitchroomPayload {
            name: self.name,
            description: self.description,
            area_type: self.area_type,
            coordinates: self.coordinates,
            uploaded_photos: self.photos,
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, FormRejection> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(FormRejection::multipart)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                PHOTOS_FIELD => {
                    let file_name = field.file_name().map(ToString::to_string);
                    let data = field.bytes().await.map_err(FormRejection::multipart)?;
                    form.photos.push(PhotoUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
                "name" | "description" | "area_type" | "coordinates" => {
                    let text = field.text().await.map_err(FormRejection::multipart)?;
                    form.set_text(&name, text);
                }
                _ => {}
            }
        }
        Ok(form)
    }

    fn set_text(&mut self, field: &str, text: String) {
        match field {
            "name" => self.name = Some(text),
            "description" => self.description = Some(text),
            "area_type" => self.area_type = Some(text),
            "coordinates" => self.coordinates = Some(RawCoordinates::Encoded(text)),
            _ => {}
        }
    }
}

/// JSON body shape; `coordinates` may be a value or an encoded string.
///
/// An explicit `null` is kept apart from an absent key so it can be rejected.
#[derive(Deserialize)]
struct JsonBody {
    name: Option<String>,
    description: Option<String>,
    area_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    coordinates: Option<Value>,
}

/// Any value that is present, `null` included, becomes `Some`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<JsonBody> for SwitchroomForm {
    fn from(body: JsonBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            area_type: body.area_type,
            coordinates: body.coordinates.map(|value| match value {
                Value::String(text) => RawCoordinates::Encoded(text),
                other => RawCoordinates::Value(other),
            }),
            photos: Vec::new(),
        }
    }
}

/// Urlencoded body shape; every field is a string.
#[derive(Deserialize)]
struct UrlencodedBody {
    name: Option<String>,
    description: Option<String>,
    area_type: Option<String>,
    coordinates: Option<String>,
}

impl From<UrlencodedBody> for SwitchroomForm {
    fn from(body: UrlencodedBody) -> Self {
        Self {
            name: body.name,
            description: body.description,
            area_type: body.area_type,
            coordinates: body.coordinates.map(RawCoordinates::Encoded),
            photos: Vec::new(),
        }
    }
}

/// Body transports understood by [`SwitchroomForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Json,
    Multipart,
    Urlencoded,
}

impl Transport {
    fn detect(req: &Request) -> Option<Self> {
        let content_type = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "multipart/form-data" => Some(Self::Multipart),
            "application/x-www-form-urlencoded" => Some(Self::Urlencoded),
            "application/json" => Some(Self::Json),
            other if other.starts_with("application/") && other.ends_with("+json") => {
                Some(Self::Json)
            }
            _ => None,
        }
    }
}

impl<S> FromRequest<S> for SwitchroomForm
where
    S: Send + Sync,
{
    type Rejection = FormRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Transport::detect(&req) {
            Some(Transport::Json) => {
                let Json(body) = Json::<JsonBody>::from_request(req, state)
                    .await
                    .map_err(|rejection| {
                        FormRejection::malformed(rejection.status(), rejection.body_text())
                    })?;
                Ok(body.into())
            }
            Some(Transport::Urlencoded) => {
                let Form(body) = Form::<UrlencodedBody>::from_request(req, state)
                    .await
                    .map_err(|rejection| {
                        FormRejection::malformed(rejection.status(), rejection.body_text())
                    })?;
                Ok(body.into())
            }
            Some(Transport::Multipart) => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|rejection| {
                        FormRejection::malformed(rejection.status(), rejection.body_text())
                    })?;
                Self::from_multipart(multipart).await
            }
            None => Err(FormRejection::UnsupportedMediaType),
        }
    }
}

/// Why a request body could not be decoded into a [`SwitchroomForm`].
#[derive(Debug)]
pub enum FormRejection {
    /// The content type is not JSON, multipart or urlencoded.
    UnsupportedMediaType,
    /// The body could not be read or parsed for its content type.
    Malformed { status: StatusCode, message: String },
}

impl FormRejection {
    /// Oversized bodies keep their `413`; every other failure is a `400`.
    fn malformed(status: StatusCode, message: String) -> Self {
        let status = match status {
            StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        Self::Malformed { status, message }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn multipart(err: axum::extract::multipart::MultipartError) -> Self {
        Self::malformed(err.status(), err.body_text())
    }
}

impl IntoResponse for FormRejection {
    fn into_response(self) -> Response {
        match self {
            Self::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Json(ErrorBody::message(
                    "expected a JSON, multipart/form-data or urlencoded body",
                )),
            )
                .into_response(),
            Self::Malformed { status, message } => {
                (status, Json(ErrorBody::message(message))).into_response()
            }
        }
    }
}
