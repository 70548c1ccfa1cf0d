//! Transcoder: converts between stored switchrooms and their wire form.
//!
//! Inbound, a loosely typed [`SwitchroomPayload`] is validated into either a
//! [`NewSwitchroom`] (creation, with its photo uploads) or a
//! [`SwitchroomChanges`] (update). Outbound, [`SwitchroomRepresentation`]
//! flattens a switchroom and its photos into the JSON shape served by the API.
//!
//! Uploaded photos are write-only: they are accepted on creation and never
//! rendered back; the rendered `photos` list comes from stored photo records.

use image::ImageFormat;
use serde::Serialize;
use serde_json::Value;

use switchroom_domain::error::{FieldError, MalformedInputError, SwitchroomError, ValidationError};
use switchroom_domain::id::{PhotoId, SwitchroomId};
use switchroom_domain::photo::Photo;
use switchroom_domain::switchroom::{AreaType, Switchroom, SwitchroomChanges, validate_name};
use switchroom_domain::time::Timestamp;

use crate::ports::{PhotoStorage, PhotoUpload};

/// Formats accepted for uploaded photos, matched on magic bytes.
const ACCEPTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
];

const INVALID_IMAGE: &str =
    "upload a valid image; the file was either not an image or a corrupted image";

/// `coordinates` exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCoordinates {
    /// A JSON document encoded as a string, as form transports send it.
    Encoded(String),
    /// A JSON value embedded directly in a JSON body; may be `null`.
    Value(Value),
}

impl RawCoordinates {
    /// Parse into a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedInputError::InvalidCoordinates`] when an encoded
    /// string is not valid JSON.
    pub fn parse(self) -> Result<Value, MalformedInputError> {
        match self {
            Self::Value(value) => Ok(value),
            Self::Encoded(text) => {
                serde_json::from_str(&text).map_err(MalformedInputError::InvalidCoordinates)
            }
        }
    }
}

/// Inbound switchroom fields as decoded from any transport.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SwitchroomPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub area_type: Option<String>,
    pub coordinates: Option<RawCoordinates>,
    pub uploaded_photos: Vec<PhotoUpload>,
}

/// A photo upload whose bytes were recognised as an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub extension: &'static str,
    pub data: Vec<u8>,
}

/// A validated creation request: the record to insert and its photos, in
/// the order they were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSwitchroom {
    pub switchroom: Switchroom,
    pub photos: Vec<ImageUpload>,
}

/// How much of the field set an update must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Replace: the same fields as creation are required.
    Full,
    /// Patch: only the fields present are validated and applied.
    Partial,
}

/// Validate a creation payload.
///
/// `name`, `area_type` and `coordinates` are required; `description`
/// defaults to empty. Every offending field is reported, not just the first.
///
/// # Errors
///
/// Returns [`SwitchroomError::MalformedInput`] when encoded `coordinates`
/// are not JSON, otherwise [`ValidationError::Fields`] listing each missing
/// or invalid field.
pub fn decode_for_create(payload: SwitchroomPayload) -> Result<NewSwitchroom, SwitchroomError> {
    let SwitchroomPayload {
        name,
        description,
        area_type,
        coordinates,
        uploaded_photos,
    } = payload;
    let coordinates = coordinates.map(RawCoordinates::parse).transpose()?;

    let mut errors = Vec::new();
    let name = required(name, "name", &mut errors).and_then(|name| check_name(name, &mut errors));
    let area_type = required(area_type, "area_type", &mut errors)
        .and_then(|raw| check_area_type(&raw, &mut errors));
    let coordinates = required(coordinates, "coordinates", &mut errors)
        .and_then(|value| check_coordinates(value, &mut errors));
    let photos = check_photos(uploaded_photos, &mut errors);

    let (Some(name), Some(area_type), Some(coordinates), true) =
        (name, area_type, coordinates, errors.is_empty())
    else {
        return Err(ValidationError::Fields(errors).into());
    };

    let switchroom = Switchroom::builder()
        .name(name)
        .description(description.unwrap_or_default())
        .area_type(area_type)
        .coordinates(coordinates)
        .build()?;

    Ok(NewSwitchroom { switchroom, photos })
}

/// Validate an update payload into a set of field changes.
///
/// Photos are not addressable on update and are ignored.
///
/// # Errors
///
/// Returns [`SwitchroomError::MalformedInput`] when encoded `coordinates`
/// are not JSON, otherwise [`ValidationError::Fields`] listing each missing
/// or invalid field.
pub fn decode_for_update(
    payload: SwitchroomPayload,
    mode: UpdateMode,
) -> Result<SwitchroomChanges, SwitchroomError> {
    let SwitchroomPayload {
        name,
        description,
        area_type,
        coordinates,
        uploaded_photos: _,
    } = payload;
    let coordinates = coordinates.map(RawCoordinates::parse).transpose()?;

    let mut errors = Vec::new();
    let (name, area_type, coordinates) = match mode {
        UpdateMode::Full => (
            required(name, "name", &mut errors),
            required(area_type, "area_type", &mut errors),
            required(coordinates, "coordinates", &mut errors),
        ),
        UpdateMode::Partial => (name, area_type, coordinates),
    };

    let changes = SwitchroomChanges {
        name: name.and_then(|name| check_name(name, &mut errors)),
        description,
        area_type: area_type.and_then(|raw| check_area_type(&raw, &mut errors)),
        coordinates: coordinates.and_then(|value| check_coordinates(value, &mut errors)),
    };

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(ValidationError::Fields(errors).into())
    }
}

fn required<T>(value: Option<T>, field: &'static str, errors: &mut Vec<FieldError>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::required(field));
    }
    value
}

fn check_name(name: String, errors: &mut Vec<FieldError>) -> Option<String> {
    match validate_name(&name) {
        Ok(()) => Some(name),
        Err(err) => {
            errors.extend(err.field_errors());
            None
        }
    }
}

fn check_area_type(raw: &str, errors: &mut Vec<FieldError>) -> Option<AreaType> {
    match raw.parse() {
        Ok(area_type) => Some(area_type),
        Err(err) => {
            errors.extend(ValidationError::field_errors(&err));
            None
        }
    }
}

fn check_coordinates(value: Value, errors: &mut Vec<FieldError>) -> Option<Value> {
    if value.is_null() {
        errors.push(FieldError::new("coordinates", "this field may not be null"));
        return None;
    }
    Some(value)
}

fn check_photos(uploads: Vec<PhotoUpload>, errors: &mut Vec<FieldError>) -> Vec<ImageUpload> {
    let mut photos = Vec::with_capacity(uploads.len());
    for (index, upload) in uploads.into_iter().enumerate() {
        match sniff_image(&upload.data) {
            Some(format) => photos.push(ImageUpload {
                extension: extension_for(format),
                data: upload.data,
            }),
            None => {
                let name = upload.file_name.as_deref().unwrap_or("unnamed");
                errors.push(FieldError::new(
                    "photos",
                    format!("item {index} ({name}): {INVALID_IMAGE}"),
                ));
            }
        }
    }
    photos
}

fn sniff_image(data: &[u8]) -> Option<ImageFormat> {
    if data.is_empty() {
        return None;
    }
    image::guess_format(data)
        .ok()
        .filter(|format| ACCEPTED_FORMATS.contains(format))
}

fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("bin")
}

/// Outbound shape of a switchroom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchroomRepresentation {
    pub id: SwitchroomId,
    pub name: String,
    pub description: String,
    pub area_type: AreaType,
    pub coordinates: Value,
    pub photos: Vec<PhotoRepresentation>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outbound shape of a photo; `image` is the URL clients fetch it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhotoRepresentation {
    pub id: PhotoId,
    pub image: String,
    pub uploaded_at: Timestamp,
}

impl SwitchroomRepresentation {
    /// Render a stored switchroom, resolving photo references to URLs.
    pub fn render<S: PhotoStorage>(switchroom: Switchroom, storage: &S) -> Self {
        Self {
            id: switchroom.id,
            name: switchroom.name,
            description: switchroom.description,
            area_type: switchroom.area_type,
            coordinates: switchroom.coordinates,
            photos: switchroom
                .photos
                .into_iter()
                .map(|photo| PhotoRepresentation::render(photo, storage))
                .collect(),
            created_at: switchroom.created_at,
            updated_at: switchroom.updated_at,
        }
    }
}

impl PhotoRepresentation {
    /// Render a stored photo, resolving its reference to a URL.
    pub fn render<S: PhotoStorage>(photo: Photo, storage: &S) -> Self {
        Self {
            id: photo.id,
            image: storage.url(&photo.image),
            uploaded_at: photo.uploaded_at,
        }
    }
}
