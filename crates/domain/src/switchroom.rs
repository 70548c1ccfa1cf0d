//! Switchroom: a named facility entry with a spatial footprint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FieldError, SwitchroomError, ValidationError};
use crate::id::SwitchroomId;
use crate::photo::Photo;
use crate::time::{self, Timestamp};

/// Longest accepted `name`, in characters.
pub const NAME_MAX_LEN: usize = 255;

/// Shape of the footprint described by `coordinates`.
///
/// The tag is informational only; nothing ties it to the structure of the
/// coordinates value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AreaType {
    Point,
    Polygon,
}

impl AreaType {
    /// Wire and storage tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Point => "POINT",
            Self::Polygon => "POLYGON",
        }
    }
}

impl fmt::Display for AreaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AreaType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POINT" => Ok(Self::Point),
            "POLYGON" => Ok(Self::Polygon),
            other => Err(ValidationError::UnknownAreaType(other.to_string())),
        }
    }
}

/// Check the `name` rules shared by creation and updates.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] for blank names and
/// [`ValidationError::NameTooLong`] past [`NAME_MAX_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ValidationError::NameTooLong { max: NAME_MAX_LEN });
    }
    Ok(())
}

/// A switchroom entry together with the photos it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Switchroom {
    pub id: SwitchroomId,
    pub name: String,
    pub description: String,
    pub area_type: AreaType,
    pub coordinates: Value,
    pub photos: Vec<Photo>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Switchroom {
    /// Create a builder for constructing a [`Switchroom`].
    #[must_use]
    pub fn builder() -> SwitchroomBuilder {
        SwitchroomBuilder::default()
    }

    /// Apply a set of field changes and refresh `updated_at`.
    ///
    /// Nothing is modified when the resulting record would be invalid.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::Validation`] if the new name breaks the rules.
    pub fn apply(&mut self, changes: SwitchroomChanges) -> Result<(), SwitchroomError> {
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        let SwitchroomChanges {
            name,
            description,
            area_type,
            coordinates,
        } = changes;
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(area_type) = area_type {
            self.area_type = area_type;
        }
        if let Some(coordinates) = coordinates {
            self.coordinates = coordinates;
        }
        self.touch();
        Ok(())
    }

    /// Mark the record as modified now.
    pub fn touch(&mut self) {
        self.updated_at = time::after(self.updated_at);
    }
}

/// Field changes for an existing [`Switchroom`]; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchroomChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub area_type: Option<AreaType>,
    pub coordinates: Option<Value>,
}

/// Step-by-step builder for [`Switchroom`].
#[derive(Debug, Default)]
pub struct SwitchroomBuilder {
    name: Option<String>,
    description: Option<String>,
    area_type: Option<AreaType>,
    coordinates: Option<Value>,
}

impl SwitchroomBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn area_type(mut self, area_type: AreaType) -> Self {
        self.area_type = Some(area_type);
        self
    }

    #[must_use]
    pub fn coordinates(mut self, coordinates: Value) -> Self {
        self.coordinates = Some(coordinates);
        self
    }

    /// Consume the builder, validate, and return a fresh [`Switchroom`]
    /// with no photos and both timestamps set to now.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::Validation`] listing every missing or
    /// invalid field.
    pub fn build(self) -> Result<Switchroom, SwitchroomError> {
        let mut errors = Vec::new();
        match &self.name {
            None => errors.push(FieldError::required("name")),
            Some(name) => {
                if let Err(err) = validate_name(name) {
                    errors.extend(err.field_errors());
                }
            }
        }
        if self.area_type.is_none() {
            errors.push(FieldError::required("area_type"));
        }
        if self.coordinates.is_none() {
            errors.push(FieldError::required("coordinates"));
        }

        let (Some(name), Some(area_type), Some(coordinates), true) = (
            self.name,
            self.area_type,
            self.coordinates,
            errors.is_empty(),
        ) else {
            return Err(ValidationError::Fields(errors).into());
        };

        let created_at = time::now();
        Ok(Switchroom {
            id: SwitchroomId::new(),
            name,
            description: self.description.unwrap_or_default(),
            area_type,
            coordinates,
            photos: Vec::new(),
            created_at,
            updated_at: created_at,
        })
    }
}
