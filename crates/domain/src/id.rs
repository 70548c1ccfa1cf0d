//! Typed identifier newtypes backed by UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotFoundError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident, $entity:literal) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Name of the record kind, as used in error messages.
            pub const ENTITY: &'static str = $entity;

            /// Generate a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Parse an identifier taken from a URL.
            ///
            /// Text that is not a UUID cannot name a stored record, so it is
            /// reported the same way as a well-formed id with no record.
            ///
            /// # Errors
            ///
            /// Returns [`NotFoundError`] when `text` is not a UUID.
            pub fn resolve(text: &str) -> Result<Self, NotFoundError> {
                text.parse::<Self>().map_err(|_| NotFoundError {
                    entity: Self::ENTITY,
                    id: text.to_string(),
                })
            }

            /// The error reported when no record carries this id.
            #[must_use]
            pub fn not_found(self) -> NotFoundError {
                NotFoundError {
                    entity: Self::ENTITY,
                    id: self.to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                uuid::Uuid::parse_str(s).map(Self)
            }
        }
    };
}

define_id!(
    /// Unique identifier for a [`Switchroom`](crate::switchroom::Switchroom).
    SwitchroomId,
    "Switchroom"
);

define_id!(
    /// Unique identifier for a [`Photo`](crate::photo::Photo).
    PhotoId,
    "Photo"
);
