//! Photo: an image record owned by exactly one switchroom.

use serde::{Deserialize, Serialize};

use crate::id::{PhotoId, SwitchroomId};
use crate::time::{self, Timestamp};

/// A stored image attached to a switchroom.
///
/// `image` is the reference handed back by the photo storage backend
/// (a relative path such as `switchroom_photos/<uuid>.jpg`), not a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: PhotoId,
    pub switchroom_id: SwitchroomId,
    pub image: String,
    pub uploaded_at: Timestamp,
}

impl Photo {
    /// Record a freshly stored image for `switchroom_id`.
    #[must_use]
    pub fn new(switchroom_id: SwitchroomId, image: impl Into<String>) -> Self {
        Self {
            id: PhotoId::new(),
            switchroom_id,
            image: image.into(),
            uploaded_at: time::now(),
        }
    }
}
