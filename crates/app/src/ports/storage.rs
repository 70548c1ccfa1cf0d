//! Storage port: repository trait for switchroom persistence.

use std::future::Future;

use switchroom_domain::error::SwitchroomError;
use switchroom_domain::id::SwitchroomId;
use switchroom_domain::photo::Photo;
use switchroom_domain::switchroom::Switchroom;

/// Persistence of switchrooms and the photo rows they own.
///
/// Every switchroom returned carries its photos. Deleting a switchroom
/// deletes its photo rows with it.
pub trait SwitchroomRepository {
    /// Insert a new switchroom row. Photos on the value are ignored.
    fn create(
        &self,
        switchroom: Switchroom,
    ) -> impl Future<Output = Result<Switchroom, SwitchroomError>> + Send;

    /// Fetch one switchroom with its photos.
    fn get_by_id(
        &self,
        id: SwitchroomId,
    ) -> impl Future<Output = Result<Option<Switchroom>, SwitchroomError>> + Send;

    /// Fetch every switchroom with its photos.
    fn get_all(&self) -> impl Future<Output = Result<Vec<Switchroom>, SwitchroomError>> + Send;

    /// Overwrite the stored fields of an existing switchroom.
    ///
    /// Resolves to `None` when no row has that id.
    fn update(
        &self,
        switchroom: Switchroom,
    ) -> impl Future<Output = Result<Option<Switchroom>, SwitchroomError>> + Send;

    /// Remove a switchroom and its photo rows.
    ///
    /// Resolves to `false` when no row has that id.
    fn delete(&self, id: SwitchroomId)
    -> impl Future<Output = Result<bool, SwitchroomError>> + Send;

    /// Insert a photo row for an existing switchroom.
    fn add_photo(&self, photo: Photo)
    -> impl Future<Output = Result<Photo, SwitchroomError>> + Send;
}
