//! Switchroom service: use-cases for managing switchrooms and their photos.

use switchroom_domain::error::SwitchroomError;
use switchroom_domain::id::SwitchroomId;
use switchroom_domain::photo::Photo;
use switchroom_domain::switchroom::Switchroom;

use crate::ports::{PhotoStorage, SwitchroomRepository};
use crate::transcoder::{
    self, NewSwitchroom, SwitchroomPayload, SwitchroomRepresentation, UpdateMode,
};

/// Application service for switchroom CRUD operations.
///
/// Generic over the repository and the photo storage backend; both are
/// injected at construction.
pub struct SwitchroomService<R, S> {
    repo: R,
    storage: S,
}

impl<R, S> SwitchroomService<R, S>
where
    R: SwitchroomRepository + Send + Sync,
    S: PhotoStorage + Send + Sync,
{
    /// Create a new service backed by the given repository and photo storage.
    pub fn new(repo: R, storage: S) -> Self {
        Self { repo, storage }
    }

    /// Create a switchroom, then attach each uploaded photo in order.
    ///
    /// The switchroom row and its photos are not written atomically: when a
    /// photo fails to store, the switchroom keeps the photos stored before it.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::MalformedInput`] or
    /// [`SwitchroomError::Validation`] when the payload is rejected (nothing
    /// is persisted in that case), or a storage error from the repository or
    /// photo storage.
    pub async fn create_switchroom(
        &self,
        payload: SwitchroomPayload,
    ) -> Result<SwitchroomRepresentation, SwitchroomError> {
        let NewSwitchroom { switchroom, photos } = transcoder::decode_for_create(payload)?;

        let mut created = self.repo.create(switchroom).await?;
        for upload in photos {
            let reference = self.storage.save(upload.extension, upload.data).await?;
            match self.repo.add_photo(Photo::new(created.id, reference.clone())).await {
                Ok(photo) => created.photos.push(photo),
                Err(err) => {
                    self.discard(reference).await;
                    return Err(err);
                }
            }
        }

        tracing::info!(
            switchroom_id = %created.id,
            photos = created.photos.len(),
            "switchroom created"
        );
        Ok(self.render(created))
    }

    /// Look up a switchroom by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::NotFound`] when no switchroom with `id`
    /// exists, or a storage error from the repository.
    pub async fn get_switchroom(
        &self,
        id: SwitchroomId,
    ) -> Result<SwitchroomRepresentation, SwitchroomError> {
        let switchroom = self.find(id).await?;
        Ok(self.render(switchroom))
    }

    /// List all switchrooms with their photos.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    pub async fn list_switchrooms(&self) -> Result<Vec<SwitchroomRepresentation>, SwitchroomError> {
        let all = self.repo.get_all().await?;
        Ok(all.into_iter().map(|s| self.render(s)).collect())
    }

    /// Apply a full or partial update and refresh `updated_at`.
    ///
    /// The payload, `coordinates` included, is only decoded once the
    /// switchroom is known to exist.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::NotFound`] when the switchroom is absent,
    /// [`SwitchroomError::MalformedInput`] or [`SwitchroomError::Validation`]
    /// when the payload is rejected, or a storage error from the repository.
    pub async fn update_switchroom(
        &self,
        id: SwitchroomId,
        payload: SwitchroomPayload,
        mode: UpdateMode,
    ) -> Result<SwitchroomRepresentation, SwitchroomError> {
        let mut switchroom = self.find(id).await?;
        let changes = transcoder::decode_for_update(payload, mode)?;
        switchroom.apply(changes)?;

        let updated = self
            .repo
            .update(switchroom)
            .await?
            .ok_or_else(|| not_found(id))?;

        tracing::debug!(switchroom_id = %id, "switchroom updated");
        Ok(self.render(updated))
    }

    /// Delete a switchroom, its photo rows and their stored files.
    ///
    /// File removal happens after the rows are gone and is best effort.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchroomError::NotFound`] when the switchroom is absent,
    /// or a storage error from the repository.
    pub async fn delete_switchroom(&self, id: SwitchroomId) -> Result<(), SwitchroomError> {
        let switchroom = self.find(id).await?;
        if !self.repo.delete(id).await? {
            return Err(not_found(id));
        }

        for photo in switchroom.photos {
            self.discard(photo.image).await;
        }

        tracing::info!(switchroom_id = %id, "switchroom deleted");
        Ok(())
    }

    async fn find(&self, id: SwitchroomId) -> Result<Switchroom, SwitchroomError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn discard(&self, reference: String) {
        if let Err(err) = self.storage.remove(reference.clone()).await {
            tracing::warn!(error = %err, reference = %reference, "failed to remove stored photo");
        }
    }

    fn render(&self, switchroom: Switchroom) -> SwitchroomRepresentation {
        SwitchroomRepresentation::render(switchroom, &self.storage)
    }
}

fn not_found(id: SwitchroomId) -> SwitchroomError {
    id.not_found().into()
}
